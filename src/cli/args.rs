use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// paramsift – hidden HTTP query parameter discovery
#[derive(Parser, Debug)]
#[command(
    name = "paramsift",
    version,
    about = "paramsift – hidden HTTP query parameter discovery",
    long_about = r#"
paramsift reads target URLs from standard input, one per line, and finds
query parameters each endpoint accepts but does not advertise.

For every URL it:

  • Learns the page's noise floor from two nonsense probes
  • Sends the wordlist in large batches and keeps only batches that change
    the response beyond that floor
  • Halves suspicious batches until single parameters remain
  • Confirms each survivor with independent checks (response diff, error
    messages, reflection, content length)
"#,
    after_help = r#"EXAMPLES:
  cat urls.txt | paramsift -w params.txt
  paramsift -w params.txt -i urls.txt -r 5 --format url
  echo https://example.com/search | paramsift -w params.txt -c 50 -v"#
)]
pub struct Cli {
    /// Wordlist file path (one parameter name per line)
    #[arg(short = 'w', long = "wordlist")]
    pub wordlist: PathBuf,

    /// Number of groups the wordlist is split into for the first round
    #[arg(short = 'c', long = "chunks", default_value_t = 250)]
    pub chunks: usize,

    /// Rate limit (requests per second)
    #[arg(short = 'r', long = "rate-limit", default_value_t = 10.0)]
    pub rate_limit: f64,

    /// Timeout for requests (seconds)
    #[arg(short = 't', long = "timeout", default_value_t = 10.0)]
    pub timeout: f64,

    /// Disable following redirects
    #[arg(long = "disable-redirects")]
    pub disable_redirects: bool,

    /// Enable verbose output (written to stderr)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Read target URLs from a file instead of stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output format for discovered parameters
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Request)]
    pub format: OutputFormat,

    /// Upper bound on narrowing rounds per URL
    #[arg(long = "max-rounds", default_value_t = 32)]
    pub max_rounds: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw GET request naming the discovered parameters
    Request,
    /// Target URL with name=value pairs appended
    Url,
    /// One JSON object per line
    Json,
}
