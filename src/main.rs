use anyhow::Context as _;
use clap::Parser;
use paramsift::cli::args::Cli;
use paramsift::core::context::Config;
use paramsift::core::engine::{interrupt, Engine, Interrupt};
use paramsift::core::rate_limit::RateLimiter;
use paramsift::error::Error;
use paramsift::http::client::HttpProber;
use paramsift::payload::loader::load_wordlist;
use std::process::ExitCode;
use tokio::io::{AsyncBufRead, BufReader};
use tracing::Level;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_target(false)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

/// 1 for bad configuration or input files, 2 for failures during the run.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<Error>() {
        Some(e) if e.is_config_error() => 1,
        _ => 2,
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_cli(cli)?;
    let wordlist = load_wordlist(&config.wordlist)?;
    tracing::info!("Loaded {} parameter names", wordlist.len());

    let limiter = RateLimiter::new(config.request_interval);
    let prober = HttpProber::new(&config, limiter)?;
    let engine = Engine::new(&config, &prober, &wordlist);

    let kill = engine.kill_switch();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            match interrupt(&kill) {
                Interrupt::AbandonUrl => {
                    tracing::warn!("Interrupted, abandoning the current URL (press again to quit)")
                }
                Interrupt::Exit => std::process::exit(130),
            }
        }
    });

    let input: Box<dyn AsyncBufRead + Unpin> = match &config.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .map_err(|source| Error::InputUnreadable {
                    path: path.clone(),
                    source,
                })?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let mut stdout = std::io::stdout().lock();
    engine
        .run(input, &mut stdout)
        .await
        .context("I/O failure on the input or output stream")?;

    Ok(())
}
