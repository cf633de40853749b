//! Run configuration

use crate::cli::args::{Cli, OutputFormat};
use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Explicit configuration built once from the command line and passed by
/// reference to the components that need it.
#[derive(Debug, Clone)]
pub struct Config {
    pub wordlist: PathBuf,
    pub chunks: usize,
    /// Minimum spacing between requests, derived from the rate limit.
    pub request_interval: Duration,
    pub timeout: Duration,
    pub follow_redirects: bool,
    pub input: Option<PathBuf>,
    pub format: OutputFormat,
    pub max_rounds: usize,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wordlist: PathBuf::new(),
            chunks: 250,
            request_interval: Duration::from_millis(100),
            timeout: Duration::from_secs(10),
            follow_redirects: true,
            input: None,
            format: OutputFormat::Request,
            max_rounds: 32,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        if !(cli.rate_limit.is_finite() && cli.rate_limit > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "rate limit must be greater than 0 (got {})",
                cli.rate_limit
            )));
        }
        if !(cli.timeout.is_finite() && cli.timeout > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "timeout must be greater than 0 (got {})",
                cli.timeout
            )));
        }

        let request_interval = Duration::try_from_secs_f64(1.0 / cli.rate_limit).map_err(|_| {
            Error::InvalidConfig(format!("rate limit {} is too small", cli.rate_limit))
        })?;
        let timeout = Duration::try_from_secs_f64(cli.timeout)
            .map_err(|_| Error::InvalidConfig(format!("timeout {} is too large", cli.timeout)))?;

        Ok(Self {
            wordlist: cli.wordlist,
            chunks: cli.chunks.max(1),
            request_interval,
            timeout,
            follow_redirects: !cli.disable_redirects,
            input: cli.input,
            format: cli.format,
            max_rounds: cli.max_rounds.max(1),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }
}
