//! Error types for paramsift
//!
//! Transport failures never show up here: they are folded into
//! [`ProbeResult`](crate::http::response::ProbeResult) at the prober boundary.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The word list could not be opened or read.
    #[error("Unable to read wordlist file '{}': {source}", path.display())]
    WordlistUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The `--input` file could not be opened.
    #[error("Unable to open input file '{}': {source}", path.display())]
    InputUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The word list had no usable entries.
    #[error("Wordlist '{}' is empty", path.display())]
    EmptyWordlist { path: PathBuf },

    /// An option value was out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The HTTP client could not be constructed.
    #[error("Unable to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// A target that cannot be probed; the run moves on to the next one.
    #[error("Skipped {url}: {reason}")]
    SkippedTarget { url: String, reason: SkipReason },
}

impl Error {
    /// Startup failures that end the process with exit code 1.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Error::WordlistUnreadable { .. }
                | Error::InputUnreadable { .. }
                | Error::EmptyWordlist { .. }
                | Error::InvalidConfig(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotAUrl,
    SignatureUndefined,
    Internal(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NotAUrl => write!(f, "not an absolute http(s) URL"),
            SkipReason::SignatureUndefined => write!(f, "baseline probes failed"),
            SkipReason::Internal(msg) => write!(f, "internal failure: {}", msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
