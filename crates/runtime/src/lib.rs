//! Runtime glue: tracing bootstrap, input access, the selection pipeline.

use std::io;
use std::num::IntErrorKind;
use std::path::PathBuf;

use hs_core::ParseError;
use tracing_subscriber::EnvFilter;

pub mod metrics;
pub mod output;
pub mod pipeline;

pub use pipeline::{open_input, run_selection};

/// Install a stderr `fmt` subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("invalid value for total scores: `{0}` is not an integer")]
    InvalidLimit(String),
    #[error("total scores must be greater than zero, got {0}")]
    NonPositiveLimit(String),
    #[error("total scores `{0}` is too large")]
    LimitTooLarge(String),
}

/// Validate the requested result count.
pub fn parse_limit(raw: &str) -> Result<usize, ArgumentError> {
    let value: i128 = match raw.trim().parse() {
        Ok(value) => value,
        Err(err) => {
            return Err(match err.kind() {
                IntErrorKind::PosOverflow => ArgumentError::LimitTooLarge(raw.to_string()),
                IntErrorKind::NegOverflow => ArgumentError::NonPositiveLimit(raw.to_string()),
                _ => ArgumentError::InvalidLimit(raw.to_string()),
            });
        }
    };
    if value <= 0 {
        return Err(ArgumentError::NonPositiveLimit(raw.to_string()));
    }
    usize::try_from(value).map_err(|_| ArgumentError::LimitTooLarge(raw.to_string()))
}

#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error("cannot access records file {}", .path.display())]
    InputAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read line {line}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },
    #[error("invalid record on line {line}")]
    Parse {
        line: usize,
        text: String,
        #[source]
        source: ParseError,
    },
    #[error("failed to write results")]
    Output(#[source] io::Error),
}
