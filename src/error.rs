//! Benchmark error types.
//!
//! Errors fall into two families that callers must be able to tell apart:
//!
//! - **Precondition violations** ([`BenchError::EmptySample`],
//!   [`BenchError::InvalidParameter`]): structural input problems. These are
//!   fatal and abort the run before a mismatched record can be produced.
//! - **Provider failures** ([`BenchError::Network`], [`BenchError::Upstream`],
//!   [`BenchError::MalformedResponse`]): raised by the live counting client.
//!   The counter registry absorbs them and degrades to an approximate count,
//!   so they never reach the benchmark runner.

use thiserror::Error;

/// Benchmark errors.
#[derive(Error, Debug)]
pub enum BenchError {
    /// Summarizer was handed no counts.
    #[error("Empty sample: cannot summarize zero token counts")]
    EmptySample,

    /// Non-positive size, trial count, or character count.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Network communication error.
    #[error("Network error: {0}")]
    Network(String),

    /// Token counting service answered with a non-success status.
    #[error("Upstream error ({status}): {body}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// Token counting service answered with an unexpected body.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// CSV export error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BenchError {
    /// Whether this error is a precondition violation (fatal to the run)
    /// rather than a provider failure.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            BenchError::EmptySample | BenchError::InvalidParameter(_)
        )
    }
}

/// Result type alias for benchmark operations
pub type Result<T> = std::result::Result<T, BenchError>;

impl From<reqwest::Error> for BenchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BenchError::MalformedResponse(err.to_string())
        } else {
            BenchError::Network(err.to_string())
        }
    }
}

impl From<toml::de::Error> for BenchError {
    fn from(err: toml::de::Error) -> Self {
        BenchError::Config(err.to_string())
    }
}
