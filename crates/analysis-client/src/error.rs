//! Error types for the analysis client

use std::time::Duration;

use thiserror::Error;

/// Client-side error taxonomy.
///
/// Transport failures and 5xx responses are transient: the polling loop
/// absorbs them and retries on its next scheduled tick. Everything else is
/// terminal for the operation that produced it.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("session expired or unauthorized")]
    SessionExpired,

    #[error("server rejected request ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("analysis failed: {0}")]
    JobFailed(String),

    #[error("analysis did not finish within {}s", .timeout.as_secs())]
    PollTimeout { timeout: Duration },

    #[error("status response reported completion but carried no result")]
    MissingResult,
}

impl ClientError {
    /// Whether the polling loop should retry this on the next tick rather
    /// than fail the job.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Transport(_) => true,
            ClientError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
