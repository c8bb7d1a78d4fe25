/// Error types for provider API operations
use thiserror::Error;

/// Errors that can occur while talking to the compute provider
#[derive(Debug, Error)]
pub enum SweepError {
    /// The provider rejected our credentials
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Network-level failure before a response was received
    #[error("Network error: {0}")]
    Transport(String),

    /// One or more requested instance ids do not exist
    #[error("Instance not found: {0}")]
    NotFound(String),

    /// The provider returned an error response
    #[error("API error ({code}): {message}")]
    Api { code: String, message: String },

    /// The batch stop acknowledged fewer instances than requested
    #[error("Stop acknowledged {acknowledged} of {requested} instances; missing: {missing:?}")]
    PartialBatch {
        requested: usize,
        acknowledged: usize,
        missing: Vec<String>,
    },
}

impl SweepError {
    /// Process exit code for this failure. Configuration/usage problems
    /// exit 1 from the CLI directly; everything here is provider-side.
    pub fn exit_code(&self) -> i32 {
        2
    }
}
