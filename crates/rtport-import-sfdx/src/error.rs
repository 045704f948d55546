//! Error types for Salesforce CLI invocations

use thiserror::Error;

/// Result type for Salesforce CLI operations
pub type SfdxResult<T> = Result<T, SfdxError>;

#[derive(Error, Debug)]
pub enum SfdxError {
    #[error("Failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} failed: {message}")]
    CommandFailed { command: String, message: String },

    #[error("Unexpected output from {command}: {reason}")]
    InvalidOutput { command: String, reason: String },

    #[error("Unknown Salesforce CLI flavor: {0}")]
    UnknownFlavor(String),
}
