//! Error types for the import system

use thiserror::Error;

/// Result type for import operations
pub type ImportResult<T> = Result<T, ImportError>;

/// Errors that can occur while talking to the pipeline's collaborators
#[derive(Error, Debug)]
pub enum ImportError {
    /// Destination org is not reachable or the session is not authorized
    #[error("Org not accessible: {0}")]
    OrgNotAccessible(String),

    /// A query against the destination org failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Import command could not be run or reported failure
    #[error("Import failed: {0}")]
    ImportFailed(String),

    /// Import command did not finish in the configured time
    #[error("Import timed out after {0} seconds")]
    ImportTimedOut(u64),

    /// Filesystem access failed
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration detected
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl ImportError {
    /// Wrap an IO error with the path it happened on
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        ImportError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error reports a missing file or directory
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ImportError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}
