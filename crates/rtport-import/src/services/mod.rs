//! Import orchestration services

mod orchestrator;

pub use orchestrator::{ImportOrchestrator, ImportRequest};

use thiserror::Error;

/// Import service errors
#[derive(Error, Debug)]
pub enum ImportServiceError {
    #[error("Record types missing in target org: {}", .0.join(", "))]
    MissingRecordTypes(Vec<String>),

    #[error("Plan processing failed: {0}")]
    PlanProcessing(String),

    #[error("File processing failed: {0}")]
    FileProcessing(String),

    #[error("Deployment failed: {0}")]
    Deployment(String),

    #[error("Org connection error: {0}")]
    Connection(#[from] rtport_import_types::ImportError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for import services
pub type ImportServiceResult<T> = Result<T, ImportServiceError>;

/// User-facing outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Neither data files nor a plan were requested
    NothingRequested,
    Success,
    MissingRecordTypes,
    PlanProcessingFailed,
    FileProcessingFailed,
    DeploymentFailed,
}

impl ImportOutcome {
    /// Message shown to the user, if any
    pub fn message(&self) -> Option<&'static str> {
        match self {
            ImportOutcome::NothingRequested => None,
            ImportOutcome::Success => Some("The data was deployed successfully"),
            ImportOutcome::MissingRecordTypes => {
                Some("No data was deployed there are missing record types in your target org")
            }
            ImportOutcome::PlanProcessingFailed => {
                Some("No data was deployed, the data plan could not be processed")
            }
            ImportOutcome::FileProcessingFailed => {
                Some("No data was deployed, one or more data files could not be processed")
            }
            ImportOutcome::DeploymentFailed => {
                Some("The data could not be deployed to your target org")
            }
        }
    }

    pub fn is_failure(&self) -> bool {
        !matches!(
            self,
            ImportOutcome::NothingRequested | ImportOutcome::Success
        )
    }
}

impl From<ImportServiceError> for ImportOutcome {
    fn from(error: ImportServiceError) -> Self {
        match error {
            ImportServiceError::MissingRecordTypes(_) => ImportOutcome::MissingRecordTypes,
            ImportServiceError::PlanProcessing(_) => ImportOutcome::PlanProcessingFailed,
            ImportServiceError::FileProcessing(_) => ImportOutcome::FileProcessingFailed,
            ImportServiceError::Deployment(_) | ImportServiceError::Connection(_) => {
                ImportOutcome::DeploymentFailed
            }
            ImportServiceError::InvalidRequest(_) | ImportServiceError::Internal(_) => {
                ImportOutcome::FileProcessingFailed
            }
        }
    }
}
