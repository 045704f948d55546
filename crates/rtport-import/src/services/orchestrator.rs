//! Import orchestrator service
//!
//! Sequences a whole run: build the record-type index, resolve the file set,
//! rewrite into the staging area, invoke the import tool, release the staging
//! area, and collapse whatever happened into one `ImportOutcome`.

use futures::FutureExt;
use rtport_import_types::{
    Filesystem, ImportError, ImportRunner, OrgConnection, RecordTypeIndex, StagedImport,
    RECORD_TYPE_QUERY,
};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::{ImportOutcome, ImportServiceError, ImportServiceResult};
use crate::config::ImportConfig;
use crate::plan_resolver::PlanResolver;
use crate::rewriter::FileRewriter;
use crate::staging::StagingArea;

/// What the user asked to import
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportRequest {
    /// Data files given directly
    DataFiles(Vec<String>),
    /// A plan file referencing the data files
    DataPlan(String),
}

impl ImportRequest {
    /// Build a request from the two mutually exclusive command-line values
    ///
    /// Returns `Ok(None)` when neither names anything to import.
    pub fn from_flags(
        datafiles: Option<&str>,
        dataplan: Option<&str>,
    ) -> ImportServiceResult<Option<Self>> {
        match (datafiles, dataplan) {
            (Some(_), Some(_)) => Err(ImportServiceError::InvalidRequest(
                "data files and a data plan cannot be imported together".to_string(),
            )),
            (Some(files), None) => {
                let files: Vec<String> = files
                    .split(',')
                    .map(str::trim)
                    .filter(|file| !file.is_empty())
                    .map(str::to_string)
                    .collect();
                Ok((!files.is_empty()).then_some(ImportRequest::DataFiles(files)))
            }
            (None, Some(plan)) => {
                let plan = plan.trim();
                Ok((!plan.is_empty()).then(|| ImportRequest::DataPlan(plan.to_string())))
            }
            (None, None) => Ok(None),
        }
    }
}

/// Progress of a run, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    IndexBuilt,
    FilesResolved,
    FilesRewritten,
    Imported,
    CleanedUp,
}

/// Import orchestrator coordinating a single run
pub struct ImportOrchestrator {
    connection: Arc<dyn OrgConnection>,
    runner: Arc<dyn ImportRunner>,
    fs: Arc<dyn Filesystem>,
    config: ImportConfig,
}

impl ImportOrchestrator {
    /// Create a new import orchestrator with its collaborators
    pub fn new(
        connection: Arc<dyn OrgConnection>,
        runner: Arc<dyn ImportRunner>,
        fs: Arc<dyn Filesystem>,
        config: ImportConfig,
    ) -> Self {
        Self {
            connection,
            runner,
            fs,
            config,
        }
    }

    /// Run an import
    ///
    /// Only a failure to query the destination org is returned as `Err`; it
    /// happens before anything is staged. Every later failure is reported
    /// through the returned outcome, after the staging area is released.
    pub async fn run(&self, request: Option<ImportRequest>) -> ImportServiceResult<ImportOutcome> {
        let Some(request) = request else {
            info!("Neither data files nor a data plan requested, nothing to do");
            return Ok(ImportOutcome::NothingRequested);
        };

        let index = self.build_index().await?;
        transition(RunState::IndexBuilt);
        let target = self.connection.username();

        let staging_dir = self.config.staging_dir_for_run();
        let staging = match StagingArea::acquire(staging_dir.clone(), self.fs.clone()).await {
            Ok(staging) => staging,
            Err(e) => {
                error!("Failed to create staging area {}: {}", staging_dir, e);
                return Ok(ImportOutcome::from(setup_failure(&request, e)));
            }
        };

        let result = AssertUnwindSafe(self.run_staged(&request, &index, &target, &staging))
            .catch_unwind()
            .await;

        staging.release().await;
        transition(RunState::CleanedUp);

        let outcome = match result {
            Ok(Ok(())) => ImportOutcome::Success,
            Ok(Err(e)) => {
                error!("Import into {} failed: {}", target, e);
                ImportOutcome::from(e)
            }
            Err(panic) => {
                let e = ImportServiceError::Internal(panic_message(panic.as_ref()).to_string());
                error!("Import into {} aborted unexpectedly: {}", target, e);
                ImportOutcome::from(e)
            }
        };

        info!("Import finished: {:?}", outcome);
        Ok(outcome)
    }

    /// Query every record type in the destination org
    async fn build_index(&self) -> ImportServiceResult<RecordTypeIndex> {
        debug!("Querying record types: {}", RECORD_TYPE_QUERY);
        let result = self.connection.query(RECORD_TYPE_QUERY).await?;
        let index = RecordTypeIndex::from_query(result);

        info!("Indexed {} record type(s) in target org", index.len());
        Ok(index)
    }

    async fn run_staged(
        &self,
        request: &ImportRequest,
        index: &RecordTypeIndex,
        target: &str,
        staging: &StagingArea,
    ) -> ImportServiceResult<()> {
        let rewriter = FileRewriter::new(index, self.fs.as_ref());

        let staged = match request {
            ImportRequest::DataFiles(files) => {
                if files.is_empty() {
                    return Err(ImportServiceError::FileProcessing(
                        "no data files given".to_string(),
                    ));
                }
                transition(RunState::FilesResolved);

                let staged_files = rewriter.rewrite(files, staging).await?;
                transition(RunState::FilesRewritten);
                StagedImport::DataFiles(staged_files)
            }
            ImportRequest::DataPlan(plan_path) => {
                let resolved = PlanResolver::new(self.fs.as_ref())
                    .resolve(plan_path, staging)
                    .await?;
                transition(RunState::FilesResolved);

                rewriter.rewrite(&resolved.files_to_process, staging).await?;
                let staged_plan = resolved.stage(staging).await?;
                transition(RunState::FilesRewritten);
                StagedImport::DataPlan(staged_plan)
            }
        };

        self.import(target, &staged).await?;
        transition(RunState::Imported);
        Ok(())
    }

    async fn import(&self, target: &str, staged: &StagedImport) -> ImportServiceResult<()> {
        info!("Importing {} into {}", staged.argument(), target);

        let result = match self.config.import_timeout {
            Some(timeout) => {
                match tokio::time::timeout(timeout, self.runner.run_import(target, staged)).await {
                    Ok(result) => result,
                    Err(_) => Err(ImportError::ImportTimedOut(timeout.as_secs())),
                }
            }
            None => self.runner.run_import(target, staged).await,
        };

        result.map_err(|e| ImportServiceError::Deployment(e.to_string()))
    }
}

fn transition(state: RunState) {
    debug!("Import run state: {:?}", state);
}

/// Failure class for errors that happen before any file is touched
fn setup_failure(request: &ImportRequest, error: ImportError) -> ImportServiceError {
    match request {
        ImportRequest::DataFiles(_) => ImportServiceError::FileProcessing(error.to_string()),
        ImportRequest::DataPlan(_) => ImportServiceError::PlanProcessing(error.to_string()),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
