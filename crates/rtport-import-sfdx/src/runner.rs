//! Tree import through the Salesforce CLI

use async_trait::async_trait;
use rtport_import_types::{ImportError, ImportResult, ImportRunner, StagedImport};
use tracing::info;

use crate::cli::SfCli;

/// Runs `force:data:tree:import` / `data import tree`
#[derive(Debug, Clone)]
pub struct SfdxImportRunner {
    cli: SfCli,
}

impl SfdxImportRunner {
    pub fn new(cli: SfCli) -> Self {
        Self { cli }
    }
}

#[async_trait]
impl ImportRunner for SfdxImportRunner {
    async fn run_import(&self, target_username: &str, staged: &StagedImport) -> ImportResult<()> {
        let args = self.cli.import_args(target_username, staged);

        self.cli
            .run_json(&args)
            .await
            .map_err(|e| ImportError::ImportFailed(e.to_string()))?;

        info!("Tree import into {} completed", target_username);
        Ok(())
    }
}
