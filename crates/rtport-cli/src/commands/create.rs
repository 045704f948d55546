use clap::Args;
use colored::Colorize;
use rtport_import::{
    ImportConfig, ImportOrchestrator, ImportOutcome, ImportRequest, ImportServiceError,
};
use rtport_import_sfdx::{SfCli, SfCliFlavor, SfdxImportRunner, SfdxOrgConnection};
use rtport_import_types::{ImportError, LocalFilesystem};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Args, Debug)]
pub struct CreateDataCommand {
    /// Comma-separated list of data files to import
    #[arg(short = 'f', long, conflicts_with = "dataplan")]
    pub datafiles: Option<String>,

    /// Data plan describing the files to import
    #[arg(short = 'p', long)]
    pub dataplan: Option<String>,

    /// Alias or username of the destination org
    #[arg(short = 'u', long, env = "SFDX_DEFAULT_USERNAME")]
    pub target_org: String,

    /// Directory the rewritten files are staged in
    #[arg(long, env = "RTPORT_STAGING_DIR")]
    pub staging_dir: Option<String>,

    /// Give every run its own staging directory
    #[arg(long, env = "RTPORT_ISOLATED_STAGING")]
    pub isolated_staging: bool,

    /// Give up on the import tool after this many seconds
    #[arg(long, env = "RTPORT_IMPORT_TIMEOUT")]
    pub import_timeout: Option<u64>,

    /// Salesforce CLI flavor: sfdx or sf
    #[arg(long = "cli", default_value = "sfdx", env = "RTPORT_SF_CLI")]
    pub cli_flavor: SfCliFlavor,

    /// Path to the Salesforce CLI executable
    #[arg(long, env = "RTPORT_SF_CLI_PATH")]
    pub cli_path: Option<String>,
}

impl CreateDataCommand {
    pub fn execute(self) -> anyhow::Result<ExitCode> {
        let Some(request) =
            ImportRequest::from_flags(self.datafiles.as_deref(), self.dataplan.as_deref())?
        else {
            debug!("No data files or data plan given");
            return Ok(ExitCode::SUCCESS);
        };

        let config = ImportConfig::new(
            self.staging_dir.clone(),
            self.isolated_staging,
            self.import_timeout,
        )?;

        // Single logical thread of execution
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let outcome = rt.block_on(self.run(request, config));

        report(outcome);
        Ok(if outcome.is_failure() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        })
    }

    async fn run(&self, request: ImportRequest, config: ImportConfig) -> ImportOutcome {
        let cli = SfCli::new(self.cli_flavor, self.cli_path.clone());
        info!("Using {} CLI against {}", cli.flavor(), self.target_org);

        let connection = match SfdxOrgConnection::connect(cli.clone(), &self.target_org).await {
            Ok(connection) => connection,
            Err(e) => {
                error!("Could not connect to {}: {}", self.target_org, e);
                return ImportOutcome::from(ImportServiceError::Connection(
                    ImportError::OrgNotAccessible(e.to_string()),
                ));
            }
        };

        let orchestrator = ImportOrchestrator::new(
            Arc::new(connection),
            Arc::new(SfdxImportRunner::new(cli)),
            Arc::new(LocalFilesystem::new()),
            config,
        );

        match orchestrator.run(Some(request)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Import into {} failed: {}", self.target_org, e);
                ImportOutcome::from(e)
            }
        }
    }
}

fn report(outcome: ImportOutcome) {
    let Some(message) = outcome.message() else {
        return;
    };

    if outcome.is_failure() {
        println!("{}", message.bright_red());
    } else {
        println!("{}", message.bright_green());
    }
}
