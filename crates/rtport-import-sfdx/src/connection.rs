//! Org connection through the Salesforce CLI

use async_trait::async_trait;
use rtport_import_types::{ImportError, ImportResult, OrgConnection, QueryResult};
use serde_json::Value;
use tracing::{debug, info};

use crate::cli::SfCli;
use crate::error::{SfdxError, SfdxResult};

/// Connection to an org the Salesforce CLI is already authenticated against
#[derive(Debug, Clone)]
pub struct SfdxOrgConnection {
    cli: SfCli,
    username: String,
}

impl SfdxOrgConnection {
    /// Resolve `alias` (an alias or a username) to the org's username
    pub async fn connect(cli: SfCli, alias: &str) -> SfdxResult<Self> {
        let result = cli.run_json(&cli.org_display_args(alias)).await?;
        let username = username_from_display(&result).ok_or_else(|| SfdxError::InvalidOutput {
            command: format!("{} org display", cli.flavor()),
            reason: "no username in org description".to_string(),
        })?;

        info!("Connected to org {} as {}", alias, username);
        Ok(Self { cli, username })
    }
}

fn username_from_display(result: &Value) -> Option<String> {
    result
        .get("username")
        .and_then(Value::as_str)
        .filter(|username| !username.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl OrgConnection for SfdxOrgConnection {
    fn username(&self) -> String {
        self.username.clone()
    }

    async fn query(&self, soql: &str) -> ImportResult<QueryResult> {
        debug!("Running query against {}: {}", self.username, soql);

        let result = self
            .cli
            .run_json(&self.cli.query_args(&self.username, soql))
            .await
            .map_err(|e| ImportError::QueryFailed(e.to_string()))?;

        let result: QueryResult = serde_json::from_value(result)?;
        debug!("Query returned {} row(s)", result.records.len());
        Ok(result)
    }
}
