//! Collaborator traits
//!
//! Defines the interfaces to the destination org and to the bulk import tool.
//! Implementations live in their own crates (see `rtport-import-sfdx`).

use crate::error::ImportResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Query listing every record type in the destination org
pub const RECORD_TYPE_QUERY: &str = "SELECT Id, SobjectType, DeveloperName FROM RecordType";

/// Raw result of a SOQL query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// Number of rows matched by the query
    #[serde(default)]
    pub total_size: usize,
    /// Whether all rows are contained in `records`
    #[serde(default = "default_done")]
    pub done: bool,
    /// Row objects as returned by the org
    #[serde(default)]
    pub records: Vec<serde_json::Value>,
}

fn default_done() -> bool {
    true
}

/// What the import tool should be pointed at once files are staged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagedImport {
    /// Staged data files, in the order they were supplied
    DataFiles(Vec<String>),
    /// A single staged plan file
    DataPlan(String),
}

impl StagedImport {
    /// Joined argument value handed to the import tool
    pub fn argument(&self) -> String {
        match self {
            StagedImport::DataFiles(files) => files.join(","),
            StagedImport::DataPlan(plan) => plan.clone(),
        }
    }
}

/// Authenticated connection to the destination org
#[async_trait]
pub trait OrgConnection: Send + Sync {
    /// Username the connection is authenticated as
    fn username(&self) -> String;

    /// Run a SOQL query and return every row
    async fn query(&self, soql: &str) -> ImportResult<QueryResult>;
}

/// Bulk data import tool
///
/// Given a target org and the staged files, performs the import. Only
/// pass/fail is reported back.
#[async_trait]
pub trait ImportRunner: Send + Sync {
    /// Import the staged data into the org identified by `target_username`
    async fn run_import(&self, target_username: &str, staged: &StagedImport) -> ImportResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_files_argument_is_comma_joined() {
        let staged = StagedImport::DataFiles(vec![
            "tempFilesWithRecordTypes/Accountupdated.json".to_string(),
            "tempFilesWithRecordTypes/Contactupdated.json".to_string(),
        ]);

        assert_eq!(
            staged.argument(),
            "tempFilesWithRecordTypes/Accountupdated.json,tempFilesWithRecordTypes/Contactupdated.json"
        );
    }

    #[test]
    fn test_query_result_parses_salesforce_shape() {
        let json = r#"{
            "totalSize": 1,
            "done": true,
            "records": [
                {"attributes": {"type": "RecordType"}, "Id": "012000000000001AAA", "SobjectType": "Account", "DeveloperName": "Partner"}
            ]
        }"#;

        let result: QueryResult = serde_json::from_str(json).unwrap();

        assert_eq!(result.total_size, 1);
        assert!(result.done);
        assert_eq!(result.records.len(), 1);
    }
}
