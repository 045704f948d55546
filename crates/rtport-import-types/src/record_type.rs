//! Record-type lookup table
//!
//! Record types are identified by object + developer name in every org, but
//! carry a different opaque ID in each one. The index maps the former to the
//! destination org's IDs.

use crate::importer::QueryResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Composite key identifying a record type within an org
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordTypeKey {
    pub object_api_name: String,
    pub developer_name: String,
}

impl RecordTypeKey {
    pub fn new(object_api_name: impl Into<String>, developer_name: impl Into<String>) -> Self {
        Self {
            object_api_name: object_api_name.into(),
            developer_name: developer_name.into(),
        }
    }
}

impl std::fmt::Display for RecordTypeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}", self.object_api_name, self.developer_name)
    }
}

/// One row of the record-type query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordTypeRow {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "SobjectType")]
    pub sobject_type: String,
    #[serde(rename = "DeveloperName")]
    pub developer_name: String,
}

/// Read-only mapping from record-type key to destination-org ID
#[derive(Debug, Clone, Default)]
pub struct RecordTypeIndex {
    ids: HashMap<RecordTypeKey, String>,
}

impl RecordTypeIndex {
    /// Build an index from typed rows. Duplicate keys keep the last ID.
    pub fn from_rows(rows: impl IntoIterator<Item = RecordTypeRow>) -> Self {
        let mut ids = HashMap::new();
        for row in rows {
            let key = RecordTypeKey::new(row.sobject_type, row.developer_name);
            if let Some(previous) = ids.insert(key.clone(), row.id) {
                debug!("Record type {} listed twice, replacing {}", key, previous);
            }
        }
        Self { ids }
    }

    /// Build an index from a raw query result
    ///
    /// Rows missing any of the three fields are skipped; references to them
    /// will then fail to resolve.
    pub fn from_query(result: QueryResult) -> Self {
        let rows = result.records.into_iter().filter_map(|value| {
            match serde_json::from_value::<RecordTypeRow>(value) {
                Ok(row) => Some(row),
                Err(e) => {
                    warn!("Skipping malformed record type row: {}", e);
                    None
                }
            }
        });
        Self::from_rows(rows)
    }

    /// Destination ID for the given key
    pub fn resolve(&self, key: &RecordTypeKey) -> Option<&str> {
        self.ids.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(id: &str, sobject: &str, name: &str) -> RecordTypeRow {
        RecordTypeRow {
            id: id.to_string(),
            sobject_type: sobject.to_string(),
            developer_name: name.to_string(),
        }
    }

    #[test]
    fn test_resolves_known_keys() {
        let index = RecordTypeIndex::from_rows(vec![
            row("012A", "Account", "Partner"),
            row("012B", "Account", "Customer"),
            row("012C", "Contact", "Partner"),
        ]);

        assert_eq!(index.len(), 3);
        assert_eq!(
            index.resolve(&RecordTypeKey::new("Account", "Partner")),
            Some("012A")
        );
        assert_eq!(
            index.resolve(&RecordTypeKey::new("Contact", "Partner")),
            Some("012C")
        );
        assert_eq!(index.resolve(&RecordTypeKey::new("Lead", "Partner")), None);
    }

    #[test]
    fn test_duplicate_keys_keep_last_id() {
        let index = RecordTypeIndex::from_rows(vec![
            row("012A", "Account", "Partner"),
            row("012Z", "Account", "Partner"),
        ]);

        assert_eq!(index.len(), 1);
        assert_eq!(
            index.resolve(&RecordTypeKey::new("Account", "Partner")),
            Some("012Z")
        );
    }

    #[test]
    fn test_from_query_skips_malformed_rows() {
        let result = QueryResult {
            total_size: 2,
            done: true,
            records: vec![
                json!({"attributes": {"type": "RecordType"}, "Id": "012A", "SobjectType": "Account", "DeveloperName": "Partner"}),
                json!({"Id": "012B", "SobjectType": "Account"}),
            ],
        };

        let index = RecordTypeIndex::from_query(result);

        assert_eq!(index.len(), 1);
        assert!(index
            .resolve(&RecordTypeKey::new("Account", "Partner"))
            .is_some());
    }

    #[test]
    fn test_empty_listing_yields_empty_index() {
        let index = RecordTypeIndex::from_query(QueryResult::default());

        assert!(index.is_empty());
    }

    #[test]
    fn test_key_display_uses_double_colon() {
        assert_eq!(
            RecordTypeKey::new("Account", "Partner").to_string(),
            "Account::Partner"
        );
    }
}
