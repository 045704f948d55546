//! Data plan types
//!
//! A plan is a JSON array of groups, each naming an object and the data files
//! that hold its records. Only `files` is ever rewritten.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered sequence of plan entries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataPlan {
    pub entries: Vec<PlanEntry>,
}

/// One group within a plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanEntry {
    /// Object API name the group imports into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sobject: Option<String>,
    /// Data files for this group, relative to the plan's directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    /// Remaining keys (`saveRefs`, `resolveRefs`, ...), preserved as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DataPlan {
    /// Every file reference in plan order
    pub fn file_references(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter_map(|entry| entry.files.as_ref())
            .flatten()
            .map(String::as_str)
    }
}
