//! Record-type resolution report for pre-flight checks

use crate::record_type::RecordTypeKey;
use serde::{Deserialize, Serialize};

/// A record whose record-type reference is absent from the destination org
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionMiss {
    /// Data file the record came from, as supplied
    pub file: String,
    /// Position of the record within the file
    pub record_index: usize,
    /// Reference that could not be resolved
    pub key: RecordTypeKey,
}

/// Outcome of resolving every reference in a batch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolutionReport {
    /// References that resolved
    pub resolved_count: usize,
    /// References that did not
    pub misses: Vec<ResolutionMiss>,
}

impl ResolutionReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_resolved(&mut self) {
        self.resolved_count += 1;
    }

    pub fn record_miss(&mut self, file: &str, record_index: usize, key: RecordTypeKey) {
        self.misses.push(ResolutionMiss {
            file: file.to_string(),
            record_index,
            key,
        });
    }

    /// Fold another file's report into this one
    pub fn merge(&mut self, other: ResolutionReport) {
        self.resolved_count += other.resolved_count;
        self.misses.extend(other.misses);
    }

    /// Whether every reference resolved
    pub fn can_proceed(&self) -> bool {
        self.misses.is_empty()
    }

    /// Distinct missing keys, in first-seen order
    pub fn missing_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for miss in &self.misses {
            let key = miss.key.to_string();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }
}
