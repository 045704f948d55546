//! Data file types
//!
//! Shape of a tree-export data file: `{ "records": [ { "attributes": {...}, ... } ] }`.
//! Only the parts the pipeline touches are typed; everything else is carried
//! through as raw JSON.

use crate::record_type::RecordTypeKey;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field that carries the resolved record-type ID after rewriting
pub const RECORD_TYPE_ID_FIELD: &str = "RecordTypeId";

/// A whole data file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataFile {
    pub records: Vec<DataRecord>,
    /// Any other top-level keys, preserved as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single record in a data file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataRecord {
    pub attributes: RecordAttributes,
    /// Symbolic record-type reference from the source org
    #[serde(
        rename = "RecordType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub record_type: Option<RecordTypeRef>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// `attributes` block of a record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordAttributes {
    /// Object API name, e.g. `Account`
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `RecordType` sub-object of a record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordTypeRef {
    #[serde(rename = "DeveloperName")]
    pub developer_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DataRecord {
    /// Lookup key for this record's record-type reference, if it has one
    pub fn record_type_key(&self) -> Option<RecordTypeKey> {
        self.record_type.as_ref().map(|rt| {
            RecordTypeKey::new(self.attributes.object_type.clone(), rt.developer_name.clone())
        })
    }

    /// Replace the symbolic reference with the destination ID
    pub fn assign_record_type_id(&mut self, id: &str) {
        self.record_type = None;
        self.fields
            .insert(RECORD_TYPE_ID_FIELD.to_string(), Value::String(id.to_string()));
    }
}
