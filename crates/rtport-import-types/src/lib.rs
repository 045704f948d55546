//! Core types and traits for the rtport import pipeline
//!
//! This crate provides the foundational abstractions for moving exported
//! Salesforce sample data into a different org: the data and plan file
//! formats, the record-type lookup table, and the seams to the systems the
//! pipeline talks to.
//!
//! # Architecture
//!
//! - **Traits**: `OrgConnection`, `ImportRunner` and `Filesystem` describe the
//!   collaborators the pipeline consumes
//! - **Types**: `DataFile`, `DataPlan`, `RecordTypeIndex`, etc.
//! - **Errors**: Unified error handling across collaborator implementations
//!
//! # Usage
//!
//! Collaborator implementations (e.g., `rtport-import-sfdx`) depend on this
//! crate and implement its traits.

pub mod error;
pub mod fs;
pub mod importer;
pub mod plan;
pub mod record;
pub mod record_type;
pub mod validation;

pub use error::{ImportError, ImportResult};
pub use fs::{Filesystem, LocalFilesystem};
pub use importer::{ImportRunner, OrgConnection, QueryResult, StagedImport, RECORD_TYPE_QUERY};
pub use plan::{DataPlan, PlanEntry};
pub use record::{DataFile, DataRecord, RecordAttributes, RecordTypeRef};
pub use record_type::{RecordTypeIndex, RecordTypeKey, RecordTypeRow};
pub use validation::{ResolutionMiss, ResolutionReport};
