//! rtport import pipeline
//!
//! Rewrites exported Salesforce data files so their record-type references
//! point at the destination org, stages the rewritten files, and hands them to
//! the bulk import tool.
//!
//! # Architecture
//!
//! - **naming**: derives staged file names from input paths
//! - **staging**: owns the temporary directory holding rewritten files
//! - **rewriter**: substitutes record-type references in data files
//! - **plan_resolver**: expands a data plan into the files it references
//! - **services**: the orchestrator sequencing a whole run
//!
//! # Usage
//!
//! Build an `ImportOrchestrator` from an `OrgConnection`, an `ImportRunner`
//! and a `Filesystem`, then call `run` with the requested files or plan.

pub mod config;
pub mod naming;
pub mod plan_resolver;
pub mod rewriter;
pub mod services;
pub mod staging;

pub use config::ImportConfig;
pub use services::{
    ImportOrchestrator, ImportOutcome, ImportRequest, ImportServiceError, ImportServiceResult,
};
pub use staging::StagingArea;
