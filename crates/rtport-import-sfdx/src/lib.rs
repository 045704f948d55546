//! Salesforce CLI collaborators
//!
//! Implements `OrgConnection` and `ImportRunner` by shelling out to the
//! Salesforce CLI, in either its legacy `sfdx` or its current `sf` flavor.

pub mod cli;
pub mod connection;
pub mod error;
pub mod runner;

pub use cli::{SfCli, SfCliFlavor};
pub use connection::SfdxOrgConnection;
pub use error::{SfdxError, SfdxResult};
pub use runner::SfdxImportRunner;
