//! Salesforce CLI invocation
//!
//! Builds the argument lists for each flavor and runs the executable with
//! `--json`, unwrapping the `{status, result, message}` envelope every
//! command prints in that mode.

use rtport_import_types::StagedImport;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tokio::process::Command;
use tracing::{debug, error};

use crate::error::{SfdxError, SfdxResult};

/// Which generation of the Salesforce CLI to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SfCliFlavor {
    /// `sfdx force:*` commands
    #[default]
    Sfdx,
    /// `sf` commands
    Sf,
}

impl SfCliFlavor {
    /// Executable name used when no explicit path is configured
    pub fn program(&self) -> &'static str {
        match self {
            SfCliFlavor::Sfdx => "sfdx",
            SfCliFlavor::Sf => "sf",
        }
    }
}

impl fmt::Display for SfCliFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

impl FromStr for SfCliFlavor {
    type Err = SfdxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sfdx" => Ok(SfCliFlavor::Sfdx),
            "sf" => Ok(SfCliFlavor::Sf),
            other => Err(SfdxError::UnknownFlavor(other.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: i64,
    #[serde(default)]
    result: Value,
    #[serde(default)]
    message: Option<String>,
}

/// A configured Salesforce CLI executable
#[derive(Debug, Clone)]
pub struct SfCli {
    flavor: SfCliFlavor,
    program: String,
}

impl SfCli {
    /// Use `program` if given, otherwise the flavor's executable from `PATH`
    pub fn new(flavor: SfCliFlavor, program: Option<String>) -> Self {
        let program = program.unwrap_or_else(|| flavor.program().to_string());
        Self { flavor, program }
    }

    pub fn flavor(&self) -> SfCliFlavor {
        self.flavor
    }

    /// Arguments describing an org, used to resolve an alias
    pub fn org_display_args(&self, alias: &str) -> Vec<String> {
        let args: &[&str] = match self.flavor {
            SfCliFlavor::Sfdx => &["force:org:display", "-u", alias, "--json"],
            SfCliFlavor::Sf => &["org", "display", "--target-org", alias, "--json"],
        };
        args.iter().map(|arg| arg.to_string()).collect()
    }

    /// Arguments running a SOQL query against an org
    pub fn query_args(&self, username: &str, soql: &str) -> Vec<String> {
        let args: &[&str] = match self.flavor {
            SfCliFlavor::Sfdx => &["force:data:soql:query", "-u", username, "-q", soql, "--json"],
            SfCliFlavor::Sf => &[
                "data",
                "query",
                "--target-org",
                username,
                "--query",
                soql,
                "--json",
            ],
        };
        args.iter().map(|arg| arg.to_string()).collect()
    }

    /// Arguments importing staged data files or a staged plan
    pub fn import_args(&self, username: &str, staged: &StagedImport) -> Vec<String> {
        let (files_flag, plan_flag) = match self.flavor {
            SfCliFlavor::Sfdx => ("-f", "-p"),
            SfCliFlavor::Sf => ("--files", "--plan"),
        };
        let source_flag = match staged {
            StagedImport::DataFiles(_) => files_flag,
            StagedImport::DataPlan(_) => plan_flag,
        };

        let mut args: Vec<String> = match self.flavor {
            SfCliFlavor::Sfdx => vec!["force:data:tree:import".into(), "-u".into()],
            SfCliFlavor::Sf => vec![
                "data".into(),
                "import".into(),
                "tree".into(),
                "--target-org".into(),
            ],
        };
        args.push(username.to_string());
        args.push(source_flag.to_string());
        args.push(staged.argument());
        args.push("--json".to_string());
        args
    }

    /// Run the executable and return the envelope's `result`
    pub async fn run_json(&self, args: &[String]) -> SfdxResult<Value> {
        let command = self.describe(args);
        debug!("Executing {}", command);

        // A timed-out import must not keep running once its future is dropped
        let output = Command::new(&self.program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| SfdxError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            error!(
                "{} exited with {}\nSTDOUT:\n{}\nSTDERR:\n{}",
                command,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }

        parse_envelope(&command, &output.stdout, output.status.success())
    }

    fn describe(&self, args: &[String]) -> String {
        match args.first() {
            Some(first) => format!("{} {}", self.program, first),
            None => self.program.clone(),
        }
    }
}

/// Unwrap the JSON envelope printed by a `--json` invocation
pub fn parse_envelope(command: &str, stdout: &[u8], exited_ok: bool) -> SfdxResult<Value> {
    let envelope: Envelope = match serde_json::from_slice(stdout) {
        Ok(envelope) => envelope,
        Err(e) if exited_ok => {
            return Err(SfdxError::InvalidOutput {
                command: command.to_string(),
                reason: e.to_string(),
            })
        }
        Err(_) => {
            return Err(SfdxError::CommandFailed {
                command: command.to_string(),
                message: String::from_utf8_lossy(stdout).trim().to_string(),
            })
        }
    };

    if !exited_ok || envelope.status != 0 {
        return Err(SfdxError::CommandFailed {
            command: command.to_string(),
            message: envelope
                .message
                .unwrap_or_else(|| format!("status {}", envelope.status)),
        });
    }

    Ok(envelope.result)
}
