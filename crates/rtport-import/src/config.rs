//! Run configuration

use rtport_import_types::{ImportError, ImportResult};
use std::time::Duration;

/// Staging directory used when none is configured
pub const DEFAULT_STAGING_DIR: &str = "tempFilesWithRecordTypes";

/// Settings for a single import run
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Directory the rewritten files are staged in
    pub staging_dir: String,
    /// Append a unique suffix to the staging directory for every run
    pub isolated_staging: bool,
    /// Upper bound for the import tool invocation; `None` waits forever
    pub import_timeout: Option<Duration>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            staging_dir: DEFAULT_STAGING_DIR.to_string(),
            isolated_staging: false,
            import_timeout: None,
        }
    }
}

impl ImportConfig {
    /// Create a configuration, falling back to defaults for unset values
    pub fn new(
        staging_dir: Option<String>,
        isolated_staging: bool,
        import_timeout_secs: Option<u64>,
    ) -> ImportResult<Self> {
        let staging_dir = staging_dir.unwrap_or_else(|| DEFAULT_STAGING_DIR.to_string());
        let trimmed = staging_dir.trim().trim_end_matches('/');
        if trimmed.is_empty() || trimmed == "." {
            return Err(ImportError::InvalidConfiguration(format!(
                "staging directory '{}' would point at the working directory",
                staging_dir
            )));
        }

        if trimmed.split('/').any(|component| component == "..") {
            return Err(ImportError::InvalidConfiguration(format!(
                "staging directory '{}' must not climb out through '..'",
                staging_dir
            )));
        }

        let import_timeout = match import_timeout_secs {
            Some(0) => {
                return Err(ImportError::InvalidConfiguration(
                    "import timeout must be at least one second".to_string(),
                ))
            }
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        Ok(Self {
            staging_dir: trimmed.to_string(),
            isolated_staging,
            import_timeout,
        })
    }

    /// Staging directory for one run
    pub fn staging_dir_for_run(&self) -> String {
        if self.isolated_staging {
            format!("{}-{}", self.staging_dir, uuid::Uuid::new_v4().simple())
        } else {
            self.staging_dir.clone()
        }
    }
}
