//! Staging area for rewritten files
//!
//! A `StagingArea` is acquired once per run and must be released at the end of
//! it, whatever the outcome. Releasing deletes the whole directory, so a
//! directory that already holds files is never adopted. Dropping an unreleased
//! area only logs; the directory is left on disk.

use crate::naming;
use rtport_import_types::{Filesystem, ImportError, ImportResult};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StagingArea {
    dir: String,
    fs: Arc<dyn Filesystem>,
    released: bool,
}

impl std::fmt::Debug for StagingArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagingArea")
            .field("dir", &self.dir)
            .field("released", &self.released)
            .finish()
    }
}

impl StagingArea {
    /// Create the staging directory
    ///
    /// An existing empty directory is reused. A non-empty one is refused.
    pub async fn acquire(dir: impl Into<String>, fs: Arc<dyn Filesystem>) -> ImportResult<Self> {
        let dir = dir.into();
        match fs.list_dir(&dir).await {
            Ok(entries) if !entries.is_empty() => {
                return Err(ImportError::InvalidConfiguration(format!(
                    "staging directory {} already exists and is not empty",
                    dir
                )))
            }
            Ok(_) => debug!("Reusing empty staging directory {}", dir),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        fs.create_dir_all(&dir).await?;
        debug!("Staging area ready at {}", dir);

        Ok(Self {
            dir,
            fs,
            released: false,
        })
    }

    pub fn dir(&self) -> &str {
        &self.dir
    }

    /// Path a file with the given original path is staged under
    pub fn staged_path(&self, original: &str) -> String {
        naming::normalize(original, Some(&self.dir))
    }

    /// Write a staged file
    pub async fn write(&self, staged_path: &str, contents: &str) -> ImportResult<()> {
        self.fs.write(staged_path, contents).await
    }

    /// Remove the staging directory and everything in it
    ///
    /// Failures are logged, never returned: cleanup must not mask the run's
    /// own outcome.
    pub async fn release(mut self) {
        self.released = true;

        match self.fs.remove_dir_all(&self.dir).await {
            Ok(()) => info!("Removed staging area {}", self.dir),
            Err(e) if e.is_not_found() => debug!("Staging area {} already absent", self.dir),
            Err(e) => warn!("Failed to remove staging area {}: {}", self.dir, e),
        }
    }
}

impl Drop for StagingArea {
    fn drop(&mut self) {
        if !self.released {
            warn!(
                "Staging area {} dropped without release, leaving it on disk",
                self.dir
            );
        }
    }
}
