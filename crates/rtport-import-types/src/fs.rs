//! Filesystem capability consumed by the pipeline
//!
//! The pipeline never touches `std::fs` directly; it goes through this trait so
//! the staging lifecycle can be observed and replaced in tests.

use crate::error::{ImportError, ImportResult};
use async_trait::async_trait;
use tracing::debug;

/// Minimal set of filesystem primitives the pipeline needs
#[async_trait]
pub trait Filesystem: Send + Sync {
    /// Read a whole file as UTF-8 text
    async fn read_to_string(&self, path: &str) -> ImportResult<String>;

    /// Create or truncate a file with the given contents
    async fn write(&self, path: &str, contents: &str) -> ImportResult<()>;

    /// Create a directory and all of its parents
    async fn create_dir_all(&self, path: &str) -> ImportResult<()>;

    /// Remove a directory and everything below it
    async fn remove_dir_all(&self, path: &str) -> ImportResult<()>;

    /// Names of the entries directly inside a directory
    async fn list_dir(&self, path: &str) -> ImportResult<Vec<String>>;
}

/// Local disk implementation backed by `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Filesystem for LocalFilesystem {
    async fn read_to_string(&self, path: &str) -> ImportResult<String> {
        debug!("Reading {}", path);
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ImportError::io(path, e))
    }

    async fn write(&self, path: &str, contents: &str) -> ImportResult<()> {
        debug!("Writing {} ({} bytes)", path, contents.len());
        tokio::fs::write(path, contents)
            .await
            .map_err(|e| ImportError::io(path, e))
    }

    async fn create_dir_all(&self, path: &str) -> ImportResult<()> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| ImportError::io(path, e))
    }

    async fn remove_dir_all(&self, path: &str) -> ImportResult<()> {
        tokio::fs::remove_dir_all(path)
            .await
            .map_err(|e| ImportError::io(path, e))
    }

    async fn list_dir(&self, path: &str) -> ImportResult<Vec<String>> {
        let mut entries = tokio::fs::read_dir(path)
            .await
            .map_err(|e| ImportError::io(path, e))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ImportError::io(path, e))?
        {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read_roundtrips_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.json");
        let path = path.to_str().unwrap();
        let fs = LocalFilesystem::new();

        fs.write(path, "{\"records\":[]}").await.unwrap();

        assert_eq!(fs.read_to_string(path).await.unwrap(), "{\"records\":[]}");
    }

    #[tokio::test]
    async fn test_missing_file_reports_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.json");
        let fs = LocalFilesystem::new();

        let err = fs.read_to_string(path.to_str().unwrap()).await.unwrap_err();

        assert!(err.is_not_found());
        assert!(err.to_string().contains("missing.json"));
    }

    #[tokio::test]
    async fn test_remove_dir_all_of_absent_directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("never-created");
        let fs = LocalFilesystem::new();

        let err = fs
            .remove_dir_all(path.to_str().unwrap())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_dir_names_entries_and_reports_absent_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Account.json"), "{}").unwrap();
        let fs = LocalFilesystem::new();

        let names = fs.list_dir(dir.path().to_str().unwrap()).await.unwrap();
        let err = fs
            .list_dir(dir.path().join("absent").to_str().unwrap())
            .await
            .unwrap_err();

        assert_eq!(names, vec!["Account.json".to_string()]);
        assert!(err.is_not_found());
    }
}
