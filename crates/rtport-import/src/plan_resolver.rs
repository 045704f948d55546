//! Data plan resolution
//!
//! Expands a plan into the concrete data files it references and prepares an
//! updated plan pointing at the staged copies. Entries in the updated plan are
//! bare staged names: the plan is staged in the same directory as the data
//! files and the import tool resolves entries relative to the plan file.

use crate::naming;
use crate::services::{ImportServiceError, ImportServiceResult};
use crate::staging::StagingArea;
use rtport_import_types::{DataPlan, Filesystem};
use tracing::{debug, info};

/// A plan with its file set resolved, not yet staged
#[derive(Debug, Clone)]
pub struct ResolvedPlan {
    /// Data files to rewrite, in plan order
    pub files_to_process: Vec<String>,
    /// Plan with every `files` entry replaced by its staged name
    pub updated_plan: DataPlan,
    /// Where the updated plan will be staged
    pub staged_path: String,
}

pub struct PlanResolver<'a> {
    fs: &'a dyn Filesystem,
}

impl<'a> PlanResolver<'a> {
    pub fn new(fs: &'a dyn Filesystem) -> Self {
        Self { fs }
    }

    /// Read and resolve the plan at `plan_path`
    pub async fn resolve(
        &self,
        plan_path: &str,
        staging: &StagingArea,
    ) -> ImportServiceResult<ResolvedPlan> {
        let content = self
            .fs
            .read_to_string(plan_path)
            .await
            .map_err(|e| ImportServiceError::PlanProcessing(e.to_string()))?;

        let mut plan: DataPlan = serde_json::from_str(&content)
            .map_err(|e| ImportServiceError::PlanProcessing(format!("{}: {}", plan_path, e)))?;

        let base = naming::base_directory(plan_path);
        let staged_path = staging.staged_path(plan_path);
        let mut files_to_process = Vec::new();

        for entry in plan.entries.iter_mut() {
            let Some(files) = entry.files.as_mut() else {
                continue;
            };

            for file in files.iter_mut() {
                let resolved = format!("{}{}", base, file);
                if staging.staged_path(&resolved) == staged_path {
                    return Err(ImportServiceError::PlanProcessing(format!(
                        "data file {} would overwrite the staged plan {}",
                        resolved, staged_path
                    )));
                }

                *file = naming::normalize(&resolved, None);
                files_to_process.push(resolved);
            }
        }

        info!(
            "Plan {} references {} data file(s)",
            plan_path,
            files_to_process.len()
        );

        Ok(ResolvedPlan {
            files_to_process,
            updated_plan: plan,
            staged_path,
        })
    }
}

impl ResolvedPlan {
    /// Write the updated plan into the staging area and return its path
    pub async fn stage(&self, staging: &StagingArea) -> ImportServiceResult<String> {
        let json = serde_json::to_string(&self.updated_plan)
            .map_err(|e| ImportServiceError::PlanProcessing(e.to_string()))?;

        staging
            .write(&self.staged_path, &json)
            .await
            .map_err(|e| ImportServiceError::PlanProcessing(e.to_string()))?;

        debug!("Staged updated plan at {}", self.staged_path);
        Ok(self.staged_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtport_import_types::{ImportError, ImportResult, LocalFilesystem};
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    async fn setup(plan: &str) -> (TempDir, String, StagingArea) {
        let root = TempDir::new().unwrap();
        let plan_path = root.path().join("plan.json");
        std::fs::write(&plan_path, plan).unwrap();
        let staging = StagingArea::acquire(
            root.path().join("staging").to_str().unwrap(),
            Arc::new(LocalFilesystem::new()),
        )
        .await
        .unwrap();
        let plan_path = plan_path.to_str().unwrap().to_string();
        (root, plan_path, staging)
    }

    #[tokio::test]
    async fn test_resolves_files_relative_to_plan_directory() {
        let (root, plan_path, staging) =
            setup(r#"[{"sobject": "Account", "files": ["Account.json", "Contact.json"]}]"#).await;
        let base = format!("{}/", root.path().to_str().unwrap());
        let fs = LocalFilesystem::new();

        let resolved = PlanResolver::new(&fs)
            .resolve(&plan_path, &staging)
            .await
            .unwrap();

        assert_eq!(
            resolved.files_to_process,
            vec![format!("{}Account.json", base), format!("{}Contact.json", base)]
        );
        assert_eq!(
            resolved.updated_plan.entries[0].files,
            Some(vec![
                "Accountupdated.json".to_string(),
                "Contactupdated.json".to_string()
            ])
        );
        assert!(resolved.staged_path.ends_with("staging/planupdated.json"));

        staging.release().await;
    }

    #[derive(Default)]
    struct MemoryFs {
        files: Mutex<HashMap<String, String>>,
    }

    #[async_trait::async_trait]
    impl Filesystem for MemoryFs {
        async fn read_to_string(&self, path: &str) -> ImportResult<String> {
            self.files.lock().unwrap().get(path).cloned().ok_or_else(|| {
                ImportError::io(path, std::io::Error::from(std::io::ErrorKind::NotFound))
            })
        }

        async fn write(&self, path: &str, contents: &str) -> ImportResult<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_string(), contents.to_string());
            Ok(())
        }

        async fn create_dir_all(&self, _path: &str) -> ImportResult<()> {
            Ok(())
        }

        async fn remove_dir_all(&self, _path: &str) -> ImportResult<()> {
            Ok(())
        }

        async fn list_dir(&self, path: &str) -> ImportResult<Vec<String>> {
            let prefix = format!("{}/", path.trim_end_matches('/'));
            let names: Vec<String> = self
                .files
                .lock()
                .unwrap()
                .keys()
                .filter_map(|key| key.strip_prefix(&prefix).map(str::to_string))
                .collect();
            if names.is_empty() {
                return Err(ImportError::io(
                    path,
                    std::io::Error::from(std::io::ErrorKind::NotFound),
                ));
            }
            Ok(names)
        }
    }

    #[tokio::test]
    async fn test_absolute_plan_path_prefixes_its_directory() {
        let fs = Arc::new(MemoryFs::default());
        fs.write("/x/plan.json", r#"[{"files": ["Account.json","Contact.json"]}]"#)
            .await
            .unwrap();
        let staging = StagingArea::acquire("tempFilesWithRecordTypes", fs.clone())
            .await
            .unwrap();

        let resolved = PlanResolver::new(fs.as_ref())
            .resolve("/x/plan.json", &staging)
            .await
            .unwrap();

        assert_eq!(
            resolved.files_to_process,
            vec!["/x/Account.json".to_string(), "/x/Contact.json".to_string()]
        );
        assert_eq!(
            resolved.updated_plan.file_references().collect::<Vec<_>>(),
            vec!["Accountupdated.json", "Contactupdated.json"]
        );
        assert_eq!(
            resolved.staged_path,
            "tempFilesWithRecordTypes/planupdated.json"
        );

        staging.release().await;
    }

    #[tokio::test]
    async fn test_entries_without_files_are_left_alone() {
        let (_root, plan_path, staging) = setup(
            r#"[{"sobject": "Note", "saveRefs": true}, {"sobject": "Account", "files": ["sub/Account.json"]}]"#,
        )
        .await;
        let fs = LocalFilesystem::new();

        let resolved = PlanResolver::new(&fs)
            .resolve(&plan_path, &staging)
            .await
            .unwrap();

        assert_eq!(resolved.files_to_process.len(), 1);
        assert!(resolved.files_to_process[0].ends_with("/sub/Account.json"));
        assert!(resolved.updated_plan.entries[0].files.is_none());
        assert_eq!(
            resolved.updated_plan.entries[0].extra["saveRefs"],
            Value::Bool(true)
        );

        staging.release().await;
    }

    #[tokio::test]
    async fn test_stage_writes_updated_plan() {
        let (_root, plan_path, staging) =
            setup(r#"[{"sobject": "Account", "saveRefs": true, "files": ["Account.json"]}]"#).await;
        let fs = LocalFilesystem::new();

        let resolved = PlanResolver::new(&fs)
            .resolve(&plan_path, &staging)
            .await
            .unwrap();
        let staged = resolved.stage(&staging).await.unwrap();

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&staged).unwrap()).unwrap();
        assert_eq!(written[0]["files"][0], "Accountupdated.json");
        assert_eq!(written[0]["saveRefs"], true);
        assert_eq!(written[0]["sobject"], "Account");

        staging.release().await;
    }

    #[tokio::test]
    async fn test_unparseable_plan_is_a_plan_processing_failure() {
        let (_root, plan_path, staging) = setup("not json").await;
        let fs = LocalFilesystem::new();

        let err = PlanResolver::new(&fs)
            .resolve(&plan_path, &staging)
            .await
            .unwrap_err();

        assert!(matches!(err, ImportServiceError::PlanProcessing(_)));

        staging.release().await;
    }

    #[tokio::test]
    async fn test_missing_plan_is_a_plan_processing_failure() {
        let (root, _plan_path, staging) = setup("[]").await;
        let missing = root.path().join("absent.json");
        let fs = LocalFilesystem::new();

        let err = PlanResolver::new(&fs)
            .resolve(missing.to_str().unwrap(), &staging)
            .await
            .unwrap_err();

        assert!(matches!(err, ImportServiceError::PlanProcessing(_)));

        staging.release().await;
    }

    #[tokio::test]
    async fn test_data_file_named_like_plan_is_rejected() {
        let (_root, plan_path, staging) = setup(r#"[{"files": ["plan.json"]}]"#).await;
        let fs = LocalFilesystem::new();

        let err = PlanResolver::new(&fs)
            .resolve(&plan_path, &staging)
            .await
            .unwrap_err();

        assert!(matches!(err, ImportServiceError::PlanProcessing(_)));

        staging.release().await;
    }
}
