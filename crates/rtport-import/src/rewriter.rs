//! Record-type substitution for data files
//!
//! Works in two phases: every file is read, parsed and resolved first, and
//! only when the whole batch resolved cleanly is anything written to the
//! staging area.

use crate::services::{ImportServiceError, ImportServiceResult};
use crate::staging::StagingArea;
use futures::future::try_join_all;
use rtport_import_types::{DataFile, Filesystem, RecordTypeIndex, ResolutionReport};
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub struct FileRewriter<'a> {
    index: &'a RecordTypeIndex,
    fs: &'a dyn Filesystem,
}

impl<'a> FileRewriter<'a> {
    pub fn new(index: &'a RecordTypeIndex, fs: &'a dyn Filesystem) -> Self {
        Self { index, fs }
    }

    /// Rewrite `files` into the staging area
    ///
    /// Returns the staged paths in the same order as `files`.
    pub async fn rewrite(
        &self,
        files: &[String],
        staging: &StagingArea,
    ) -> ImportServiceResult<Vec<String>> {
        info!("Rewriting record types in {} data file(s)", files.len());

        let contents = try_join_all(files.iter().map(|file| self.fs.read_to_string(file)))
            .await
            .map_err(|e| ImportServiceError::FileProcessing(e.to_string()))?;

        let mut report = ResolutionReport::new();
        let mut rewritten = Vec::with_capacity(files.len());
        for (file, content) in files.iter().zip(contents) {
            let (data, file_report) = self.substitute(file, &content)?;
            report.merge(file_report);
            rewritten.push((staging.staged_path(file), data));
        }

        if !report.can_proceed() {
            for miss in &report.misses {
                warn!(
                    "{}: record {} references record type {} which is not in the target org",
                    miss.file, miss.record_index, miss.key
                );
            }
            return Err(ImportServiceError::MissingRecordTypes(
                report.missing_keys(),
            ));
        }
        debug!(
            "Resolved {} record type reference(s)",
            report.resolved_count
        );

        let mut seen = HashSet::new();
        for ((staged, _), file) in rewritten.iter().zip(files) {
            if !seen.insert(staged.as_str()) {
                return Err(ImportServiceError::FileProcessing(format!(
                    "{} would overwrite staged file {}",
                    file, staged
                )));
            }
        }

        let serialized = rewritten
            .iter()
            .map(|(staged, data)| serde_json::to_string(data).map(|json| (staged, json)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ImportServiceError::FileProcessing(e.to_string()))?;

        try_join_all(
            serialized
                .iter()
                .map(|(staged, json)| staging.write(staged, json)),
        )
        .await
        .map_err(|e| ImportServiceError::FileProcessing(e.to_string()))?;

        Ok(rewritten.into_iter().map(|(staged, _)| staged).collect())
    }

    /// Parse one file and replace every resolvable reference
    ///
    /// Unresolvable references are left in place and reported.
    pub fn substitute(
        &self,
        file: &str,
        content: &str,
    ) -> ImportServiceResult<(DataFile, ResolutionReport)> {
        let mut data: DataFile = serde_json::from_str(content)
            .map_err(|e| ImportServiceError::FileProcessing(format!("{}: {}", file, e)))?;

        let mut report = ResolutionReport::new();
        for (record_index, record) in data.records.iter_mut().enumerate() {
            let Some(key) = record.record_type_key() else {
                continue;
            };
            match self.index.resolve(&key) {
                Some(id) => {
                    record.assign_record_type_id(id);
                    report.record_resolved();
                }
                None => report.record_miss(file, record_index, key),
            }
        }

        Ok((data, report))
    }
}
