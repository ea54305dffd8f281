use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::{RecallError, Result};
use crate::models::Conversation;
use crate::normalizer::{normalize_value, NormalizerConfig};

/// A file left out of a directory import, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DirectoryImport {
    pub conversations: Vec<Conversation>,
    pub files_imported: usize,
    pub skipped: Vec<SkippedFile>,
}

/// Outcome of an import that went all the way to the store.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub conversations: usize,
    pub chunks: usize,
    pub files_imported: usize,
    pub skipped: Vec<SkippedFile>,
}

/// Reads JSON exports from disk and normalizes them.
#[derive(Debug, Clone, Default)]
pub struct ImportService {
    config: NormalizerConfig,
}

impl ImportService {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize an already-parsed document.
    pub fn import_value(&self, value: &Value) -> Vec<Conversation> {
        normalize_value(value, &self.config)
    }

    /// Parse and normalize a JSON string.
    pub fn import_str(&self, json: &str) -> Result<Vec<Conversation>> {
        let value: Value = serde_json::from_str(json)?;
        Ok(self.import_value(&value))
    }

    /// Read, parse and normalize one file. IO and JSON errors are returned.
    pub fn import_file(&self, path: impl AsRef<Path>) -> Result<Vec<Conversation>> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let conversations = self.import_str(&contents)?;

        tracing::info!(
            file = %path.display(),
            conversations = conversations.len(),
            "Imported conversation file"
        );
        Ok(conversations)
    }

    /// Import every `*.json` file directly inside `dir`, in file-name order.
    ///
    /// A file that cannot be read or parsed is logged and reported in
    /// `skipped`; the remaining files still import.
    pub fn import_directory(&self, dir: impl AsRef<Path>) -> Result<DirectoryImport> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Err(RecallError::not_found(format!(
                "directory {}",
                dir.display()
            )));
        }
        if !dir.is_dir() {
            return Err(RecallError::import(format!(
                "{} is not a directory",
                dir.display()
            )));
        }

        let start_time = Instant::now();
        let files = json_files(dir)?;
        let mut result = DirectoryImport::default();

        for path in files {
            match self.import_file(&path) {
                Ok(conversations) => {
                    result.conversations.extend(conversations);
                    result.files_imported += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        file = %path.display(),
                        error = %e,
                        category = e.category(),
                        "Skipping unreadable conversation file"
                    );
                    result.skipped.push(SkippedFile {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            directory = %dir.display(),
            files = result.files_imported,
            skipped = result.skipped.len(),
            conversations = result.conversations.len(),
            duration_ms = start_time.elapsed().as_millis() as u64,
            "Imported conversation directory"
        );
        Ok(result)
    }
}

/// Non-recursive listing of `*.json` files (extension matched
/// case-insensitively), sorted by file name.
fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json && entry.file_type()?.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
