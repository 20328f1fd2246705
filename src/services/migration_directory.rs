//! Migration directory listing

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::utils::{CheckerError, CheckerResult};

const MIGRATION_EXTENSION: &str = "sql";

/// Directory of migration SQL files; only file names are ever read
pub struct MigrationDirectory {
    path: PathBuf,
}

impl MigrationDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of the `.sql` files directly inside the directory, sorted
    pub async fn scan(&self) -> CheckerResult<Vec<String>> {
        let io_error = |source| CheckerError::Io {
            path: self.path.clone(),
            source,
        };

        let mut entries = tokio::fs::read_dir(&self.path).await.map_err(io_error)?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(MIGRATION_EXTENSION) {
                continue;
            }

            // Follows symlinks; dangling links are skipped
            match tokio::fs::metadata(&path).await {
                Ok(metadata) if metadata.is_file() => {}
                _ => continue,
            }

            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => warn!(file = ?name, "Skipping non UTF-8 file name"),
            }
        }

        names.sort();
        debug!(directory = ?self.path, count = names.len(), "Listed migration SQL files");

        Ok(names)
    }
}
