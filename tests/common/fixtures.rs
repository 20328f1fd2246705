//! Test fixtures
//!
//! Temporary migration directories and ready-made checker configurations.

use std::path::Path;

use clap::Parser;
use migration_sql_checker::config::Settings;
use migration_sql_checker::{CheckerConfig, Cli};
use tempfile::TempDir;

/// Temporary migration directory, removed on drop
pub struct MigrationFixture {
    dir: TempDir,
}

impl MigrationFixture {
    /// Create a directory holding empty files with the given names
    pub fn with_files(names: &[&str]) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        for name in names {
            std::fs::write(dir.path().join(name), "-- migration\n").expect("write fixture file");
        }
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a subdirectory with files that must not be listed
    pub fn with_subdir(self, name: &str, files: &[&str]) -> Self {
        let sub = self.dir.path().join(name);
        std::fs::create_dir_all(&sub).expect("create subdir");
        for file in files {
            std::fs::write(sub.join(file), "-- nested\n").expect("write nested file");
        }
        self
    }
}

/// Build a configuration the way the binary would from flags
pub fn test_config(directory: &Path, extra_args: &[&str]) -> CheckerConfig {
    let directory = directory.to_string_lossy().to_string();
    let mut args = vec![
        "migration-sql-checker".to_string(),
        "-d".to_string(),
        directory,
        "-h".to_string(),
        "127.0.0.1".to_string(),
        "-u".to_string(),
        "auditor".to_string(),
        "-p".to_string(),
        "secret".to_string(),
    ];
    args.extend(extra_args.iter().map(|a| a.to_string()));

    let cli = Cli::try_parse_from(args).expect("valid test flags");
    let config = CheckerConfig::from_parts(cli, Settings::default());
    config.validate().expect("valid test configuration");
    config
}
