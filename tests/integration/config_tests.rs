//! Configuration loading tests

use clap::Parser;
use migration_sql_checker::config::{load_env_file, Settings};
use migration_sql_checker::{CheckerConfig, Cli};

#[test]
fn test_password_read_from_env_file() {
    let dir = tempfile::tempdir().unwrap();
    let env_file = dir.path().join(".env");
    std::fs::write(&env_file, "MIGRATION_CHECKER_DB_PASSWORD=fromdotenv\n").unwrap();

    let loaded = load_env_file(Some(&env_file));
    assert_eq!(loaded.as_deref(), Some(env_file.as_path()));

    // No -p on the command line
    let cli = Cli::try_parse_from([
        "migration-sql-checker",
        "-d",
        "mig",
        "-h",
        "127.0.0.1",
        "-u",
        "x",
    ])
    .unwrap();
    assert_eq!(cli.db_password, "fromdotenv");

    let config = CheckerConfig::from_parts(cli, Settings::default());
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_env_file_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_env_file(Some(&dir.path().join(".env"))).is_none());
}
