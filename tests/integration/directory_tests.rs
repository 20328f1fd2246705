//! Migration directory listing tests

use crate::common::*;
use migration_sql_checker::services::MigrationDirectory;
use migration_sql_checker::CheckerError;

#[tokio::test]
async fn test_lists_only_top_level_sql_files() {
    let fixture = MigrationFixture::with_files(&[
        "20230102_01_cmn_b.sql",
        "20230101_01_cmn_a.sql",
        "README.md",
        "20230103_01_cmn_c.sql.bak",
    ])
    .with_subdir("archive", &["20220101_01_cmn_old.sql"]);

    let names = MigrationDirectory::new(fixture.path()).scan().await.unwrap();

    assert_eq!(
        names,
        vec![
            "20230101_01_cmn_a.sql".to_string(),
            "20230102_01_cmn_b.sql".to_string()
        ]
    );
}

#[tokio::test]
async fn test_directory_named_like_sql_is_skipped() {
    let fixture = MigrationFixture::with_files(&["20230101_01_cmn_a.sql"])
        .with_subdir("20230105_01_cmn_dir.sql", &[]);

    let names = MigrationDirectory::new(fixture.path()).scan().await.unwrap();

    assert_eq!(names, vec!["20230101_01_cmn_a.sql".to_string()]);
}

#[tokio::test]
async fn test_missing_directory_is_an_io_error() {
    let fixture = MigrationFixture::with_files(&[]);
    let missing = fixture.path().join("does-not-exist");

    let result = MigrationDirectory::new(&missing).scan().await;

    match result {
        Err(CheckerError::Io { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected io error, got {:?}", other),
    }
}
