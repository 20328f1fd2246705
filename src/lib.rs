//! Migration SQL Checker Library
//!
//! Verifies that every versioned migration SQL file has been applied to the
//! shards it targets and reports the gaps to a Slack channel.

pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod utils;

pub use config::{CheckerConfig, Cli};
pub use db::{AppliedStateSource, MigrationHistoryRepository};
pub use services::{CheckOutcome, CheckSummary, MigrationChecker};
pub use utils::{CheckerError, CheckerResult};
