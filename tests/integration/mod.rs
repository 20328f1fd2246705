//! Integration tests module
//!
//! Runs the full checker against temporary directories, an in-memory
//! ledger source and a mock Slack webhook.

mod config_tests;
mod directory_tests;
mod notification_tests;
