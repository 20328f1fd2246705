//! Business logic services

pub mod checker;
pub mod matcher;
pub mod migration_directory;
pub mod notification;
pub mod reconciler;
pub mod report_formatter;

pub use checker::{CheckOutcome, CheckSummary, MigrationChecker};
pub use migration_directory::MigrationDirectory;
pub use notification::SlackNotifier;
pub use reconciler::{AppliedSets, Reconciler};
pub use report_formatter::ReportFormatter;
