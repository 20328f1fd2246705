//! Migration check orchestration
//!
//! Runs the whole audit in sequence: list the directory, read every shard's
//! ledger in registry order, reconcile, format, deliver. The first failure
//! aborts the run so a partial dataset is never reported.

use serde::Serialize;
use tracing::{info, warn};

use crate::config::CheckerConfig;
use crate::db::AppliedStateSource;
use crate::models::{Reconciliation, ShardRegistry, SlackPayload};
use crate::services::migration_directory::MigrationDirectory;
use crate::services::notification::SlackNotifier;
use crate::services::reconciler::{AppliedSets, Reconciler};
use crate::services::report_formatter::ReportFormatter;
use crate::utils::CheckerResult;

/// High-level result of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum CheckOutcome {
    /// The directory held no `.sql` files at all
    NoMigrations,
    /// Every shard has every file it should
    FullyMigrated,
    /// At least one shard is missing at least one file
    NotMigrated { missing_files: usize, batches: usize },
}

/// Everything a run produced
#[derive(Debug, Clone, Serialize)]
pub struct CheckSummary {
    pub outcome: CheckOutcome,
    pub reconciliation: Reconciliation,
    /// Message built for the webhook, if any
    pub payload: Option<SlackPayload>,
    /// Whether the message was actually posted
    pub notified: bool,
}

/// Runs one audit against the configured cluster
pub struct MigrationChecker<S: AppliedStateSource> {
    config: CheckerConfig,
    registry: ShardRegistry,
    source: S,
    notifier: Option<SlackNotifier>,
}

impl<S: AppliedStateSource> MigrationChecker<S> {
    pub fn new(config: CheckerConfig, source: S) -> CheckerResult<Self> {
        let registry = ShardRegistry::new(&config.database.database_prefix);
        let notifier = match config.slack_webhook_url {
            Some(ref url) => Some(SlackNotifier::new(
                url.clone(),
                config.notification.timeout_secs,
            )?),
            None => None,
        };

        Ok(Self {
            config,
            registry,
            source,
            notifier,
        })
    }

    pub fn registry(&self) -> &ShardRegistry {
        &self.registry
    }

    pub async fn run(&self) -> CheckerResult<CheckSummary> {
        info!("Starting migration SQL check");

        let directory = MigrationDirectory::new(&self.config.migration_sql_directory);
        let filenames = directory.scan().await?;
        info!(
            directory = ?directory.path(),
            files = filenames.len(),
            "Found migration SQL files"
        );

        let mut applied = AppliedSets::new();
        for shard in &self.registry {
            let set = self.source.applied_migrations(shard).await?;
            applied.insert(shard.node.clone(), set);
        }

        let reconciliation = Reconciler::new(&self.registry).reconcile(&filenames, &applied);
        for status in &reconciliation.shards {
            info!(
                database = %status.shard.database_name(),
                expected = status.expected,
                applied = status.applied,
                missing = status.missing.len(),
                "Shard reconciled"
            );
        }

        let outcome = if filenames.is_empty() {
            warn!(
                directory = ?directory.path(),
                all_migrated_message = ?self.config.all_migrated_message,
                "No migration SQL files found, nothing will be posted"
            );
            CheckOutcome::NoMigrations
        } else if reconciliation.is_fully_migrated() {
            info!("All migration SQL has been applied");
            CheckOutcome::FullyMigrated
        } else {
            let missing_files = reconciliation.missing_file_count();
            let batches = reconciliation.batches.len();
            warn!(
                missing_files,
                batches,
                discrepancies = reconciliation.discrepancy_count(),
                "Unapplied migration SQL found"
            );
            CheckOutcome::NotMigrated {
                missing_files,
                batches,
            }
        };

        let payload = match outcome {
            CheckOutcome::NoMigrations => None,
            _ => ReportFormatter::from_config(&self.config).format(&reconciliation),
        };

        if self.config.dry_run {
            info!("Dry run: broadcast mentions are rewritten as plain text");
        }

        let notified = match (&self.notifier, &payload) {
            (Some(notifier), Some(payload)) => {
                notifier.deliver(payload).await?;
                true
            }
            (None, Some(payload)) => {
                info!(
                    payload = %serde_json::to_string(payload)?,
                    "Slack webhook URL not set, notification not sent"
                );
                false
            }
            (_, None) => {
                info!("Nothing to notify");
                false
            }
        };

        info!("Finished migration SQL check");

        Ok(CheckSummary {
            outcome,
            reconciliation,
            payload,
            notified,
        })
    }
}
