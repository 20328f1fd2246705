//! Migration SQL Checker - audits migration SQL against every shard
//!
//! Lists the migration directory, reads each shard's `migration_history`
//! ledger and posts whatever has not been applied to Slack. Intended to be
//! run from a scheduler; a failed run is simply picked up by the next one.
//!
//! Example cron entry (every morning at 9):
//!   0 9 * * * /usr/local/bin/migration-sql-checker -d /srv/app/migrations \
//!       -h 10.0.0.5 -u auditor -p "$DB_PASSWORD" -s "$SLACK_WEBHOOK_URL"

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use migration_sql_checker::config::{load_env_file, LogFormat, LogTarget, LoggingConfig};
use migration_sql_checker::{
    CheckOutcome, CheckSummary, CheckerConfig, CheckerError, Cli, MigrationChecker,
    MigrationHistoryRepository,
};

#[tokio::main]
async fn main() -> ExitCode {
    // `.env` may supply the password, so it is loaded before flags are parsed
    load_env_file(None);

    // Exits with status 2 on bad flags, before any I/O
    let cli = Cli::parse();

    let config = match CheckerConfig::load(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    // The guard must be kept alive so file logs are flushed on exit
    let _log_guard = init_logging(&config.logging);
    let file_only = config.logging.target == LogTarget::File;

    match run(config).await {
        Ok(summary) => {
            match summary.outcome {
                CheckOutcome::NotMigrated {
                    missing_files,
                    batches,
                } => info!(
                    missing_files,
                    batches,
                    notified = summary.notified,
                    "Check completed with unapplied migration SQL"
                ),
                _ => info!(notified = summary.notified, "Check completed"),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            let kind = e
                .downcast_ref::<CheckerError>()
                .map_or("unknown", CheckerError::kind);
            error!(kind, error = %format!("{:#}", e), "Migration SQL check failed");
            if file_only {
                eprintln!("Migration SQL check failed: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(config: CheckerConfig) -> Result<CheckSummary> {
    let repository = MigrationHistoryRepository::new(&config);
    let checker =
        MigrationChecker::new(config, repository).context("Failed to initialize checker")?;

    checker
        .run()
        .await
        .context("Migration SQL check aborted")
}

/// Initialize the logging/tracing infrastructure
fn init_logging(log_config: &LoggingConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{prelude::*, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_config.level));

    match &log_config.target {
        LogTarget::Console => {
            let subscriber = tracing_subscriber::registry().with(env_filter);
            init_console_logging(subscriber, &log_config.format);
            None
        }
        LogTarget::File => {
            let (writer, guard) = create_file_writer(log_config);
            let subscriber = tracing_subscriber::registry().with(env_filter);
            init_file_logging(subscriber, &log_config.format, writer);
            Some(guard)
        }
        LogTarget::Both => {
            let (writer, guard) = create_file_writer(log_config);
            let subscriber = tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer(&log_config.format, writer));
            init_console_logging(subscriber, &log_config.format);
            Some(guard)
        }
    }
}

/// Create a file writer with optional daily rotation
fn create_file_writer(
    log_config: &LoggingConfig,
) -> (
    tracing_appender::non_blocking::NonBlocking,
    tracing_appender::non_blocking::WorkerGuard,
) {
    if let Err(e) = std::fs::create_dir_all(&log_config.log_dir) {
        eprintln!(
            "Warning: Failed to create log directory {:?}: {}",
            log_config.log_dir, e
        );
    }

    let file_appender = if log_config.daily_rotation {
        tracing_appender::rolling::daily(&log_config.log_dir, &log_config.log_prefix)
    } else {
        tracing_appender::rolling::never(&log_config.log_dir, &log_config.log_prefix)
    };

    tracing_appender::non_blocking(file_appender)
}

/// Initialize stderr logging on top of `subscriber`
fn init_console_logging<S>(subscriber: S, format: &LogFormat)
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a> + Send + Sync,
{
    use tracing_subscriber::{fmt, prelude::*};

    match format {
        LogFormat::Json => {
            subscriber
                .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Compact => {
            subscriber
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Pretty => {
            subscriber
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
}

/// Initialize file-only logging
fn init_file_logging<S>(
    subscriber: S,
    format: &LogFormat,
    writer: tracing_appender::non_blocking::NonBlocking,
) where
    S: tracing::Subscriber
        + for<'a> tracing_subscriber::registry::LookupSpan<'a>
        + Send
        + Sync
        + 'static,
{
    use tracing_subscriber::prelude::*;

    subscriber.with(file_layer(format, writer)).init();
}

/// Formatting layer writing to a log file
fn file_layer<S>(
    format: &LogFormat,
    writer: tracing_appender::non_blocking::NonBlocking,
) -> Box<dyn tracing_subscriber::Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a> + 'static,
{
    use tracing_subscriber::{fmt, Layer};

    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .with_ansi(false)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(false)
            .with_writer(writer)
            .boxed(),
    }
}
