//! Command line flags

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use super::DEFAULT_NOT_MIGRATED_SQL_EXISTS_MESSAGE;

/// Checks that migration SQL files have been applied to every shard
#[derive(Debug, Clone, Parser)]
#[command(name = "migration-sql-checker", version, disable_help_flag = true)]
pub struct Cli {
    /// Directory holding the migration SQL files
    #[arg(short = 'd', long = "migration-sql-directory", alias = "migrationSqlDirectory")]
    pub migration_sql_directory: PathBuf,

    /// Host of the database shards to check
    #[arg(short = 'h', long = "db-host", alias = "dbHost")]
    pub db_host: String,

    /// User with read access to every shard's migration history
    #[arg(short = 'u', long = "db-user", alias = "dbUser")]
    pub db_user: String,

    /// Password of the --db-user account
    #[arg(
        short = 'p',
        long = "db-password",
        alias = "dbPassword",
        env = "MIGRATION_CHECKER_DB_PASSWORD",
        hide_env_values = true
    )]
    pub db_password: String,

    /// Slack incoming webhook URL; nothing is posted when omitted
    #[arg(short = 's', long = "slack-webhook-url", alias = "slackWebhookUrl")]
    pub slack_webhook_url: Option<String>,

    /// Message posted when unapplied migration SQL exists (`\n` becomes a newline)
    #[arg(
        short = 'n',
        long = "not-migrated-sql-exists-message",
        alias = "notMigratedSqlExistsMessage",
        default_value = DEFAULT_NOT_MIGRATED_SQL_EXISTS_MESSAGE
    )]
    pub not_migrated_sql_exists_message: String,

    /// Message posted when everything is applied; not posted when omitted
    #[arg(short = 'a', long = "all-migrated-message", alias = "allMigratedMessage")]
    pub all_migrated_message: Option<String>,

    /// Rewrite broadcast mentions into plain text instead of pinging anyone
    #[arg(long = "dry-run", alias = "dryRun")]
    pub dry_run: bool,

    /// Settings file for database, notification and logging tuning
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Print help
    #[arg(long = "help", action = ArgAction::Help)]
    help: Option<bool>,
}
