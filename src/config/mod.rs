//! Configuration management
//!
//! The run itself is described by command line flags. An optional YAML
//! settings file tunes the rest:
//! - Shard connection details (port, database prefix, ledger schema, pool)
//! - Webhook delivery (timeout, attachment color, placeholder text)
//! - Logging (level, format, console/file output)
//!
//! Precedence, lowest first: defaults, settings file, environment, flags.

mod cli;

pub use cli::Cli;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::validation::{validate_sql_identifier, validate_webhook_url};
use crate::utils::{CheckerError, CheckerResult};

/// Message posted when unapplied migration SQL exists and `-n` is not given
pub const DEFAULT_NOT_MIGRATED_SQL_EXISTS_MESSAGE: &str =
    "<!here|here> There is migration SQL that has not been applied to the DB :no_good: ";

/// Shown in a shard's field when it is missing nothing from a batch
pub const DEFAULT_NOTHING_MISSING_MESSAGE: &str = "No unapplied migration SQL.";

/// Everything one checker run needs
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    pub migration_sql_directory: PathBuf,
    pub db_host: String,
    pub db_user: String,
    pub db_password: String,
    pub slack_webhook_url: Option<String>,
    pub not_migrated_sql_exists_message: String,
    pub all_migrated_message: Option<String>,
    pub dry_run: bool,
    pub database: DatabaseSettings,
    pub notification: NotificationSettings,
    pub logging: LoggingConfig,
}

/// Contents of the optional settings file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub notification: NotificationSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Shard connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_db_port")]
    pub port: u16,
    /// Database names are `<prefix>_<node>`
    #[serde(default = "default_database_prefix")]
    pub database_prefix: String,
    /// Schema holding the `migration_history` ledger
    #[serde(default = "default_ledger_schema")]
    pub ledger_schema: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Server-side `statement_timeout` for the ledger query; 0 disables it
    #[serde(default = "default_statement_timeout")]
    pub statement_timeout_secs: u64,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_port() -> u16 {
    5432
}

fn default_database_prefix() -> String {
    "lkweb".to_string()
}

fn default_ledger_schema() -> String {
    "lkmigration".to_string()
}

fn default_connect_timeout() -> u64 {
    600
}

fn default_statement_timeout() -> u64 {
    600
}

fn default_min_connections() -> u32 {
    1
}

fn default_max_connections() -> u32 {
    100
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            port: default_db_port(),
            database_prefix: default_database_prefix(),
            ledger_schema: default_ledger_schema(),
            connect_timeout_secs: default_connect_timeout(),
            statement_timeout_secs: default_statement_timeout(),
            min_connections: default_min_connections(),
            max_connections: default_max_connections(),
        }
    }
}

/// Webhook delivery settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationSettings {
    #[serde(default = "default_notification_timeout")]
    pub timeout_secs: u64,
    /// Attachment color for batches with unapplied files
    #[serde(default = "default_attachment_color")]
    pub attachment_color: String,
    #[serde(default = "default_nothing_missing_message")]
    pub nothing_missing_message: String,
}

fn default_notification_timeout() -> u64 {
    30
}

fn default_attachment_color() -> String {
    "danger".to_string()
}

fn default_nothing_missing_message() -> String {
    DEFAULT_NOTHING_MISSING_MESSAGE.to_string()
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_notification_timeout(),
            attachment_color: default_attachment_color(),
            nothing_missing_message: default_nothing_missing_message(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    /// Log output target (console or file)
    #[serde(default)]
    pub target: LogTarget,
    /// Directory for log files (used when target is "file" or "both")
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default = "default_log_prefix")]
    pub log_prefix: String,
    #[serde(default = "default_log_rotation")]
    pub daily_rotation: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_prefix() -> String {
    "migration-sql-checker".to_string()
}

fn default_log_rotation() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            target: LogTarget::default(),
            log_dir: default_log_dir(),
            log_prefix: default_log_prefix(),
            daily_rotation: default_log_rotation(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

/// Log output target
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    /// Log to stderr
    #[default]
    Console,
    /// Log to file with optional daily rotation
    File,
    /// Log to both stderr and file
    Both,
}

impl Settings {
    /// Load a settings file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;
        serde_norway::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {:?}", path))
    }

    /// Find the settings file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            PathBuf::from("migration-sql-checker.yaml"),
            PathBuf::from("config/migration-sql-checker.yaml"),
            PathBuf::from("/etc/migration-sql-checker/config.yaml"),
            dirs::config_dir()
                .map(|p| p.join("migration-sql-checker/config.yaml"))
                .unwrap_or_default(),
        ];

        paths.into_iter().find(|p| p.is_file())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Logging overrides
        if let Some(level) = lookup("RUST_LOG") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("MIGRATION_CHECKER_LOG_FORMAT") {
            self.logging.format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "compact" => LogFormat::Compact,
                _ => LogFormat::Pretty,
            };
        }

        // Database overrides
        if let Some(port) = lookup("MIGRATION_CHECKER_DB_PORT") {
            if let Ok(p) = port.parse() {
                self.database.port = p;
            }
        }
        if let Some(prefix) = lookup("MIGRATION_CHECKER_DB_PREFIX") {
            self.database.database_prefix = prefix;
        }
        if let Some(schema) = lookup("MIGRATION_CHECKER_DB_SCHEMA") {
            self.database.ledger_schema = schema;
        }
    }
}

/// Load `KEY=value` pairs into the process environment
///
/// Reads `path`, or `.env` from the working directory or its parents when no
/// path is given. Must run before the flags are parsed, since
/// `--db-password` falls back to `MIGRATION_CHECKER_DB_PASSWORD`. Variables
/// already set in the environment are left untouched. Returns the file that
/// was loaded, if any.
pub fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => dotenvy::from_path(path).ok().map(|_| path.to_path_buf()),
        None => dotenvy::dotenv().ok(),
    }
}

impl CheckerConfig {
    /// Build the run configuration from parsed flags
    ///
    /// Loads the settings file (from `--config`,
    /// `MIGRATION_CHECKER_CONFIG`, or a standard location) and environment
    /// overrides, then validates the result before any I/O happens.
    pub fn load(cli: Cli) -> Result<Self> {
        let settings_path = cli
            .config
            .clone()
            .or_else(|| std::env::var("MIGRATION_CHECKER_CONFIG").map(PathBuf::from).ok())
            .or_else(Settings::find_config_file);

        let mut settings = match settings_path {
            Some(ref path) => Settings::load(path)?,
            None => Settings::default(),
        };
        settings.apply_env_overrides();

        let config = Self::from_parts(cli, settings);
        config.validate()?;

        Ok(config)
    }

    /// Combine flags with settings; flags win
    pub fn from_parts(cli: Cli, settings: Settings) -> Self {
        let mut logging = settings.logging;
        if cli.verbose {
            logging.level = "debug".to_string();
        }

        Self {
            migration_sql_directory: cli.migration_sql_directory,
            db_host: cli.db_host,
            db_user: cli.db_user,
            db_password: cli.db_password,
            slack_webhook_url: cli.slack_webhook_url.filter(|url| !url.trim().is_empty()),
            not_migrated_sql_exists_message: cli.not_migrated_sql_exists_message,
            all_migrated_message: cli.all_migrated_message,
            dry_run: cli.dry_run,
            database: settings.database,
            notification: settings.notification,
            logging,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> CheckerResult<()> {
        if self.migration_sql_directory.as_os_str().is_empty() {
            return Err(config_error("Migration SQL directory cannot be empty"));
        }
        if self.db_host.trim().is_empty() {
            return Err(config_error("Database host cannot be empty"));
        }
        if self.db_user.trim().is_empty() {
            return Err(config_error("Database user cannot be empty"));
        }
        if self.db_password.is_empty() {
            return Err(config_error("Database password cannot be empty"));
        }

        if self.database.port == 0 {
            return Err(config_error("Database port cannot be 0"));
        }
        if !validate_sql_identifier(&self.database.database_prefix) {
            return Err(config_error(format!(
                "Invalid database prefix: {:?}",
                self.database.database_prefix
            )));
        }
        if !validate_sql_identifier(&self.database.ledger_schema) {
            return Err(config_error(format!(
                "Invalid ledger schema: {:?}",
                self.database.ledger_schema
            )));
        }
        if self.database.connect_timeout_secs == 0 {
            return Err(config_error("connect_timeout_secs must be at least 1"));
        }
        if self.database.max_connections == 0 {
            return Err(config_error("max_connections must be at least 1"));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(config_error(format!(
                "min_connections ({}) exceeds max_connections ({})",
                self.database.min_connections, self.database.max_connections
            )));
        }

        if self.notification.timeout_secs == 0 {
            return Err(config_error("Notification timeout_secs must be at least 1"));
        }
        if let Some(ref url) = self.slack_webhook_url {
            if !validate_webhook_url(url) {
                return Err(config_error(format!("Invalid Slack webhook URL: {}", url)));
            }
        }

        Ok(())
    }
}

fn config_error(message: impl Into<String>) -> CheckerError {
    CheckerError::Config(message.into())
}
