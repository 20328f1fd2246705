//! Database layer
//!
//! Read-only access to each shard's migration ledger. A shard is opened,
//! queried once and closed again; nothing is kept between runs.

pub mod migration_history_repository;

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;

use crate::config::CheckerConfig;
use crate::models::Shard;
use crate::utils::CheckerResult;

pub use migration_history_repository::MigrationHistoryRepository;

/// Source of the filenames a shard has recorded as applied
#[async_trait]
pub trait AppliedStateSource: Send + Sync {
    /// Every `migrated_file_name` in the shard's ledger
    async fn applied_migrations(&self, shard: &Shard) -> CheckerResult<HashSet<String>>;
}

/// Connection options for one shard on the configured host
pub fn connect_options(config: &CheckerConfig, shard: &Shard) -> PgConnectOptions {
    let options = PgConnectOptions::new()
        .host(&config.db_host)
        .port(config.database.port)
        .username(&config.db_user)
        .password(&config.db_password)
        .database(shard.database_name())
        .application_name(env!("CARGO_PKG_NAME"));

    match config.database.statement_timeout_secs {
        0 => options,
        secs => options.options([("statement_timeout", format!("{}s", secs))]),
    }
}
