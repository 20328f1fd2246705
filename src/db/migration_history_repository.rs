//! Migration history repository - reads each shard's applied migrations

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, info};

use crate::config::CheckerConfig;
use crate::db::{connect_options, AppliedStateSource};
use crate::models::Shard;
use crate::utils::{CheckerError, CheckerResult};

/// Postgres-backed ledger reader
pub struct MigrationHistoryRepository {
    config: CheckerConfig,
    query: String,
}

impl MigrationHistoryRepository {
    pub fn new(config: &CheckerConfig) -> Self {
        Self {
            config: config.clone(),
            query: ledger_query(&config.database.ledger_schema),
        }
    }
}

/// Ledger query; `schema` has already been checked to be a plain identifier
fn ledger_query(schema: &str) -> String {
    format!(
        r#"
        SELECT migrated_file_name
        FROM {}.migration_history
        "#,
        schema
    )
}

#[async_trait]
impl AppliedStateSource for MigrationHistoryRepository {
    async fn applied_migrations(&self, shard: &Shard) -> CheckerResult<HashSet<String>> {
        let database = shard.database_name();
        let settings = &self.config.database;

        debug!(
            database = %database,
            host = %self.config.db_host,
            port = settings.port,
            "Connecting to shard"
        );

        let pool = PgPoolOptions::new()
            .min_connections(settings.min_connections)
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .connect_with(connect_options(&self.config, shard))
            .await
            .map_err(|e| CheckerError::database(database, e))?;

        let rows = sqlx::query_scalar::<_, Option<String>>(&self.query)
            .fetch_all(&pool)
            .await;

        // Release the shard before looking at the result
        pool.close().await;

        let applied: HashSet<String> = rows
            .map_err(|e| CheckerError::database(database, e))?
            .into_iter()
            .flatten()
            .collect();

        info!(database = %database, applied = applied.len(), "Read migration history");

        Ok(applied)
    }
}
