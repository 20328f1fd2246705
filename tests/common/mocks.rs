//! Mock services for testing
//!
//! Provides an in-memory replacement for the shards' migration ledgers so
//! the checker can run without a database.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use migration_sql_checker::models::Shard;
use migration_sql_checker::{AppliedStateSource, CheckerError, CheckerResult};

/// Mock ledger source keyed by shard node identifier
#[derive(Clone, Default)]
pub struct MockAppliedState {
    applied: Arc<RwLock<HashMap<String, HashSet<String>>>>,
    /// Node whose read fails, when set
    failing_node: Arc<RwLock<Option<String>>>,
    /// Nodes read so far, in order
    reads: Arc<RwLock<Vec<String>>>,
}

impl MockAppliedState {
    /// Create a mock where every shard has an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Record files as applied on a shard
    pub fn with_applied(self, node: &str, files: &[&str]) -> Self {
        self.applied
            .write()
            .unwrap()
            .entry(node.to_string())
            .or_default()
            .extend(files.iter().map(|f| f.to_string()));
        self
    }

    /// Record files as applied on every shard
    pub fn with_applied_everywhere(self, files: &[&str]) -> Self {
        self.with_applied("cmn", files)
            .with_applied("data1", files)
            .with_applied("data2", files)
    }

    /// Make reads of `node` fail like an unreachable database
    pub fn fail_on(self, node: &str) -> Self {
        *self.failing_node.write().unwrap() = Some(node.to_string());
        self
    }

    /// Nodes read so far
    pub fn reads(&self) -> Vec<String> {
        self.reads.read().unwrap().clone()
    }
}

#[async_trait]
impl AppliedStateSource for MockAppliedState {
    async fn applied_migrations(&self, shard: &Shard) -> CheckerResult<HashSet<String>> {
        self.reads.write().unwrap().push(shard.node.clone());

        if self.failing_node.read().unwrap().as_deref() == Some(shard.node.as_str()) {
            return Err(CheckerError::database(
                shard.database_name(),
                sqlx::Error::PoolTimedOut,
            ));
        }

        Ok(self
            .applied
            .read()
            .unwrap()
            .get(&shard.node)
            .cloned()
            .unwrap_or_default())
    }
}
