//! Reconciliation report model
//!
//! Built once per run by the reconciler and never mutated afterwards.

use serde::Serialize;

use super::Shard;

/// Expected-versus-applied summary for one shard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShardStatus {
    pub shard: Shard,
    /// Number of listed files the shard is expected to have applied
    pub expected: usize,
    /// Number of filenames recorded in the shard's ledger
    pub applied: usize,
    /// Expected files absent from the ledger, sorted
    pub missing: Vec<String>,
}

impl ShardStatus {
    pub fn is_fully_migrated(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Files one shard is missing within a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShardMissing {
    pub shard: Shard,
    /// Sorted; empty when the shard has everything from this batch
    pub files: Vec<String>,
}

/// Discrepancies sharing one date block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Batch {
    /// Date block, e.g. `20230215`
    pub key: String,
    /// Every discrepancy filename in the batch, sorted and distinct
    pub files: Vec<String>,
    /// One entry per shard, in registry order
    pub shards: Vec<ShardMissing>,
}

impl Batch {
    /// Files missing from a given shard, if that shard is part of the batch
    pub fn missing_on(&self, database_name: &str) -> Option<&[String]> {
        self.shards
            .iter()
            .find(|m| m.shard.database_name() == database_name)
            .map(|m| m.files.as_slice())
    }
}

/// Result of reconciling the migration directory against every shard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// Number of `.sql` files listed, including ones without a scope tag
    pub listed: usize,
    /// Per-shard summary, in registry order
    pub shards: Vec<ShardStatus>,
    /// Batches sorted by key; empty when fully migrated
    pub batches: Vec<Batch>,
}

impl Reconciliation {
    /// No shard is missing anything
    pub fn is_fully_migrated(&self) -> bool {
        self.batches.is_empty()
    }

    /// Number of distinct filenames missing from at least one shard
    pub fn missing_file_count(&self) -> usize {
        self.batches.iter().map(|b| b.files.len()).sum()
    }

    /// Number of (filename, shard) discrepancy pairs
    pub fn discrepancy_count(&self) -> usize {
        self.shards.iter().map(|s| s.missing.len()).sum()
    }
}
