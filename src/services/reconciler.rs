//! Expected-versus-applied reconciliation
//!
//! Pure and synchronous: the reconciler only sees the directory listing and
//! the applied sets already fetched from every shard.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::models::{
    Batch, MigrationFile, Reconciliation, ShardMissing, ShardRegistry, ShardStatus,
};
use crate::services::matcher;

/// Applied filenames per shard, keyed by the shard's node identifier
pub type AppliedSets = HashMap<String, HashSet<String>>;

/// Compares the migration directory against each shard's ledger
pub struct Reconciler<'a> {
    registry: &'a ShardRegistry,
}

impl<'a> Reconciler<'a> {
    pub fn new(registry: &'a ShardRegistry) -> Self {
        Self { registry }
    }

    /// Compute per-shard discrepancies and group them into batches
    ///
    /// A shard absent from `applied` is treated as having an empty ledger.
    pub fn reconcile(&self, filenames: &[String], applied: &AppliedSets) -> Reconciliation {
        let files: Vec<MigrationFile> = filenames
            .iter()
            .filter_map(|name| {
                let file = matcher::classify(name);
                if file.is_none() {
                    debug!(file = %name, "No scope tag, not audited");
                }
                file
            })
            .collect();

        let empty = HashSet::new();
        let mut shards = Vec::with_capacity(self.registry.len());
        // batch key -> distinct missing filenames
        let mut batch_files: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        // (batch key, shard index) -> missing filenames
        let mut batch_shards: HashMap<(&str, usize), BTreeSet<&str>> = HashMap::new();

        for (index, shard) in self.registry.iter().enumerate() {
            let applied_set = applied.get(&shard.node).unwrap_or(&empty);

            let expected: Vec<&MigrationFile> = files
                .iter()
                .filter(|f| f.is_expected_on(shard.group))
                .collect();

            let mut missing: BTreeSet<&str> = BTreeSet::new();
            for file in &expected {
                if applied_set.contains(&file.name) {
                    continue;
                }
                debug!(
                    shard = %shard.database_name(),
                    file = %file.name,
                    tag = %file.scope_tag,
                    "Not applied"
                );
                missing.insert(file.name.as_str());
                batch_files
                    .entry(file.batch_key.as_str())
                    .or_default()
                    .insert(file.name.as_str());
                batch_shards
                    .entry((file.batch_key.as_str(), index))
                    .or_default()
                    .insert(file.name.as_str());
            }

            shards.push(ShardStatus {
                shard: shard.clone(),
                expected: expected.len(),
                applied: applied_set.len(),
                missing: missing.into_iter().map(str::to_string).collect(),
            });
        }

        let batches = batch_files
            .into_iter()
            .map(|(key, members)| Batch {
                key: key.to_string(),
                files: members.into_iter().map(str::to_string).collect(),
                shards: self
                    .registry
                    .iter()
                    .enumerate()
                    .map(|(index, shard)| ShardMissing {
                        shard: shard.clone(),
                        files: batch_shards
                            .get(&(key, index))
                            .map(|set| set.iter().map(|s| s.to_string()).collect())
                            .unwrap_or_default(),
                    })
                    .collect(),
            })
            .collect();

        Reconciliation {
            listed: filenames.len(),
            shards,
            batches,
        }
    }
}
