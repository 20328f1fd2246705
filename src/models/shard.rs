//! Shard model and the fixed registry of audited shards

use serde::Serialize;

use super::ShardGroup;

/// Node identifier of the common shard
pub const COMMON_NODE_IDENTIFIER: &str = "cmn";
/// Node identifier prefix of the data shards (`data1`, `data2`)
pub const DATA_NODE_IDENTIFIER: &str = "data";
/// Number of data shards in the cluster
pub const DATA_SHARD_COUNT: usize = 2;

/// One logical database being audited
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Shard {
    /// Node identifier, e.g. `cmn` or `data1`
    pub node: String,
    /// Group that decides which migrations this shard must have
    pub group: ShardGroup,
    database_name: String,
}

impl Shard {
    pub fn new(prefix: &str, node: impl Into<String>, group: ShardGroup) -> Self {
        let node = node.into();
        let database_name = format!("{}_{}", prefix, node);
        Self {
            node,
            group,
            database_name,
        }
    }

    /// Database name on the host, `<prefix>_<node>`
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Name shown in reports
    pub fn display_name(&self) -> &str {
        &self.database_name
    }
}

/// Ordered list of shards: the common shard first, then the data shards
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShardRegistry {
    shards: Vec<Shard>,
}

impl ShardRegistry {
    /// Build the cluster layout for a database name prefix
    pub fn new(prefix: &str) -> Self {
        let mut shards = Vec::with_capacity(1 + DATA_SHARD_COUNT);
        shards.push(Shard::new(prefix, COMMON_NODE_IDENTIFIER, ShardGroup::Common));
        for n in 1..=DATA_SHARD_COUNT {
            shards.push(Shard::new(
                prefix,
                format!("{}{}", DATA_NODE_IDENTIFIER, n),
                ShardGroup::Data,
            ));
        }
        Self { shards }
    }

    pub fn shards(&self) -> &[Shard] {
        &self.shards
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shard> {
        self.shards.iter()
    }

    pub fn len(&self) -> usize {
        self.shards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }
}

impl<'a> IntoIterator for &'a ShardRegistry {
    type Item = &'a Shard;
    type IntoIter = std::slice::Iter<'a, Shard>;

    fn into_iter(self) -> Self::IntoIter {
        self.shards.iter()
    }
}
