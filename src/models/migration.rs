//! Migration filename model and scope tags

use serde::{Deserialize, Serialize};

/// Scope tag embedded in a migration filename, naming the shards it targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeTag {
    /// `allnode`: every shard
    All,
    /// `cmn`: the common shard
    Common,
    /// `news`: lives on the common shard
    News,
    /// `data`: every data shard
    Data,
    /// `demo`: lives on the data shards
    Demo,
}

impl ScopeTag {
    /// Full tag vocabulary, in the order the filename pattern lists it
    pub const ALL: [ScopeTag; 5] = [
        ScopeTag::All,
        ScopeTag::Common,
        ScopeTag::Data,
        ScopeTag::News,
        ScopeTag::Demo,
    ];

    /// Token as it appears inside a filename
    pub fn token(&self) -> &'static str {
        match self {
            ScopeTag::All => "allnode",
            ScopeTag::Common => "cmn",
            ScopeTag::News => "news",
            ScopeTag::Data => "data",
            ScopeTag::Demo => "demo",
        }
    }
}

impl std::fmt::Display for ScopeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl std::str::FromStr for ScopeTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allnode" => Ok(ScopeTag::All),
            "cmn" => Ok(ScopeTag::Common),
            "news" => Ok(ScopeTag::News),
            "data" => Ok(ScopeTag::Data),
            "demo" => Ok(ScopeTag::Demo),
            _ => Err(format!("Invalid scope tag: {}", s)),
        }
    }
}

/// Group of shards that share one expected migration set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShardGroup {
    Common,
    Data,
}

impl ShardGroup {
    /// Scope tags that put a migration on this group
    pub fn tags(&self) -> &'static [ScopeTag] {
        match self {
            ShardGroup::Common => &[ScopeTag::All, ScopeTag::Common, ScopeTag::News],
            ShardGroup::Data => &[ScopeTag::All, ScopeTag::Data, ScopeTag::Demo],
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ShardGroup::Common => "common",
            ShardGroup::Data => "data",
        }
    }
}

impl std::fmt::Display for ShardGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A migration filename that carries a recognised scope tag
///
/// Filenames without a scope tag never become a `MigrationFile`, so every
/// value of this type has a batch key and targets at least one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationFile {
    /// Raw filename, e.g. `20230101_01_cmn_add_index.sql`
    pub name: String,
    /// Leading date block, used to group discrepancies
    pub batch_key: String,
    /// First scope tag found in the name
    pub scope_tag: ScopeTag,
    /// Whether the common shard group expects this file
    pub common: bool,
    /// Whether the data shard group expects this file
    pub data: bool,
}

impl MigrationFile {
    /// Whether shards of `group` are expected to have applied this file
    pub fn is_expected_on(&self, group: ShardGroup) -> bool {
        match group {
            ShardGroup::Common => self.common,
            ShardGroup::Data => self.data,
        }
    }
}
