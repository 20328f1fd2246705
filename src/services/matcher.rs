//! Migration filename matching
//!
//! A migration filename looks like `<date:8>(_|-)<seq:2>(_|-)<tag>(_|-)...`,
//! for example `20230215_02_data_add_column.sql`. Matching is unanchored:
//! the structure may appear anywhere in the name, only its presence counts.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{MigrationFile, ScopeTag, ShardGroup};

fn tag_alternation(tags: &[ScopeTag]) -> String {
    tags.iter().map(ScopeTag::token).collect::<Vec<_>>().join("|")
}

fn group_regex(group: ShardGroup) -> Regex {
    let pattern = format!(
        r".{{8}}(_|-).{{2}}(_|-)({})(_|-)",
        tag_alternation(group.tags())
    );
    Regex::new(&pattern).unwrap()
}

static COMMON_GROUP_REGEX: Lazy<Regex> = Lazy::new(|| group_regex(ShardGroup::Common));

static DATA_GROUP_REGEX: Lazy<Regex> = Lazy::new(|| group_regex(ShardGroup::Data));

/// Same structure over the whole tag vocabulary, capturing the date block
static BATCH_KEY_REGEX: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        r"(.{{8}})(_|-).{{2}}(_|-)({})(_|-)",
        tag_alternation(&ScopeTag::ALL)
    );
    Regex::new(&pattern).unwrap()
});

/// Whether `filename` is expected on shards of `group`
pub fn matches_group(filename: &str, group: ShardGroup) -> bool {
    match group {
        ShardGroup::Common => COMMON_GROUP_REGEX.is_match(filename),
        ShardGroup::Data => DATA_GROUP_REGEX.is_match(filename),
    }
}

/// Leading date block of the first structured match in `filename`
pub fn batch_key(filename: &str) -> Option<&str> {
    BATCH_KEY_REGEX
        .captures(filename)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse a listed filename into a `MigrationFile`
///
/// Returns `None` for names without a recognised scope tag; those files are
/// left out of the audit entirely.
pub fn classify(filename: &str) -> Option<MigrationFile> {
    let caps = BATCH_KEY_REGEX.captures(filename)?;
    let batch_key = caps.get(1)?.as_str().to_string();
    let scope_tag = caps.get(4)?.as_str().parse::<ScopeTag>().ok()?;

    let common = matches_group(filename, ShardGroup::Common);
    let data = matches_group(filename, ShardGroup::Data);
    if !common && !data {
        return None;
    }

    Some(MigrationFile {
        name: filename.to_string(),
        batch_key,
        scope_tag,
        common,
        data,
    })
}
