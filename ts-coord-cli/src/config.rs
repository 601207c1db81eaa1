//! Parses the comma-separated `key=value` config strings the coordinator's
//! native API takes (`oldest_timestamp=5,stable_timestamp=a`), the same
//! shape WiredTiger's config strings use, into the strongly typed structs
//! the library expects.

use ts_coord::error::{CResult, Error};
use ts_coord::query::QueryTimestampSelector;
use ts_coord::setter::SetTimestampConfig;
use ts_coord::timestamp::Timestamp8;
use ts_coord::transaction::TransactionTimestampConfig;

fn split_pairs(config: &str) -> impl Iterator<Item = (&str, &str)> {
    config
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.trim(), v.trim()),
            None => (pair, ""),
        })
}

/// Parse a `set_timestamp` config string. Recognizes `commit_timestamp`,
/// `oldest_timestamp`, `stable_timestamp`, and the bare `force` flag.
pub fn parse_set_config(config: &str) -> CResult<SetTimestampConfig> {
    let mut out = SetTimestampConfig::default();
    for (key, value) in split_pairs(config) {
        match key {
            "commit_timestamp" => out.commit = Some(Timestamp8::from_hex(key, value)?),
            "oldest_timestamp" => out.oldest = Some(Timestamp8::from_hex(key, value)?),
            "stable_timestamp" => out.stable = Some(Timestamp8::from_hex(key, value)?),
            "force" => out.force = value.is_empty() || value == "true",
            other => return Err(Error::Invalid(format!("unknown set_timestamp option '{other}'"))),
        }
    }
    Ok(out)
}

/// Parse a `timestamp_transaction` config string. Recognizes only
/// `commit_timestamp`; an empty string is a no-op config.
pub fn parse_transaction_config(config: &str) -> CResult<TransactionTimestampConfig> {
    let mut out = TransactionTimestampConfig::default();
    for (key, value) in split_pairs(config) {
        match key {
            "commit_timestamp" => out.commit = Some(Timestamp8::from_hex(key, value)?),
            other => {
                return Err(Error::Invalid(format!(
                    "unknown timestamp_transaction option '{other}'"
                )))
            }
        }
    }
    Ok(out)
}

/// Parse a `query_timestamp` config string: exactly one `get=<selector>`.
pub fn parse_query_config(config: &str) -> CResult<QueryTimestampSelector> {
    for (key, value) in split_pairs(config) {
        if key != "get" {
            return Err(Error::Invalid(format!("unknown query_timestamp option '{key}'")));
        }
        return match value {
            "all_committed" => Ok(QueryTimestampSelector::AllCommitted),
            "oldest" => Ok(QueryTimestampSelector::Oldest),
            "pinned" => Ok(QueryTimestampSelector::Pinned),
            "stable" => Ok(QueryTimestampSelector::Stable),
            other => Err(Error::Invalid(format!("unknown get selector '{other}'"))),
        };
    }
    Ok(QueryTimestampSelector::default())
}
