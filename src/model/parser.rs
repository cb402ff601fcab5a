// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Annotation Parser (spec §4.1): translates a Secret's annotation map
//! into an ordered list of Sync Configurations.

use crate::model::certificate::SyncConfiguration;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Parse a Secret's annotations into sync configurations, ordered by
/// `(store asc, index asc)` with `index = -1` sorting before `index = 0`.
///
/// Keys not matching `<prefix>/<store>-<rest>` are ignored. Keys matching
/// the prefix but belonging to no known store (bookkeeping keys,
/// per-target outputs of unknown stores) are dropped with a debug log and
/// never block parsing of the rest (spec §4.1, §9 resolved Open Question).
pub fn parse_sync_configurations(
    annotations: &BTreeMap<String, String>,
    prefix: &str,
    known_stores: &HashSet<&str>,
) -> Vec<SyncConfiguration> {
    let scoped_prefix = format!("{prefix}/");
    let mut merged: HashMap<(String, i64), SyncConfiguration> = HashMap::new();

    for (key, value) in annotations {
        let Some(rest_full) = key.strip_prefix(&scoped_prefix) else {
            continue;
        };

        let Some(store) = longest_matching_store(rest_full, known_stores) else {
            debug!(annotation = %key, "annotation does not belong to a known store, skipping");
            continue;
        };

        let rest = &rest_full[store.len() + 1..];
        if rest.is_empty() {
            continue;
        }

        let (field, index) = split_key_and_index(rest);

        merged
            .entry((store.to_string(), index))
            .or_insert_with(|| SyncConfiguration::new(store, index))
            .config
            .insert(field.to_string(), value.clone());
    }

    let mut configs: Vec<SyncConfiguration> = merged.into_values().collect();
    configs.sort_by(|a, b| a.store.cmp(&b.store).then(a.index.cmp(&b.index)));
    configs
}

/// Find the longest known store name such that `rest_full` starts with
/// `"<store>-"`. Longest match avoids ambiguity when one store name is a
/// prefix of another.
fn longest_matching_store<'a>(rest_full: &str, known_stores: &HashSet<&'a str>) -> Option<&'a str> {
    known_stores
        .iter()
        .filter(|s| rest_full.starts_with(&format!("{s}-")))
        .max_by_key(|s| s.len())
        .copied()
}

/// Split `rest` on the *last* `.` into `(field, index)`. If the tail after
/// the last `.` is not a valid integer, the whole string is the field and
/// the index is -1 (spec §4.1: "not an integer... treated as no index").
fn split_key_and_index(rest: &str) -> (&str, i64) {
    match rest.rfind('.') {
        Some(pos) => {
            let (field, tail) = (&rest[..pos], &rest[pos + 1..]);
            match tail.parse::<i64>() {
                Ok(idx) => (field, idx),
                Err(_) => (rest, -1),
            }
        }
        None => (rest, -1),
    }
}
