// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Content Hasher (spec §4.2): a stable fingerprint over Secret data and
//! controlled annotations, used to skip no-op syncs.

use crate::constants::bookkeeping;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Compute the Secret's hash: `sha256(sha256(data) || sha256(controlled_annotations))`,
/// hex-encoded, excluding the `hash` annotation itself from its own input.
pub fn compute_hash(data: &BTreeMap<String, Vec<u8>>, annotations: &BTreeMap<String, String>, prefix: &str) -> String {
    let data_digest = hash_bytes_map(data);

    let hash_key = format!("{prefix}/{}", bookkeeping::HASH);
    let scoped_prefix = format!("{prefix}/");
    let controlled: BTreeMap<&String, &String> = annotations
        .iter()
        .filter(|(k, _)| k.starts_with(&scoped_prefix))
        .filter(|(k, _)| **k != hash_key)
        .collect();
    let annotation_digest = hash_str_map(&controlled);

    let mut hasher = Sha256::new();
    hasher.update(data_digest.as_bytes());
    hasher.update(annotation_digest.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn hash_bytes_map(data: &BTreeMap<String, Vec<u8>>) -> String {
    // BTreeMap already iterates in sorted key order.
    let mut hasher = Sha256::new();
    for (k, v) in data {
        hasher.update(k.as_bytes());
        hasher.update(v);
    }
    format!("{:x}", hasher.finalize())
}

fn hash_str_map(data: &BTreeMap<&String, &String>) -> String {
    let mut hasher = Sha256::new();
    for (k, v) in data {
        hasher.update(k.as_bytes());
        hasher.update(v.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// `cache_changed`: true when the computed hash differs from the stored
/// `hash` annotation, or no `hash` annotation exists, or `cache_disable`
/// forces it (spec §4.2).
pub fn cache_changed(
    data: &BTreeMap<String, Vec<u8>>,
    annotations: &BTreeMap<String, String>,
    prefix: &str,
    cache_disable: bool,
) -> bool {
    if cache_disable {
        return true;
    }
    let hash_key = format!("{prefix}/{}", bookkeeping::HASH);
    match annotations.get(&hash_key) {
        Some(stored) => compute_hash(data, annotations, prefix) != *stored,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(pairs: &[(&str, &str)]) -> BTreeMap<String, Vec<u8>> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.as_bytes().to_vec())).collect()
    }

    fn annos(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    const PREFIX: &str = "cert-manager-sync.lestak.sh";

    #[test]
    fn identical_inputs_yield_identical_hash_regardless_of_order() {
        let d1 = data(&[("tls.crt", "C"), ("tls.key", "K")]);
        let d2 = data(&[("tls.key", "K"), ("tls.crt", "C")]);
        let a1 = annos(&[(&format!("{PREFIX}/sync-enabled"), "true")]);
        let a2 = a1.clone();
        assert_eq!(compute_hash(&d1, &a1, PREFIX), compute_hash(&d2, &a2, PREFIX));
    }

    #[test]
    fn hash_excludes_itself() {
        let d = data(&[("tls.crt", "C")]);
        let a1 = annos(&[(&format!("{PREFIX}/sync-enabled"), "true")]);
        let mut a2 = a1.clone();
        a2.insert(format!("{PREFIX}/hash"), "whatever-stale-value".to_string());
        assert_eq!(compute_hash(&d, &a1, PREFIX), compute_hash(&d, &a2, PREFIX));
    }

    #[test]
    fn uncontrolled_annotations_do_not_affect_hash() {
        let d = data(&[("tls.crt", "C")]);
        let a1 = annos(&[(&format!("{PREFIX}/sync-enabled"), "true")]);
        let mut a2 = a1.clone();
        a2.insert("some.other/label".to_string(), "value".to_string());
        assert_eq!(compute_hash(&d, &a1, PREFIX), compute_hash(&d, &a2, PREFIX));
    }

    #[test]
    fn changed_data_changes_hash() {
        let d1 = data(&[("tls.crt", "C")]);
        let d2 = data(&[("tls.crt", "D")]);
        let a = annos(&[]);
        assert_ne!(compute_hash(&d1, &a, PREFIX), compute_hash(&d2, &a, PREFIX));
    }

    #[test]
    fn cache_changed_true_when_no_hash_annotation() {
        let d = data(&[("tls.crt", "C")]);
        let a = annos(&[]);
        assert!(cache_changed(&d, &a, PREFIX, false));
    }

    #[test]
    fn cache_changed_false_when_hash_matches() {
        let d = data(&[("tls.crt", "C")]);
        let mut a = annos(&[]);
        let h = compute_hash(&d, &a, PREFIX);
        a.insert(format!("{PREFIX}/hash"), h);
        assert!(!cache_changed(&d, &a, PREFIX, false));
    }

    #[test]
    fn cache_changed_true_when_cache_disabled_even_if_matching() {
        let d = data(&[("tls.crt", "C")]);
        let mut a = annos(&[]);
        let h = compute_hash(&d, &a, PREFIX);
        a.insert(format!("{PREFIX}/hash"), h);
        assert!(cache_changed(&d, &a, PREFIX, true));
    }
}
