// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The Certificate Model (spec §2.1, §3): an immutable per-reconcile view
//! derived from a Secret.

use std::collections::BTreeMap;

/// One unit of fan-out: a store name, an optional index, and the
/// configuration/updates maps that flow in and out of its `Sync` call
/// (spec §3 "Sync Configuration").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfiguration {
    pub store: String,
    /// -1 when the annotation key had no `.N` suffix.
    pub index: i64,
    pub config: BTreeMap<String, String>,
    pub updates: BTreeMap<String, String>,
}

impl SyncConfiguration {
    pub fn new(store: impl Into<String>, index: i64) -> Self {
        Self {
            store: store.into(),
            index,
            config: BTreeMap::new(),
            updates: BTreeMap::new(),
        }
    }

    /// Build the annotation key this configuration's output fields are
    /// written under: `<store>-<key>` or `<store>-<key>.<index>`.
    pub fn output_key(&self, key: &str) -> String {
        if self.index >= 0 {
            format!("{}-{}.{}", self.store, key, self.index)
        } else {
            format!("{}-{}", self.store, key)
        }
    }
}

/// Certificate derived from a Secret at reconcile time (spec §3).
/// Short-lived; never cached across reconciles.
#[derive(Debug, Clone)]
pub struct Certificate {
    pub secret_name: String,
    pub namespace: String,
    pub certificate_pem: Vec<u8>,
    pub key_pem: Vec<u8>,
    pub ca_pem: Option<Vec<u8>>,
    pub syncs: Vec<SyncConfiguration>,
}

impl Certificate {
    pub fn fqn(&self) -> String {
        format!("{}/{}", self.namespace, self.secret_name)
    }
}
