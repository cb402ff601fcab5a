// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! In-memory mock store, used only by the test suite to exercise the
//! reconciler's fan-out/aggregate logic without a network dependency.
//!
//! Mirrors the teacher's `test_utils::MockService` pattern (a builder over
//! shared mutable state) but for `RemoteStore` instead of HTTP.

use crate::error::SyncError;
use crate::model::{Certificate, SyncConfiguration};
use crate::store::RemoteStore;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub struct MockStore {
    should_fail: bool,
    output_key: String,
    output_value: String,
    calls: Arc<AtomicU64>,
}

/// Construct a `MockStore` from its Sync Configuration. Recognizes two
/// optional fields: `fail` ("true" to always error) and `output` (the
/// value returned under the `result` key on success).
pub fn build(config: &SyncConfiguration) -> Result<Box<dyn RemoteStore>, SyncError> {
    let should_fail = config.config.get("fail").map(|v| v == "true").unwrap_or(false);
    let output_value = config.config.get("output").cloned().unwrap_or_else(|| "mock-id".to_string());
    Ok(Box::new(MockStore {
        should_fail,
        output_key: "result".to_string(),
        output_value,
        calls: Arc::new(AtomicU64::new(0)),
    }))
}

#[async_trait]
impl RemoteStore for MockStore {
    async fn sync(&self, _cert: &Certificate) -> Result<BTreeMap<String, String>, SyncError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(SyncError::Remote("mock store configured to fail".to_string()));
        }
        let mut updates = BTreeMap::new();
        updates.insert(self.output_key.clone(), self.output_value.clone());
        Ok(updates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cert() -> Certificate {
        Certificate {
            secret_name: "s".to_string(),
            namespace: "ns".to_string(),
            certificate_pem: b"C".to_vec(),
            key_pem: b"K".to_vec(),
            ca_pem: None,
            syncs: Vec::new(),
        }
    }

    #[tokio::test]
    async fn succeeds_by_default() {
        let cfg = SyncConfiguration::new("mock", -1);
        let store = build(&cfg).unwrap();
        let updates = store.sync(&cert()).await.unwrap();
        assert_eq!(updates.get("result").unwrap(), "mock-id");
    }

    #[tokio::test]
    async fn fails_when_configured() {
        let mut cfg = SyncConfiguration::new("mock", -1);
        cfg.config.insert("fail".to_string(), "true".to_string());
        let store = build(&cfg).unwrap();
        assert!(store.sync(&cert()).await.is_err());
    }

    #[tokio::test]
    async fn output_value_is_configurable() {
        let mut cfg = SyncConfiguration::new("mock", -1);
        cfg.config.insert("output".to_string(), "arn:123".to_string());
        let store = build(&cfg).unwrap();
        let updates = store.sync(&cert()).await.unwrap();
        assert_eq!(updates.get("result").unwrap(), "arn:123");
    }
}
