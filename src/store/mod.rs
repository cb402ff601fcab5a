// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Store Registry and Remote Store contract (spec §4.4).

pub mod file;
pub mod registry;

#[cfg(test)]
pub mod mock;

use crate::error::SyncError;
use crate::model::{Certificate, SyncConfiguration};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// A handle with a single `Sync` operation, constructed from one Sync
/// Configuration (spec §4.4, §2.4).
///
/// Implementers must make `sync` idempotent in effect: sync'ing the same
/// Certificate+configuration twice must not create a duplicate remote
/// resource.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn sync(&self, cert: &Certificate) -> Result<BTreeMap<String, String>, SyncError>;
}

/// Builds a `RemoteStore` from one Sync Configuration. Construction
/// errors (unknown store, malformed configuration, missing required
/// fields) are a distinct class from Sync-time errors (spec §4.4, §7).
pub type StoreFactory = fn(&SyncConfiguration) -> Result<Box<dyn RemoteStore>, SyncError>;
