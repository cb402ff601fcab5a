// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Process-wide, read-only mapping from store name to factory (spec §2.4,
//! §4.4). New stores are added only at init.

use crate::error::SyncError;
use crate::model::SyncConfiguration;
use crate::store::{file, RemoteStore, StoreFactory};
use std::collections::HashMap;

/// Store names the registry recognizes. Names beyond `file` report
/// `SyncError::NotImplemented` on construction rather than being treated
/// as unknown — they are valid store identities for annotation-parsing
/// purposes (spec §9: out-of-scope driver integrations), just not shipped
/// with a working driver in this repo.
const RECOGNIZED_BUT_UNIMPLEMENTED: &[&str] = &[
    "acm", "vault", "incapsula", "cloudfront", "heroku", "digitalocean", "gcp", "threatx", "filebase",
];

pub struct StoreRegistry {
    factories: HashMap<&'static str, StoreFactory>,
}

impl StoreRegistry {
    /// Build the process-wide registry. Called once at startup; read-only
    /// for the remainder of the process lifetime.
    pub fn build() -> Self {
        let mut factories: HashMap<&'static str, StoreFactory> = HashMap::new();
        factories.insert("file", file::build as StoreFactory);
        #[cfg(test)]
        factories.insert("mock", crate::store::mock::build as StoreFactory);
        Self { factories }
    }

    /// All store names this registry can answer queries about, including
    /// recognized-but-unimplemented ones — this is the set the Annotation
    /// Parser treats as "known stores" (spec §4.1).
    pub fn known_store_names(&self) -> std::collections::HashSet<&'static str> {
        let mut names: std::collections::HashSet<&'static str> = self.factories.keys().copied().collect();
        names.extend(RECOGNIZED_BUT_UNIMPLEMENTED.iter().copied());
        names
    }

    /// Construct a `RemoteStore` for the given configuration. Unknown
    /// store names and recognized-but-unimplemented ones are both
    /// construction errors, handled identically by the reconciler
    /// (spec §4.5 step 5a, §7 taxonomy classes 2-3).
    pub fn build_store(&self, config: &SyncConfiguration) -> Result<Box<dyn RemoteStore>, SyncError> {
        if let Some(factory) = self.factories.get(config.store.as_str()) {
            return factory(config);
        }
        if RECOGNIZED_BUT_UNIMPLEMENTED.contains(&config.store.as_str()) {
            return Err(SyncError::NotImplemented(config.store.clone()));
        }
        Err(SyncError::UnknownStore(config.store.clone()))
    }
}
