// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Filesystem store driver: writes certificate material to a mounted
//! directory (spec §1, "a mounted filesystem").

use crate::error::SyncError;
use crate::model::{Certificate, SyncConfiguration};
use crate::store::RemoteStore;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

pub struct FileStore {
    dir: PathBuf,
}

/// Construct a `FileStore` from its Sync Configuration. Requires a
/// `path` field naming the target directory.
pub fn build(config: &SyncConfiguration) -> Result<Box<dyn RemoteStore>, SyncError> {
    let path = config
        .config
        .get("path")
        .ok_or_else(|| SyncError::Config("file store requires a 'path' field".to_string()))?;
    Ok(Box::new(FileStore { dir: PathBuf::from(path) }))
}

#[async_trait]
impl RemoteStore for FileStore {
    async fn sync(&self, cert: &Certificate) -> Result<BTreeMap<String, String>, SyncError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| SyncError::Remote(format!("creating {:?}: {e}", self.dir)))?;

        let crt_path = self.dir.join(format!("{}.crt", cert.secret_name));
        let key_path = self.dir.join(format!("{}.key", cert.secret_name));

        tokio::fs::write(&crt_path, &cert.certificate_pem)
            .await
            .map_err(|e| SyncError::Remote(format!("writing {crt_path:?}: {e}")))?;
        tokio::fs::write(&key_path, &cert.key_pem)
            .await
            .map_err(|e| SyncError::Remote(format!("writing {key_path:?}: {e}")))?;

        if let Some(ca) = &cert.ca_pem {
            let ca_path = self.dir.join(format!("{}.ca.crt", cert.secret_name));
            tokio::fs::write(&ca_path, ca)
                .await
                .map_err(|e| SyncError::Remote(format!("writing {ca_path:?}: {e}")))?;
        }

        info!(path = %crt_path.display(), "wrote certificate to filesystem store");

        let mut updates = BTreeMap::new();
        updates.insert("path".to_string(), self.dir.to_string_lossy().to_string());
        Ok(updates)
    }
}
