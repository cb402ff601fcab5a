// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Errors surfaced by the sync engine.
///
/// Parse errors (spec §7, taxonomy class 1) never reach this type — they
/// are absorbed inside the annotation parser and logged at `debug`.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("unknown store {0:?}")]
    UnknownStore(String),

    #[error("store not implemented: {0}")]
    NotImplemented(String),

    #[error("store configuration error: {0}")]
    Config(String),

    #[error("remote sync failed: {0}")]
    Remote(String),

    #[error("sync timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;
