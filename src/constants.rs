// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Annotation keys and defaults shared across the sync engine.

/// Default controller annotation prefix, overridable via `OPERATOR_NAME`.
pub const DEFAULT_PREFIX: &str = "cert-manager-sync.lestak.sh";

/// Bookkeeping annotation key suffixes, relative to the controller prefix.
pub mod bookkeeping {
    pub const SYNC_ENABLED: &str = "sync-enabled";
    pub const MAX_SYNC_ATTEMPTS: &str = "max-sync-attempts";
    pub const HASH: &str = "hash";
    pub const FAILED_SYNC_ATTEMPTS: &str = "failed-sync-attempts";
    pub const NEXT_RETRY: &str = "next-retry";
}

/// Secret data keys for the standard TLS secret shape.
pub mod secret_data {
    pub const TLS_CRT: &str = "tls.crt";
    pub const TLS_KEY: &str = "tls.key";
    pub const CA_CRT: &str = "ca.crt";
}

/// Default full-resync period for the Secret informer (spec §4.6).
pub const DEFAULT_RESYNC_SECS: u64 = 30;

/// Default per-target Sync call deadline (spec §5).
pub const DEFAULT_SYNC_TIMEOUT_SECS: u64 = 120;

/// Backoff ceiling, in minutes (32 hours).
pub const MAX_BACKOFF_MINUTES: i64 = 32 * 60;
