// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Retry Policy (spec §4.3): pure functions over a Secret's bookkeeping
//! annotations. State lives entirely in the annotation map; there is no
//! in-memory cache (spec §5, §9).

use crate::constants::{bookkeeping, MAX_BACKOFF_MINUTES};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// `max_retries`: integer cap on consecutive failures, or `-1` meaning
/// unbounded when the annotation is absent or unparseable.
pub fn max_retries(annotations: &BTreeMap<String, String>, prefix: &str) -> i64 {
    annotations
        .get(&format!("{prefix}/{}", bookkeeping::MAX_SYNC_ATTEMPTS))
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(-1)
}

/// `consumed_retries`: consecutive failure count so far, 0 if absent or
/// unparseable.
pub fn consumed_retries(annotations: &BTreeMap<String, String>, prefix: &str) -> i64 {
    annotations
        .get(&format!("{prefix}/{}", bookkeeping::FAILED_SYNC_ATTEMPTS))
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(0)
        .max(0)
}

/// `next_retry_time`: absolute time the next retry is allowed, or the
/// Unix epoch if absent/unparseable (treated as "zero", i.e. retry now).
pub fn next_retry_time(annotations: &BTreeMap<String, String>, prefix: &str) -> DateTime<Utc> {
    annotations
        .get(&format!("{prefix}/{}", bookkeeping::NEXT_RETRY))
        .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| DateTime::<Utc>::from_timestamp(0, 0).expect("epoch is a valid timestamp"))
}

/// `ready_to_retry`: true iff `consumed < max` (or max unbounded) AND
/// (`next_retry` is zero OR `now >= next_retry`). Monotone in time for
/// fixed annotations (spec §8).
pub fn ready_to_retry(annotations: &BTreeMap<String, String>, prefix: &str, now: DateTime<Utc>) -> bool {
    let max = max_retries(annotations, prefix);
    let consumed = consumed_retries(annotations, prefix);
    let under_cap = max < 0 || consumed < max;

    let next = next_retry_time(annotations, prefix);
    let epoch = DateTime::<Utc>::from_timestamp(0, 0).expect("epoch is a valid timestamp");
    let time_ready = next == epoch || now >= next;

    under_cap && time_ready
}

/// Backoff delay for the *k*-th consecutive failure (k >= 1):
/// `min(2^(k-1) minutes, 32 hours)` (spec §4.3, §8).
pub fn backoff_minutes(k: i64) -> i64 {
    if k <= 0 {
        return 0;
    }
    // Cap the exponent so `2^(k-1)` never overflows before the min() clamp.
    if k - 1 >= 63 {
        return MAX_BACKOFF_MINUTES;
    }
    let minutes = 1i64 << (k - 1);
    minutes.min(MAX_BACKOFF_MINUTES)
}

/// Compute the `next-retry` timestamp for the *k*-th consecutive failure.
pub fn next_retry_after(now: DateTime<Utc>, k: i64) -> DateTime<Utc> {
    now + chrono::Duration::minutes(backoff_minutes(k))
}

/// Format a timestamp the way `next-retry` must always be written:
/// absolute, offset-aware ISO 8601 (spec §9).
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}
