// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The Reconciler (spec §4.5): the orchestration loop invoked per Secret
//! event. Split into pure/testable pieces (eligibility, parsing, patch
//! computation) and the thin Kubernetes-API-calling shell that wires them
//! together.

mod patch;

pub use patch::{compute_patch, SyncOutcome};

use crate::constants::{bookkeeping, secret_data, DEFAULT_SYNC_TIMEOUT_SECS};
use crate::context::Context;
use crate::error::{Result, SyncError};
use crate::model::{parser, Certificate, SyncConfiguration};
use crate::retry;
use chrono::Utc;
use k8s_openapi::api::core::v1::Secret;
use kube::api::{Patch, PatchParams};
use kube::{Api, ResourceExt};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Step 1: eligibility gate. Namespace filter, both required data keys
/// present (§3: a Secret carries "at least `tls.crt` and `tls.key`"), and
/// the `sync-enabled` gate (spec §4.5 step 1). Requiring both here, not
/// just "not neither", keeps this gate consistent with `parse_certificate`,
/// which hard-requires both and is only ever reached for secrets that
/// passed this gate.
pub fn is_eligible(secret: &Secret, ctx: &Context) -> bool {
    let namespace = secret.namespace().unwrap_or_default();
    if !ctx.config.namespace_policy.is_allowed(&namespace) {
        return false;
    }

    let data = secret.data.as_ref();
    let has_crt = data.map(|d| d.contains_key(secret_data::TLS_CRT)).unwrap_or(false);
    let has_key = data.map(|d| d.contains_key(secret_data::TLS_KEY)).unwrap_or(false);
    if !has_crt || !has_key {
        return false;
    }

    let enabled_key = format!("{}/{}", ctx.config.prefix, bookkeeping::SYNC_ENABLED);
    secret
        .annotations()
        .get(&enabled_key)
        .map(|v| v == "true")
        .unwrap_or(false)
}

/// Step 4: parse the Certificate Model from a Secret (spec §4.1, §3).
pub fn parse_certificate(secret: &Secret, ctx: &Context) -> Result<Certificate> {
    let data = secret.data.as_ref();
    let certificate_pem = data
        .and_then(|d| d.get(secret_data::TLS_CRT))
        .map(|b| b.0.clone())
        .ok_or_else(|| SyncError::InvalidConfig("secret missing tls.crt".to_string()))?;
    let key_pem = data
        .and_then(|d| d.get(secret_data::TLS_KEY))
        .map(|b| b.0.clone())
        .ok_or_else(|| SyncError::InvalidConfig("secret missing tls.key".to_string()))?;
    let ca_pem = data.and_then(|d| d.get(secret_data::CA_CRT)).map(|b| b.0.clone());

    let annotations: BTreeMap<String, String> = secret.annotations().clone().into_iter().collect();
    let known_stores = ctx.registry.known_store_names();
    let syncs = parser::parse_sync_configurations(&annotations, &ctx.config.prefix, &known_stores);

    Ok(Certificate {
        secret_name: secret.name_any(),
        namespace: secret.namespace().unwrap_or_default(),
        certificate_pem,
        key_pem,
        ca_pem,
        syncs,
    })
}

/// Step 5: fan out to all configured Remote Stores concurrently, each
/// bounded by a per-call deadline; step 6: wait for all of them
/// regardless of individual outcome (spec §4.5, §5).
pub async fn fan_out(cert: Arc<Certificate>, configs: Vec<SyncConfiguration>, ctx: Arc<Context>) -> Vec<SyncOutcome> {
    let deadline = Duration::from_secs(DEFAULT_SYNC_TIMEOUT_SECS);

    let tasks: Vec<_> = configs
        .into_iter()
        .map(|config| {
            let cert = Arc::clone(&cert);
            let ctx = Arc::clone(&ctx);
            tokio::spawn(async move {
                let result = sync_one(&cert, &config, &ctx, deadline).await;
                SyncOutcome { config, result }
            })
        })
        .collect();

    let mut outcomes = Vec::with_capacity(tasks.len());
    for task in tasks {
        match task.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(join_err) => {
                warn!("sync task panicked: {join_err}");
            }
        }
    }
    outcomes
}

async fn sync_one(
    cert: &Certificate,
    config: &SyncConfiguration,
    ctx: &Context,
    deadline: Duration,
) -> std::result::Result<BTreeMap<String, String>, SyncError> {
    let store = ctx.registry.build_store(config)?;
    match tokio::time::timeout(deadline, store.sync(cert)).await {
        Ok(result) => result,
        Err(_) => Err(SyncError::Timeout(deadline)),
    }
}

/// The full per-Secret reconcile algorithm (spec §4.5 steps 1-9).
#[instrument(skip(secret, ctx), fields(secret = %secret.name_any(), namespace = %secret.namespace().unwrap_or_default()))]
pub async fn reconcile(secret: Arc<Secret>, ctx: Arc<Context>) -> Result<()> {
    if !is_eligible(&secret, &ctx) {
        debug!("secret not eligible for sync, skipping");
        return Ok(());
    }

    let annotations: BTreeMap<String, String> = secret.annotations().clone().into_iter().collect();
    let now = Utc::now();

    if !retry::ready_to_retry(&annotations, &ctx.config.prefix, now) {
        debug!("retry cap reached or next-retry not yet due, skipping");
        return Ok(());
    }

    let data: BTreeMap<String, Vec<u8>> = secret
        .data
        .as_ref()
        .map(|d| d.iter().map(|(k, v)| (k.clone(), v.0.clone())).collect())
        .unwrap_or_default();

    if !crate::model::hash::cache_changed(&data, &annotations, &ctx.config.prefix, ctx.config.cache_disable) {
        debug!("hash unchanged, skipping sync");
        return Ok(());
    }

    let cert = parse_certificate(&secret, &ctx)?;
    info!(targets = cert.syncs.len(), "reconciling secret");

    let consumed = retry::consumed_retries(&annotations, &ctx.config.prefix);
    let cert = Arc::new(cert);
    let outcomes = fan_out(Arc::clone(&cert), cert.syncs.clone(), Arc::clone(&ctx)).await;

    for outcome in &outcomes {
        let success = outcome.result.is_ok();
        ctx.metrics.record(&cert.namespace, &cert.secret_name, &outcome.config.store, success);
        let event_outcome = outcome.result.as_ref().map(|_| ()).map_err(|e| e.to_string());
        crate::events::emit_target_event(&ctx.client, &secret, &ctx.reporter, &outcome.config.store, &event_outcome).await;
    }

    let delta = compute_patch(&annotations, &data, &ctx.config.prefix, &outcomes, consumed, now);
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();

    persist_patch(&ctx, &secret, &delta).await?;

    crate::events::emit_aggregate_event(&ctx.client, &secret, &ctx.reporter, outcomes.len(), failed).await;

    Ok(())
}

/// Step 8: issue a single merge-patch of the annotation subtree. Patch
/// failure does not advance the local retry counter (spec §4.5 step 8).
async fn persist_patch(ctx: &Context, secret: &Secret, delta: &BTreeMap<String, Option<String>>) -> Result<()> {
    if delta.is_empty() {
        return Ok(());
    }

    let api: Api<Secret> = Api::namespaced(ctx.client.clone(), &secret.namespace().unwrap_or_default());
    let patch = serde_json::json!({
        "metadata": {
            "annotations": delta,
        }
    });

    api.patch(&secret.name_any(), &PatchParams::apply("cert-manager-sync"), &Patch::Merge(&patch))
        .await?;
    Ok(())
}
