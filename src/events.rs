// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes event emission (spec §4.5 step 5c, 9; §6).

use k8s_openapi::api::core::v1::Secret;
use kube::runtime::events::{Event, EventType, Recorder, Reporter};
use kube::{Client, Resource};
use tracing::warn;

const FIELD_MANAGER: &str = "cert-manager-sync";

pub fn reporter() -> Reporter {
    Reporter {
        controller: FIELD_MANAGER.to_string(),
        instance: None,
    }
}

/// Emit a per-target `Synced` (Normal) or `SyncFailed` (Warning) event on
/// the Secret object (spec §4.5 step 5c).
pub async fn emit_target_event(client: &Client, secret: &Secret, reporter: &Reporter, store: &str, outcome: &Result<(), String>) {
    let recorder = Recorder::new(client.clone(), reporter.clone(), secret.object_ref(&()));
    let event = match outcome {
        Ok(()) => Event {
            type_: EventType::Normal,
            reason: "Synced".to_string(),
            note: Some(format!("Synced certificate to store {store}")),
            action: "Sync".to_string(),
            secondary: None,
        },
        Err(err) => Event {
            type_: EventType::Warning,
            reason: "SyncFailed".to_string(),
            note: Some(format!("Failed to sync certificate to store {store}: {err}")),
            action: "Sync".to_string(),
            secondary: None,
        },
    };
    if let Err(e) = recorder.publish(&event).await {
        warn!("failed to publish event: {e}");
    }
}

/// Emit one aggregate event per reconcile: a warning if any target
/// failed, a normal event naming the number of targets otherwise
/// (spec §4.5 step 9).
pub async fn emit_aggregate_event(client: &Client, secret: &Secret, reporter: &Reporter, total: usize, failed: usize) {
    let recorder = Recorder::new(client.clone(), reporter.clone(), secret.object_ref(&()));
    let event = if failed > 0 {
        Event {
            type_: EventType::Warning,
            reason: "SyncFailed".to_string(),
            note: Some(format!("{failed}/{total} store syncs failed")),
            action: "Sync".to_string(),
            secondary: None,
        }
    } else {
        Event {
            type_: EventType::Normal,
            reason: "Synced".to_string(),
            note: Some(format!("Synced to {total} store(s)")),
            action: "Sync".to_string(),
            secondary: None,
        }
    };
    if let Err(e) = recorder.publish(&event).await {
        warn!("failed to publish aggregate event: {e}");
    }
}
