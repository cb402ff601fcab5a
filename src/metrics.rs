// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Metrics endpoint (spec §4.7, §6): `cert_manager_sync_status` gauge
//! served over HTTP alongside `/healthz`.

use axum::{extract::State, routing::get, Router};
use prometheus::{GaugeVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    status: GaugeVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();
        let status = GaugeVec::new(
            Opts::new("cert_manager_sync_status", "Per-target sync outcome, 1 for the active status"),
            &["namespace", "secret", "store", "status"],
        )
        .expect("static metric descriptor is valid");
        registry.register(Box::new(status.clone())).expect("metric registered exactly once");

        Self {
            registry: Arc::new(registry),
            status,
        }
    }

    /// Record an outcome for one (secret, store) pair, clearing the
    /// opposite status so exactly one of success/fail reads 1 at a time.
    pub fn record(&self, namespace: &str, secret: &str, store: &str, success: bool) {
        let (active, inactive) = if success { ("success", "fail") } else { ("fail", "success") };
        self.status.with_label_values(&[namespace, secret, store, active]).set(1.0);
        self.status.with_label_values(&[namespace, secret, store, inactive]).set(0.0);
    }

    fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let families = self.registry.gather();
        encoder.encode_to_string(&families).unwrap_or_default()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Serve `/metrics` and `/healthz` on `port` until the process exits.
pub async fn serve(metrics: Metrics, port: u16) -> anyhow::Result<()> {
    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/healthz", get(healthz_handler))
        .with_state(metrics);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("metrics server listening on :{port}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn metrics_handler(State(metrics): State<Metrics>) -> String {
    metrics.render()
}

async fn healthz_handler() -> &'static str {
    "ok"
}
