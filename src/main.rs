// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use kube::Client;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cert_manager_sync::config::Config;
use cert_manager_sync::context::Context;
use cert_manager_sync::controllers::SecretController;
use cert_manager_sync::metrics;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    init_logging(&config);

    info!("Starting cert-manager-sync operator");
    info!(prefix = %config.prefix, "Configuration loaded");

    // Create Kubernetes client
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    let enable_metrics = config.enable_metrics;
    let metrics_port = config.metrics_port;

    let ctx = Arc::new(Context::new(client.clone(), config));
    let secret_controller = SecretController::new(client, ctx.clone());

    info!("Starting controllers...");

    if enable_metrics {
        let metrics_handle = ctx.metrics.clone();
        tokio::spawn(async move {
            if let Err(e) = metrics::serve(metrics_handle, metrics_port).await {
                warn!("metrics server exited: {e}");
            }
        });
    }

    tokio::select! {
        res = secret_controller.run() => {
            res?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    // This should never be reached as the controller runs forever.
    warn!("controller stopped unexpectedly");
    Ok(())
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    if config.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
