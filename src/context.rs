// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The controller context threaded through every reconcile (spec §9:
//! "Eliminating the source's ambient globals").

use crate::config::Config;
use crate::metrics::Metrics;
use crate::store::registry::StoreRegistry;
use kube::runtime::events::Reporter;
use kube::Client;

/// Shared, read-only state across reconciles: the Kubernetes client, the
/// loaded configuration, the store registry, and the observability
/// plumbing (spec §5 "Shared resources").
pub struct Context {
    pub client: Client,
    pub config: Config,
    pub registry: StoreRegistry,
    pub reporter: Reporter,
    pub metrics: Metrics,
}

impl Context {
    pub fn new(client: Client, config: Config) -> Self {
        Self {
            client,
            config,
            registry: StoreRegistry::build(),
            reporter: crate::events::reporter(),
            metrics: Metrics::new(),
        }
    }
}
