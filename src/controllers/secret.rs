// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Subscribes to Secret Add/Update events cluster-wide with a periodic
//! full resync, and delivers each to the Reconciler (spec §4.6).

use crate::constants::DEFAULT_RESYNC_SECS;
use crate::context::Context;
use crate::error::{Result, SyncError};
use futures::StreamExt;
use k8s_openapi::api::core::v1::Secret;
use kube::{
    runtime::{controller::Action, Controller},
    Api, Client,
};
use kube_runtime::watcher::Config as WatcherConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

pub struct SecretController {
    client: Client,
    ctx: Arc<Context>,
}

impl SecretController {
    pub fn new(client: Client, ctx: Arc<Context>) -> Self {
        Self { client, ctx }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let secrets: Api<Secret> = Api::all(self.client.clone());

        Controller::new(secrets, WatcherConfig::default())
            .run(reconcile, error_policy, self.ctx)
            .for_each(|res| async move {
                match res {
                    Ok(o) => debug!("reconciled secret: {:?}", o),
                    Err(e) => warn!("reconciliation error: {:?}", e),
                }
            })
            .await;

        Ok(())
    }
}

async fn reconcile(secret: Arc<Secret>, ctx: Arc<Context>) -> Result<Action> {
    crate::reconcile::reconcile(secret, ctx).await?;
    Ok(Action::requeue(Duration::from_secs(DEFAULT_RESYNC_SECS)))
}

fn error_policy(_secret: Arc<Secret>, error: &SyncError, _ctx: Arc<Context>) -> Action {
    error!("reconciliation error: {error}");
    Action::requeue(Duration::from_secs(60))
}
