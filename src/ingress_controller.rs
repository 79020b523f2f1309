// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Ingress watch loop.
//!
//! A `kube` watcher delivers Ingress snapshots. The engine needs create,
//! update and delete callbacks with both the old and the new snapshot on
//! update, so the dispatcher keeps the last snapshot of every Ingress keyed
//! by `namespace/name`.
//!
//! When the watch is re-established the watcher replays the full listing
//! (`Init`, `InitApply`..., `InitDone`). Ingresses that were cached before the
//! relist but are absent from it were deleted while the watch was down, and
//! receive a delete callback once the relist completes.
//!
//! Events are handled one at a time, in delivery order.

use crate::constants::KIND_INGRESS;
use crate::context::Context;
use crate::engine::{ReconcileSummary, ReconciliationEngine};
use crate::resource::RoutingResource;
use anyhow::Result;
use futures::StreamExt;
use k8s_openapi::api::networking::v1::Ingress;
use kube::runtime::watcher::{self, Event};
use kube::runtime::WatchStreamExt;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Routes watcher events to engine callbacks.
pub struct IngressEventDispatcher {
    engine: Arc<ReconciliationEngine>,
    /// Last observed snapshot per `namespace/name`
    snapshots: HashMap<String, RoutingResource>,
    /// Keys seen since the last `Init`; `None` outside a relist
    relist: Option<HashSet<String>>,
}

impl IngressEventDispatcher {
    #[must_use]
    pub fn new(engine: Arc<ReconciliationEngine>) -> Self {
        Self {
            engine,
            snapshots: HashMap::new(),
            relist: None,
        }
    }

    /// Number of Ingress snapshots currently cached
    #[must_use]
    pub fn cached(&self) -> usize {
        self.snapshots.len()
    }

    /// Cached snapshot for `namespace/name`
    #[must_use]
    pub fn snapshot(&self, key: &str) -> Option<&RoutingResource> {
        self.snapshots.get(key)
    }

    /// Handle one watcher event.
    pub async fn dispatch(&mut self, event: Event<Ingress>) -> ReconcileSummary {
        match event {
            Event::Apply(ingress) => self.apply(RoutingResource::from_ingress(&ingress)).await,
            Event::Delete(ingress) => self.delete(RoutingResource::from_ingress(&ingress)).await,
            Event::Init => {
                debug!("Ingress relist started");
                self.relist = Some(HashSet::new());
                ReconcileSummary::default()
            }
            Event::InitApply(ingress) => {
                let resource = RoutingResource::from_ingress(&ingress);
                if let Some(seen) = self.relist.as_mut() {
                    seen.insert(resource.key());
                }
                self.apply(resource).await
            }
            Event::InitDone => self.finish_relist().await,
        }
    }

    async fn apply(&mut self, resource: RoutingResource) -> ReconcileSummary {
        let start = Instant::now();
        let key = resource.key();

        let (event, summary) = match self.snapshots.get(&key) {
            Some(old) => ("update", self.engine.on_update(old, &resource).await),
            None => ("create", self.engine.on_create(&resource).await),
        };

        crate::metrics::record_event(event, start.elapsed());
        log_summary(event, &resource, &summary);
        self.snapshots.insert(key, resource);
        summary
    }

    async fn delete(&mut self, resource: RoutingResource) -> ReconcileSummary {
        let start = Instant::now();
        self.snapshots.remove(&resource.key());

        let summary = self.engine.on_delete(&resource).await;

        crate::metrics::record_event("delete", start.elapsed());
        log_summary("delete", &resource, &summary);
        summary
    }

    /// Delete every cached Ingress that the relist did not return.
    async fn finish_relist(&mut self) -> ReconcileSummary {
        let Some(seen) = self.relist.take() else {
            return ReconcileSummary::default();
        };

        let mut stale: Vec<String> = self
            .snapshots
            .keys()
            .filter(|key| !seen.contains(*key))
            .cloned()
            .collect();
        stale.sort();

        info!(
            listed = seen.len(),
            vanished = stale.len(),
            "Ingress relist complete"
        );

        let mut summary = ReconcileSummary::default();
        for key in stale {
            if let Some(resource) = self.snapshots.get(&key).cloned() {
                info!(ingress = %key, "Ingress disappeared while the watch was down");
                summary.merge(self.delete(resource).await);
            }
        }
        summary
    }
}

fn log_summary(event: &str, resource: &RoutingResource, summary: &ReconcileSummary) {
    if summary.is_noop() {
        return;
    }
    debug!(
        event,
        ingress = %resource,
        upserted = summary.upserted,
        deleted = summary.deleted,
        migrated = summary.migrated,
        skipped = summary.skipped,
        retained = summary.retained,
        failed = summary.failed,
        "Ingress event handled"
    );
}

/// Run the Ingress watch loop until the stream ends.
///
/// Watch errors are logged and counted; the watcher backs off and resumes
/// on its own.
///
/// # Errors
///
/// Currently never returns an error; the `Result` mirrors the other
/// long-running tasks selected in `main`.
pub async fn run_ingress_controller(context: Arc<Context>) -> Result<()> {
    info!(scope = context.scope(), "Starting {KIND_INGRESS} controller");

    let api = context.ingress_api();
    let stream = watcher::watcher(api, watcher::Config::default()).default_backoff();
    let mut stream = std::pin::pin!(stream);
    let mut dispatcher = IngressEventDispatcher::new(Arc::clone(&context.engine));

    while let Some(event) = stream.next().await {
        match event {
            Ok(event) => {
                dispatcher.dispatch(event).await;
            }
            Err(err) => {
                warn!(error = %err, "{KIND_INGRESS} watch error, backing off");
                crate::metrics::record_watch_error(KIND_INGRESS);
            }
        }
    }

    warn!("{KIND_INGRESS} watch stream ended");
    Ok(())
}

#[cfg(test)]
#[path = "ingress_controller_tests.rs"]
mod ingress_controller_tests;
