// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared context for the ingress controller.
//!
//! The controller receives an `Arc<Context>` holding:
//! - Kubernetes client used to watch Ingress objects
//! - The reconciliation engine, which owns the hostname reference counts
//! - The watch scope (one namespace or the whole cluster)

use crate::engine::ReconciliationEngine;
use k8s_openapi::api::networking::v1::Ingress;
use kube::{Api, Client};
use std::sync::Arc;

/// Shared context passed to the ingress controller.
#[derive(Clone)]
pub struct Context {
    /// Kubernetes client for API operations
    pub client: Client,

    /// Engine that turns Ingress events into record mutations
    pub engine: Arc<ReconciliationEngine>,

    /// Namespace to watch; `None` watches every namespace
    pub namespace: Option<String>,
}

impl Context {
    #[must_use]
    pub fn new(
        client: Client,
        engine: Arc<ReconciliationEngine>,
        namespace: Option<String>,
    ) -> Self {
        // An empty namespace from the command line means cluster-wide
        let namespace = namespace.filter(|ns| !ns.is_empty());
        Self {
            client,
            engine,
            namespace,
        }
    }

    /// Ingress API scoped to the configured namespace.
    #[must_use]
    pub fn ingress_api(&self) -> Api<Ingress> {
        match &self.namespace {
            Some(namespace) => Api::namespaced(self.client.clone(), namespace),
            None => Api::all(self.client.clone()),
        }
    }

    /// Human-readable watch scope for log lines
    #[must_use]
    pub fn scope(&self) -> &str {
        self.namespace.as_deref().unwrap_or("all namespaces")
    }
}

/// Install the process-wide rustls crypto provider.
///
/// The AWS SDK and kube clients compile in different rustls backends, so
/// rustls cannot pick one on its own and panics on the first TLS client.
/// Call this before building any client. Repeated calls are no-ops.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod context_tests;
