// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Load balancer → alias target resolution.
//!
//! A front-end may be provisioned as a classic load balancer or under the newer
//! API generation, and the Ingress does not say which. The classic API is asked
//! first and the newer one only when the first produced no DNS name.

use crate::error_classifier::classify_and_log;
use crate::provider::{FrontEnd, FrontEndLookup, LoadBalancerGeneration};
use std::sync::Arc;
use tracing::{debug, warn};

/// Lookup order for front-end generations
const GENERATION_ORDER: [LoadBalancerGeneration; 2] =
    [LoadBalancerGeneration::Classic, LoadBalancerGeneration::V2];

/// Best-effort front-end resolver.
#[derive(Clone)]
pub struct AliasResolver {
    lookup: Arc<dyn FrontEndLookup>,
}

impl AliasResolver {
    pub fn new(lookup: Arc<dyn FrontEndLookup>) -> Self {
        Self { lookup }
    }

    /// Resolve `load_balancer_name` to its DNS name and canonical zone id.
    ///
    /// Never fails: lookup errors are classified and logged, and a front-end
    /// that cannot be found yields empty strings.
    pub async fn resolve_alias(&self, load_balancer_name: &str) -> FrontEnd {
        if load_balancer_name.is_empty() {
            warn!("Ingress has no load balancer name; alias target left empty");
            return FrontEnd::default();
        }

        for generation in GENERATION_ORDER {
            match self
                .lookup
                .resolve_front_end(load_balancer_name, generation)
                .await
            {
                Ok(Some(front_end)) if !front_end.is_empty() => {
                    debug!(
                        load_balancer = load_balancer_name,
                        %generation,
                        dns_name = %front_end.dns_name,
                        zone_id = %front_end.zone_id,
                        "Resolved load balancer"
                    );
                    return front_end;
                }
                Ok(_) => {
                    debug!(
                        load_balancer = load_balancer_name,
                        %generation,
                        "Load balancer not found in this generation"
                    );
                }
                Err(err) => {
                    let operation = format!("describe {generation} load balancer");
                    classify_and_log(&err, &operation, load_balancer_name);
                }
            }
        }

        warn!(
            load_balancer = load_balancer_name,
            "Load balancer could not be resolved; alias target left empty"
        );
        FrontEnd::default()
    }
}

#[cfg(test)]
#[path = "alias_resolver_tests.rs"]
mod alias_resolver_tests;
