// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Update-event significance check.
//!
//! Ingresses are updated constantly for reasons that do not affect DNS (status
//! from the load balancer controller, unrelated annotations, labels). Only the
//! hostname sequence and the tracked annotations matter; everything else is
//! ignored.

use crate::resource::RoutingResource;
use tracing::debug;

/// Returns true when `old` and `new` differ in anything the engine acts on.
///
/// Hostnames are compared in order and by length; annotations are compared
/// textually, so `"true"` and `"True"` count as different.
#[must_use]
pub fn materially_different(old: &RoutingResource, new: &RoutingResource) -> bool {
    if old.hosts.len() != new.hosts.len() {
        debug!(
            ingress = %new,
            old_hosts = ?old.hosts,
            new_hosts = ?new.hosts,
            "Number of ingress rules changed"
        );
        return true;
    }

    if let Some((old_host, new_host)) = old
        .hosts
        .iter()
        .zip(&new.hosts)
        .find(|(old_host, new_host)| old_host != new_host)
    {
        debug!(
            ingress = %new,
            old_host = %old_host,
            new_host = %new_host,
            "Ingress rule hostnames changed"
        );
        return true;
    }

    let tracked = [
        (
            "dns-enabled",
            &old.annotations.dns_enabled,
            &new.annotations.dns_enabled,
        ),
        (
            "load-balancer-name",
            &old.annotations.load_balancer_name,
            &new.annotations.load_balancer_name,
        ),
        (
            "record-kind",
            &old.annotations.record_kind,
            &new.annotations.record_kind,
        ),
        ("alias", &old.annotations.alias, &new.annotations.alias),
    ];

    for (annotation, old_value, new_value) in tracked {
        if old_value != new_value {
            debug!(
                ingress = %new,
                annotation,
                old_value = %old_value,
                new_value = %new_value,
                "Tracked ingress annotation changed"
            );
            return true;
        }
    }

    false
}

#[cfg(test)]
#[path = "change_classifier_tests.rs"]
mod change_classifier_tests;
