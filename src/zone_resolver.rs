// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Hostname → hosted zone resolution.
//!
//! Zones are listed fresh on every call; nothing is cached, so a zone created
//! while the controller runs is picked up on the next reconciliation.

use crate::constants::DNS_LABEL_SEPARATOR;
use crate::dns_errors::DnsProviderError;
use crate::provider::{DnsZoneService, HostedZone};
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// How to choose between several zones that can contain a hostname.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZoneMatchPolicy {
    /// The first matching zone in listing order wins
    #[default]
    FirstMatch,
    /// The most specific (longest) matching zone wins
    LongestSuffix,
}

impl FromStr for ZoneMatchPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "first-match" => Ok(Self::FirstMatch),
            "longest-suffix" => Ok(Self::LongestSuffix),
            other => Err(format!(
                "unknown zone match policy '{other}' (expected first-match or longest-suffix)"
            )),
        }
    }
}

/// Resolves hostnames to zone ids using a [`DnsZoneService`].
#[derive(Clone)]
pub struct ZoneResolver {
    service: Arc<dyn DnsZoneService>,
    policy: ZoneMatchPolicy,
}

impl ZoneResolver {
    pub fn new(service: Arc<dyn DnsZoneService>, policy: ZoneMatchPolicy) -> Self {
        Self { service, policy }
    }

    /// Return the id of the zone that should contain `hostname`.
    ///
    /// # Errors
    ///
    /// Returns [`DnsProviderError::ZoneNotFound`] when no zone matches, or the
    /// service's error when the listing itself fails.
    pub async fn resolve_zone_id(&self, hostname: &str) -> Result<String, DnsProviderError> {
        let padded = pad_hostname(hostname);
        debug!(hostname = %padded, "Searching hosted zone for host");

        let zones = self.service.list_zones().await?;
        let zone = select_zone(&zones, &padded, self.policy).ok_or_else(|| {
            DnsProviderError::ZoneNotFound {
                hostname: padded.clone(),
            }
        })?;

        debug!(hostname = %padded, zone = %zone.name, zone_id = %zone.id, "Found hosted zone");
        Ok(zone.id.clone())
    }
}

/// Append the trailing label separator unless it is already present.
#[must_use]
pub fn pad_hostname(hostname: &str) -> String {
    if hostname.ends_with(DNS_LABEL_SEPARATOR) {
        hostname.to_string()
    } else {
        format!("{hostname}{DNS_LABEL_SEPARATOR}")
    }
}

/// True when `zone_name` can contain `padded_hostname`.
///
/// Matching stops at label boundaries: `shop.example.com.` is inside
/// `example.com.` but `shopexample.com.` is not.
#[must_use]
pub fn zone_contains(zone_name: &str, padded_hostname: &str) -> bool {
    if zone_name.is_empty() {
        return false;
    }
    padded_hostname == zone_name
        || padded_hostname
            .strip_suffix(zone_name)
            .is_some_and(|head| head.ends_with(DNS_LABEL_SEPARATOR))
}

/// Pick the zone for `padded_hostname` under `policy`.
#[must_use]
pub fn select_zone<'a>(
    zones: &'a [HostedZone],
    padded_hostname: &str,
    policy: ZoneMatchPolicy,
) -> Option<&'a HostedZone> {
    let mut candidates = zones
        .iter()
        .filter(|zone| zone_contains(&zone.name, padded_hostname));

    match policy {
        ZoneMatchPolicy::FirstMatch => candidates.next(),
        // max_by_key keeps the last maximum; reverse so listing order breaks ties
        ZoneMatchPolicy::LongestSuffix => candidates.rev().max_by_key(|zone| zone.name.len()),
    }
}

#[cfg(test)]
#[path = "zone_resolver_tests.rs"]
mod zone_resolver_tests;
