// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Collaborator interfaces used by the reconciliation engine.
//!
//! The engine talks to two remote systems: the DNS zone service (zone listing
//! and record mutation) and the load-balancer API (front-end lookup). Both are
//! expressed as traits so the engine stays vendor-neutral; the AWS
//! implementations live in [`crate::aws`].

use crate::dns_errors::DnsProviderError;
use crate::record_set::{ChangeAction, DesiredRecordSet};
use async_trait::async_trait;
use std::fmt;

/// A zone known to the DNS service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedZone {
    /// Zone domain name, including the trailing separator (`example.com.`)
    pub name: String,
    /// Opaque zone identifier
    pub id: String,
}

impl HostedZone {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

/// Resolved load-balancer front-end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontEnd {
    pub dns_name: String,
    /// Canonical hosted zone id used as the alias target zone
    pub zone_id: String,
}

impl FrontEnd {
    pub fn new(dns_name: impl Into<String>, zone_id: impl Into<String>) -> Self {
        Self {
            dns_name: dns_name.into(),
            zone_id: zone_id.into(),
        }
    }

    /// True when the lookup produced no DNS name
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dns_name.is_empty()
    }
}

/// Load-balancer API generation a front-end may be provisioned under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadBalancerGeneration {
    /// Classic load balancers
    Classic,
    /// Application/network load balancers
    V2,
}

impl fmt::Display for LoadBalancerGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classic => f.write_str("classic"),
            Self::V2 => f.write_str("v2"),
        }
    }
}

/// Remote DNS zone service.
#[async_trait]
pub trait DnsZoneService: Send + Sync {
    /// List every zone the service knows about, in the service's order.
    async fn list_zones(&self) -> Result<Vec<HostedZone>, DnsProviderError>;

    /// Apply a single record change to `zone_id`.
    ///
    /// Returns a human-readable description of the submitted change.
    async fn change_record_set(
        &self,
        action: ChangeAction,
        record: &DesiredRecordSet,
        zone_id: &str,
    ) -> Result<String, DnsProviderError>;
}

/// Remote load-balancer attribute lookup.
#[async_trait]
pub trait FrontEndLookup: Send + Sync {
    /// Look up `name` under one API generation.
    ///
    /// `Ok(None)` means the call succeeded but nothing matched.
    async fn resolve_front_end(
        &self,
        name: &str,
        generation: LoadBalancerGeneration,
    ) -> Result<Option<FrontEnd>, DnsProviderError>;
}
