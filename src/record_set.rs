// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Desired record-set construction.
//!
//! A [`DesiredRecordSet`] is the vendor-neutral payload handed to
//! [`crate::provider::DnsZoneService::change_record_set`]. Alias records point
//! at the load balancer's zone-scoped target with health evaluation enabled;
//! CNAME records carry the load balancer's DNS name as a literal value.

use crate::constants::{ALIAS_RECORD_TYPE, CNAME_RECORD_TTL_SECS, CNAME_RECORD_TYPE};
use std::fmt;

/// Kind of record written for a hostname.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordKind {
    /// Alias record bound to the front-end's canonical zone
    Alias,
    /// Plain CNAME pointing at the front-end's DNS name
    #[default]
    Cname,
}

impl RecordKind {
    /// Parse a record kind, falling back to [`RecordKind::Cname`] for anything
    /// that is not `ALIAS` (case-insensitive).
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("alias") {
            Self::Alias
        } else {
            Self::Cname
        }
    }

    /// The record kind a legacy migration delete targets before an upsert.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Alias => Self::Cname,
            Self::Cname => Self::Alias,
        }
    }

    /// Route 53 record type written for this kind
    #[must_use]
    pub fn record_type(self) -> &'static str {
        match self {
            Self::Alias => ALIAS_RECORD_TYPE,
            Self::Cname => CNAME_RECORD_TYPE,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alias => f.write_str("ALIAS"),
            Self::Cname => f.write_str("CNAME"),
        }
    }
}

/// Mutation applied to a record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeAction {
    Upsert,
    Delete,
}

impl ChangeAction {
    /// Wire name of the action
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upsert => "UPSERT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target of a desired record set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordTarget {
    Alias {
        dns_name: String,
        hosted_zone_id: String,
        evaluate_target_health: bool,
    },
    Cname {
        value: String,
        ttl: i64,
    },
}

/// A record set the controller wants to upsert or delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredRecordSet {
    /// Fully qualified hostname the record is bound to
    pub name: String,
    pub target: RecordTarget,
}

impl DesiredRecordSet {
    /// The kind of record this set describes
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        match self.target {
            RecordTarget::Alias { .. } => RecordKind::Alias,
            RecordTarget::Cname { .. } => RecordKind::Cname,
        }
    }

    /// Route 53 record type for this set
    #[must_use]
    pub fn record_type(&self) -> &'static str {
        self.kind().record_type()
    }
}

/// Build the record set for `hostname` pointing at the given front-end.
///
/// Empty alias fields are encoded as-is; a failed alias resolution therefore
/// produces an empty-valued record, which the remote service rejects.
#[must_use]
pub fn build(
    alias_target_name: &str,
    alias_target_zone_id: &str,
    hostname: &str,
    kind: RecordKind,
) -> DesiredRecordSet {
    let target = match kind {
        RecordKind::Alias => RecordTarget::Alias {
            dns_name: alias_target_name.to_string(),
            hosted_zone_id: alias_target_zone_id.to_string(),
            evaluate_target_health: true,
        },
        RecordKind::Cname => RecordTarget::Cname {
            value: alias_target_name.to_string(),
            ttl: CNAME_RECORD_TTL_SECS,
        },
    };

    DesiredRecordSet {
        name: hostname.to_string(),
        target,
    }
}

#[cfg(test)]
#[path = "record_set_tests.rs"]
mod record_set_tests;
