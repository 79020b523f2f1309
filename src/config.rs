// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Engine configuration.
//!
//! Built once at startup (from the command line in `main`) and handed to
//! [`crate::engine::ReconciliationEngine::new`]. Nothing here is re-read while
//! the controller runs.

use crate::record_set::RecordKind;
use crate::zone_resolver::ZoneMatchPolicy;

/// Settings recognized by the reconciliation engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Comma-separated hostname prefixes eligible for DNS management
    pub allow_prefixes: String,
    /// Comma-separated hostname suffixes eligible for DNS management
    pub allow_suffixes: String,
    /// Delete the ALIAS form of a record before upserting its CNAME form
    pub legacy_delete_alias_before_create: bool,
    /// Delete the CNAME form of a record before upserting its ALIAS form
    pub legacy_delete_cname_before_create: bool,
    /// Record kind used when an Ingress does not choose one
    pub default_record_kind: RecordKind,
    pub zone_match_policy: ZoneMatchPolicy,
}

impl EngineConfig {
    /// True when the opposite-kind record should be deleted before upserting
    /// a record of kind `desired`.
    #[must_use]
    pub fn retires_before_create(&self, desired: RecordKind) -> bool {
        match desired {
            RecordKind::Cname => self.legacy_delete_alias_before_create,
            RecordKind::Alias => self.legacy_delete_cname_before_create,
        }
    }
}
