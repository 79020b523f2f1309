// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Routing resources as seen by the reconciliation engine.
//!
//! The engine never holds on to Kubernetes objects. Every watcher event is
//! turned into a [`RoutingResource`] at the ingestion boundary: hostnames are
//! copied out of the Ingress rules and the tracked annotations are parsed into
//! typed values once, so the engine has no string-parsing branches.

use crate::constants::{
    ANNOTATION_ALIAS, ANNOTATION_DNS_ENABLED, ANNOTATION_LOAD_BALANCER_NAME,
    ANNOTATION_RECORD_KIND,
};
use crate::record_set::RecordKind;
use k8s_openapi::api::networking::v1::Ingress;
use kube::ResourceExt;
use std::collections::BTreeMap;
use std::fmt;

/// Raw text of every annotation the controller tracks.
///
/// Missing annotations are stored as empty strings. Equality is textual, which
/// is what the change classifier needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedAnnotations {
    pub dns_enabled: String,
    pub load_balancer_name: String,
    pub record_kind: String,
    /// Legacy boolean `alias` annotation
    pub alias: String,
}

impl TrackedAnnotations {
    /// Copy the tracked keys out of an annotation map.
    #[must_use]
    pub fn from_map(annotations: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| annotations.get(key).cloned().unwrap_or_default();
        Self {
            dns_enabled: get(ANNOTATION_DNS_ENABLED),
            load_balancer_name: get(ANNOTATION_LOAD_BALANCER_NAME),
            record_kind: get(ANNOTATION_RECORD_KIND),
            alias: get(ANNOTATION_ALIAS),
        }
    }
}

/// Record kind requested by a resource, before the engine default applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordKindSetting {
    Alias,
    Cname,
    #[default]
    Unset,
}

impl RecordKindSetting {
    /// Resolve against the engine's default kind
    #[must_use]
    pub fn resolve(self, default: RecordKind) -> RecordKind {
        match self {
            Self::Alias => RecordKind::Alias,
            Self::Cname => RecordKind::Cname,
            Self::Unset => default,
        }
    }

    /// Derive the setting from the raw annotations.
    ///
    /// An explicit `record-kind` wins; malformed values select CNAME. Otherwise
    /// a parseable legacy `alias` boolean decides. Anything else is unset.
    #[must_use]
    pub fn from_annotations(annotations: &TrackedAnnotations) -> Self {
        if !annotations.record_kind.trim().is_empty() {
            return match RecordKind::parse_lenient(&annotations.record_kind) {
                RecordKind::Alias => Self::Alias,
                RecordKind::Cname => Self::Cname,
            };
        }

        match parse_bool(&annotations.alias) {
            Some(true) => Self::Alias,
            Some(false) => Self::Cname,
            None => Self::Unset,
        }
    }
}

/// Parse a boolean-as-string annotation value.
///
/// Accepts the literal forms `1 t T TRUE true True` and `0 f F FALSE false
/// False`. Anything else returns `None`.
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Snapshot of one routing resource, extracted once per callback.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoutingResource {
    pub name: String,
    pub namespace: String,
    /// Hostnames in rule order; a rule without a host contributes `""`
    pub hosts: Vec<String>,
    pub annotations: TrackedAnnotations,
    /// Parsed opt-in flag
    pub dns_enabled: bool,
    /// Parsed record kind
    pub record_kind: RecordKindSetting,
}

impl RoutingResource {
    /// Build a resource from its identity, hostnames and annotation map.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        hosts: Vec<String>,
        annotations: &BTreeMap<String, String>,
    ) -> Self {
        let annotations = TrackedAnnotations::from_map(annotations);
        let dns_enabled = parse_bool(&annotations.dns_enabled).unwrap_or(false);
        let record_kind = RecordKindSetting::from_annotations(&annotations);

        Self {
            name: name.into(),
            namespace: namespace.into(),
            hosts,
            annotations,
            dns_enabled,
            record_kind,
        }
    }

    /// Extract the routing view of an `Ingress`.
    #[must_use]
    pub fn from_ingress(ingress: &Ingress) -> Self {
        let hosts = ingress
            .spec
            .as_ref()
            .and_then(|spec| spec.rules.as_ref())
            .map(|rules| {
                rules
                    .iter()
                    .map(|rule| rule.host.clone().unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default();

        Self::new(
            ingress.name_any(),
            ingress.namespace().unwrap_or_default(),
            hosts,
            ingress.annotations(),
        )
    }

    /// Load balancer name the records should point at
    #[must_use]
    pub fn load_balancer_name(&self) -> &str {
        &self.annotations.load_balancer_name
    }

    /// `namespace/name` key used by the event dispatcher
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

impl fmt::Display for RoutingResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

impl From<&Ingress> for RoutingResource {
    fn from(ingress: &Ingress) -> Self {
        Self::from_ingress(ingress)
    }
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod resource_tests;
