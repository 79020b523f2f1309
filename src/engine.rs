// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reconciliation engine.
//!
//! The engine sits behind three callbacks, [`ReconciliationEngine::on_create`],
//! [`ReconciliationEngine::on_update`] and [`ReconciliationEngine::on_delete`],
//! and turns each Ingress snapshot into Route 53 record mutations.
//!
//! # Per-hostname sequence
//!
//! Create path, for every allow-listed hostname:
//! 1. acquire a reference for the hostname
//! 2. resolve the hosted zone and the load balancer alias target
//! 3. optionally delete the opposite-kind record (legacy migration)
//! 4. upsert the record of the configured kind
//!
//! Delete path, for every allow-listed hostname:
//! 1. release the reference; stop here if other Ingresses still declare it
//! 2. resolve the hosted zone and the load balancer alias target
//! 3. delete the record of the configured kind
//!
//! A failure on one hostname is logged and the engine moves on to the next
//! one. Nothing here retries; the SDK client's retry policy applies.

use crate::alias_resolver::AliasResolver;
use crate::change_classifier::materially_different;
use crate::config::EngineConfig;
use crate::error_classifier::classify_and_log;
use crate::hostname_filter::HostnameFilter;
use crate::provider::{DnsZoneService, FrontEndLookup};
use crate::record_set::{build, ChangeAction, DesiredRecordSet, RecordKind};
use crate::reference_counter::ReferenceCounter;
use crate::resource::RoutingResource;
use crate::zone_resolver::ZoneResolver;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome counters for one callback invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Upserts accepted by the DNS service
    pub upserted: usize,
    /// Deletes accepted by the DNS service
    pub deleted: usize,
    /// Legacy opposite-kind deletes accepted by the DNS service
    pub migrated: usize,
    /// Hostnames skipped (empty or not allow-listed)
    pub skipped: usize,
    /// Deletes suppressed because other Ingresses still declare the hostname
    pub retained: usize,
    /// Hostnames whose processing hit a severe or log-only error
    pub failed: usize,
}

impl ReconcileSummary {
    /// Add the counters of `other` to `self`
    pub fn merge(&mut self, other: Self) {
        self.upserted += other.upserted;
        self.deleted += other.deleted;
        self.migrated += other.migrated;
        self.skipped += other.skipped;
        self.retained += other.retained;
        self.failed += other.failed;
    }

    /// True when no hostname was touched at all
    #[must_use]
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Drives record mutations for routing resources.
pub struct ReconciliationEngine {
    config: EngineConfig,
    filter: HostnameFilter,
    zones: ZoneResolver,
    aliases: AliasResolver,
    dns: Arc<dyn DnsZoneService>,
    references: ReferenceCounter,
}

impl ReconciliationEngine {
    /// Build an engine. The reference counter is created here and owned by
    /// the engine for its whole lifetime.
    pub fn new(
        config: EngineConfig,
        dns: Arc<dyn DnsZoneService>,
        front_ends: Arc<dyn FrontEndLookup>,
    ) -> Self {
        let filter = HostnameFilter::new(&config.allow_prefixes, &config.allow_suffixes);
        let zones = ZoneResolver::new(Arc::clone(&dns), config.zone_match_policy);
        let aliases = AliasResolver::new(front_ends);

        Self {
            config,
            filter,
            zones,
            aliases,
            dns,
            references: ReferenceCounter::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Reference counts held by this engine
    #[must_use]
    pub fn references(&self) -> &ReferenceCounter {
        &self.references
    }

    /// Handle a newly observed Ingress.
    pub async fn on_create(&self, resource: &RoutingResource) -> ReconcileSummary {
        debug!(ingress = %resource, "Create callback");
        if !resource.dns_enabled {
            return ReconcileSummary::default();
        }

        info!(
            ingress = %resource.name,
            namespace = %resource.namespace,
            "Creation of an ingress resource detected"
        );
        let summary = self.create_records(resource).await;
        self.publish_tracked();
        summary
    }

    /// Handle a changed Ingress.
    ///
    /// Snapshots that differ only in untracked fields are skipped. Otherwise
    /// the old snapshot's records are released and the new snapshot's records
    /// are created, which re-validates every record against the current alias
    /// target even when nothing about the hostname changed.
    pub async fn on_update(
        &self,
        old: &RoutingResource,
        new: &RoutingResource,
    ) -> ReconcileSummary {
        debug!(ingress = %new, "Update callback");
        if !materially_different(old, new) {
            debug!(ingress = %new, "Skipping automatically updated ingress");
            return ReconcileSummary::default();
        }

        let mut summary = ReconcileSummary::default();

        if old.dns_enabled {
            info!(
                ingress = %old.name,
                namespace = %old.namespace,
                "Update of an ingress resource detected, the old one will be deleted"
            );
            summary.merge(self.delete_records(old).await);
        }

        if new.dns_enabled {
            info!(
                ingress = %new.name,
                namespace = %new.namespace,
                "Update of an ingress resource detected, the new one will be created"
            );
            summary.merge(self.create_records(new).await);
        }

        self.publish_tracked();
        summary
    }

    /// Handle a deleted Ingress.
    pub async fn on_delete(&self, resource: &RoutingResource) -> ReconcileSummary {
        debug!(ingress = %resource, "Delete callback");
        if !resource.dns_enabled {
            return ReconcileSummary::default();
        }

        info!(
            ingress = %resource.name,
            namespace = %resource.namespace,
            "Deletion of an ingress resource detected"
        );
        let summary = self.delete_records(resource).await;
        self.publish_tracked();
        summary
    }

    fn record_kind_for(&self, resource: &RoutingResource) -> RecordKind {
        resource
            .record_kind
            .resolve(self.config.default_record_kind)
    }

    /// Returns false (and counts a skip) for hostnames the engine must not touch.
    fn eligible(
        &self,
        resource: &RoutingResource,
        host: &str,
        summary: &mut ReconcileSummary,
    ) -> bool {
        if host.is_empty() {
            debug!(ingress = %resource, "Skipping ingress rule without a host");
            crate::metrics::record_skipped_host("empty");
            summary.skipped += 1;
            return false;
        }

        if !self.filter.is_allowed(host) {
            info!(
                hostname = %host,
                ingress = %resource.name,
                namespace = %resource.namespace,
                "Provided host {host} is not in whitelist, skipping"
            );
            crate::metrics::record_skipped_host("not_allowed");
            summary.skipped += 1;
            return false;
        }

        true
    }

    async fn create_records(&self, resource: &RoutingResource) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();
        let kind = self.record_kind_for(resource);

        for host in &resource.hosts {
            if !self.eligible(resource, host, &mut summary) {
                continue;
            }

            info!(
                hostname = %host,
                ingress = %resource.name,
                namespace = %resource.namespace,
                kind = %kind,
                "Creating/updating Route53 record set"
            );

            // Counted before any remote call so the count tracks declarations,
            // not confirmed records
            self.references.acquire(host);

            let Some(zone_id) = self.resolve_zone(host).await else {
                summary.failed += 1;
                continue;
            };
            let front_end = self.aliases.resolve_alias(resource.load_balancer_name()).await;

            if self.config.retires_before_create(kind) {
                let retired = kind.opposite();
                info!(
                    hostname = %host,
                    retired = %retired,
                    "Deleting {retired} record set before creating {kind}"
                );
                let stale = build(&front_end.dns_name, &front_end.zone_id, host, retired);
                if self
                    .apply_change(ChangeAction::Delete, &stale, &zone_id, resource)
                    .await
                {
                    summary.migrated += 1;
                }
            }

            let desired = build(&front_end.dns_name, &front_end.zone_id, host, kind);
            if self
                .apply_change(ChangeAction::Upsert, &desired, &zone_id, resource)
                .await
            {
                summary.upserted += 1;
            } else {
                summary.failed += 1;
            }
        }

        summary
    }

    async fn delete_records(&self, resource: &RoutingResource) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();
        let kind = self.record_kind_for(resource);

        for host in &resource.hosts {
            if !self.eligible(resource, host, &mut summary) {
                continue;
            }

            info!(
                hostname = %host,
                ingress = %resource.name,
                namespace = %resource.namespace,
                kind = %kind,
                "Deleting Route53 record set"
            );

            if !self.references.release(host) {
                info!(
                    hostname = %host,
                    remaining = self.references.count(host),
                    "The hostname {host} is still declared by other ingresses, deletion skipped"
                );
                summary.retained += 1;
                continue;
            }

            let Some(zone_id) = self.resolve_zone(host).await else {
                summary.failed += 1;
                continue;
            };
            let front_end = self.aliases.resolve_alias(resource.load_balancer_name()).await;

            let record = build(&front_end.dns_name, &front_end.zone_id, host, kind);
            if self
                .apply_change(ChangeAction::Delete, &record, &zone_id, resource)
                .await
            {
                summary.deleted += 1;
            } else {
                summary.failed += 1;
            }
        }

        summary
    }

    async fn resolve_zone(&self, host: &str) -> Option<String> {
        match self.zones.resolve_zone_id(host).await {
            Ok(zone_id) => Some(zone_id),
            Err(err) => {
                classify_and_log(&err, "resolve hosted zone", host);
                None
            }
        }
    }

    /// Submit one change; returns true when it succeeded or failed benignly.
    async fn apply_change(
        &self,
        action: ChangeAction,
        record: &DesiredRecordSet,
        zone_id: &str,
        resource: &RoutingResource,
    ) -> bool {
        match self.dns.change_record_set(action, record, zone_id).await {
            Ok(description) => {
                info!(
                    hostname = %record.name,
                    ingress = %resource.name,
                    namespace = %resource.namespace,
                    zone_id,
                    action = %action,
                    "{description}"
                );
                crate::metrics::record_change(action, "success");
                true
            }
            Err(err) => {
                let classification = classify_and_log(&err, action.as_str(), &record.name);
                crate::metrics::record_change(action, classification.severity.as_str());
                classification.severity.is_success_equivalent()
            }
        }
    }

    fn publish_tracked(&self) {
        crate::metrics::set_tracked_hostnames(self.references.tracked());
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
