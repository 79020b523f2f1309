// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! In-memory collaborators for unit tests.

use crate::dns_errors::DnsProviderError;
use crate::provider::{DnsZoneService, FrontEnd, FrontEndLookup, HostedZone, LoadBalancerGeneration};
use crate::record_set::{ChangeAction, DesiredRecordSet};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// One recorded call to [`DnsZoneService::change_record_set`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedChange {
    pub action: ChangeAction,
    pub record: DesiredRecordSet,
    pub zone_id: String,
}

/// DNS zone service that records every change and can be told to fail.
#[derive(Default)]
pub struct MockDnsZoneService {
    pub zones: Vec<HostedZone>,
    pub list_error: Option<DnsProviderError>,
    /// Errors keyed by (action, hostname)
    pub change_errors: HashMap<(ChangeAction, String), DnsProviderError>,
    pub changes: Mutex<Vec<RecordedChange>>,
    pub list_calls: Mutex<usize>,
}

impl MockDnsZoneService {
    pub fn with_zones(zones: &[(&str, &str)]) -> Self {
        Self {
            zones: zones
                .iter()
                .map(|(name, id)| HostedZone::new(*name, *id))
                .collect(),
            ..Self::default()
        }
    }

    pub fn fail_change(
        mut self,
        action: ChangeAction,
        hostname: &str,
        err: DnsProviderError,
    ) -> Self {
        self.change_errors.insert((action, hostname.to_string()), err);
        self
    }

    pub fn recorded(&self) -> Vec<RecordedChange> {
        self.changes.lock().expect("changes lock").clone()
    }

    pub fn list_call_count(&self) -> usize {
        *self.list_calls.lock().expect("list lock")
    }
}

#[async_trait]
impl DnsZoneService for MockDnsZoneService {
    async fn list_zones(&self) -> Result<Vec<HostedZone>, DnsProviderError> {
        *self.list_calls.lock().expect("list lock") += 1;
        match &self.list_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.zones.clone()),
        }
    }

    async fn change_record_set(
        &self,
        action: ChangeAction,
        record: &DesiredRecordSet,
        zone_id: &str,
    ) -> Result<String, DnsProviderError> {
        self.changes.lock().expect("changes lock").push(RecordedChange {
            action,
            record: record.clone(),
            zone_id: zone_id.to_string(),
        });

        match self.change_errors.get(&(action, record.name.clone())) {
            Some(err) => Err(err.clone()),
            None => Ok(format!("{action} {} PENDING", record.name)),
        }
    }
}

/// Front-end lookup backed by a per-generation table.
#[derive(Default)]
pub struct MockFrontEndLookup {
    pub front_ends: HashMap<(LoadBalancerGeneration, String), FrontEnd>,
    pub errors: HashMap<(LoadBalancerGeneration, String), DnsProviderError>,
    pub calls: Mutex<Vec<(LoadBalancerGeneration, String)>>,
}

impl MockFrontEndLookup {
    pub fn with(
        mut self,
        generation: LoadBalancerGeneration,
        name: &str,
        dns_name: &str,
        zone_id: &str,
    ) -> Self {
        self.front_ends
            .insert((generation, name.to_string()), FrontEnd::new(dns_name, zone_id));
        self
    }

    pub fn failing(
        mut self,
        generation: LoadBalancerGeneration,
        name: &str,
        err: DnsProviderError,
    ) -> Self {
        self.errors.insert((generation, name.to_string()), err);
        self
    }

    pub fn calls(&self) -> Vec<(LoadBalancerGeneration, String)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl FrontEndLookup for MockFrontEndLookup {
    async fn resolve_front_end(
        &self,
        name: &str,
        generation: LoadBalancerGeneration,
    ) -> Result<Option<FrontEnd>, DnsProviderError> {
        let key = (generation, name.to_string());
        self.calls.lock().expect("calls lock").push(key.clone());

        if let Some(err) = self.errors.get(&key) {
            return Err(err.clone());
        }
        Ok(self.front_ends.get(&key).cloned())
    }
}
