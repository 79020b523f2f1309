// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

// Common test utilities for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use k8s_openapi::api::networking::v1::Ingress;
use kube::{
    api::{Api, DeleteParams, PostParams},
    client::Client,
};
use route53_ingress::context::install_crypto_provider;
use route53_ingress::dns_errors::DnsProviderError;
use route53_ingress::provider::{
    DnsZoneService, FrontEnd, FrontEndLookup, HostedZone, LoadBalancerGeneration,
};
use route53_ingress::record_set::{ChangeAction, DesiredRecordSet};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// Get a Kubernetes client or skip the test if not in a cluster
pub async fn get_kube_client_or_skip() -> Option<Client> {
    install_crypto_provider();
    match Client::try_default().await {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("Skipping integration test: not running in Kubernetes cluster: {e}");
            None
        }
    }
}

/// Create a test namespace
pub async fn create_test_namespace(
    client: &Client,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let namespaces: Api<k8s_openapi::api::core::v1::Namespace> = Api::all(client.clone());

    let ns = serde_json::from_value(json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "labels": {
                "test": "integration",
                "managed-by": "route53-ingress-test"
            }
        }
    }))?;

    match namespaces.create(&PostParams::default(), &ns).await {
        Ok(_) => {
            println!("Created test namespace: {name}");
            Ok(())
        }
        Err(kube::Error::Api(ae)) if ae.code == 409 => {
            println!("Test namespace already exists: {name}");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

/// Cleanup test namespace
pub async fn cleanup_test_namespace(
    client: &Client,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let namespaces: Api<k8s_openapi::api::core::v1::Namespace> = Api::all(client.clone());

    match namespaces.delete(name, &DeleteParams::default()).await {
        Ok(_) => {
            println!("Deleted test namespace: {name}");
            Ok(())
        }
        Err(kube::Error::Api(ae)) if ae.code == 404 => {
            println!("Test namespace already deleted: {name}");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

/// Build an Ingress with one rule per hostname
pub fn ingress_fixture(
    name: &str,
    namespace: &str,
    hosts: &[&str],
    annotations: &[(&str, &str)],
) -> Ingress {
    let rules: Vec<_> = hosts.iter().map(|host| json!({ "host": host })).collect();
    let annotations: BTreeMap<&str, &str> = annotations.iter().copied().collect();

    serde_json::from_value(json!({
        "apiVersion": "networking.k8s.io/v1",
        "kind": "Ingress",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "annotations": annotations
        },
        "spec": { "rules": rules }
    }))
    .expect("valid ingress fixture")
}

/// Ingress opted in to DNS management behind `load_balancer`
pub fn managed_ingress(
    name: &str,
    namespace: &str,
    hosts: &[&str],
    load_balancer: &str,
) -> Ingress {
    ingress_fixture(
        name,
        namespace,
        hosts,
        &[
            ("ingress.net/route53", "true"),
            ("ingress.net/load-balancer-name", load_balancer),
        ],
    )
}

/// In-memory hosted zones that keep record state like the real service:
/// UPSERT creates or replaces, DELETE of a missing record is rejected.
#[derive(Default)]
pub struct InMemoryDns {
    zones: Vec<HostedZone>,
    /// Records keyed by (zone id, record name, record type)
    records: Mutex<BTreeMap<(String, String, String), DesiredRecordSet>>,
    history: Mutex<Vec<(ChangeAction, String, String)>>,
}

impl InMemoryDns {
    pub fn new(zones: &[(&str, &str)]) -> Self {
        Self {
            zones: zones
                .iter()
                .map(|(name, id)| HostedZone::new(*name, *id))
                .collect(),
            ..Self::default()
        }
    }

    /// Current record for `name` of `record_type`, in any zone
    pub fn record(&self, name: &str, record_type: &str) -> Option<DesiredRecordSet> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|((_, n, t), _)| n == name && t == record_type)
            .map(|(_, record)| record.clone())
    }

    /// Zone id holding the record for `name`
    pub fn zone_of(&self, name: &str) -> Option<String> {
        self.records
            .lock()
            .unwrap()
            .keys()
            .find(|(_, n, _)| n == name)
            .map(|(zone, _, _)| zone.clone())
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Submitted changes as (action, name, record type)
    pub fn history(&self) -> Vec<(ChangeAction, String, String)> {
        self.history.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsZoneService for InMemoryDns {
    async fn list_zones(&self) -> Result<Vec<HostedZone>, DnsProviderError> {
        Ok(self.zones.clone())
    }

    async fn change_record_set(
        &self,
        action: ChangeAction,
        record: &DesiredRecordSet,
        zone_id: &str,
    ) -> Result<String, DnsProviderError> {
        let key = (
            zone_id.to_string(),
            record.name.clone(),
            record.record_type().to_string(),
        );
        self.history.lock().unwrap().push((
            action,
            record.name.clone(),
            record.record_type().to_string(),
        ));

        let mut records = self.records.lock().unwrap();
        match action {
            ChangeAction::Upsert => {
                records.insert(key, record.clone());
            }
            ChangeAction::Delete => {
                if records.remove(&key).is_none() {
                    return Err(DnsProviderError::InvalidChangeBatch {
                        message: format!(
                            "Tried to delete resource record set [name='{}', type='{}'] but it was not found",
                            record.name,
                            record.record_type()
                        ),
                    });
                }
            }
        }
        Ok(format!("{action} {} INSYNC", record.name))
    }
}

/// Load balancers known to the test, per generation.
#[derive(Default)]
pub struct StaticFrontEnds {
    front_ends: HashMap<(LoadBalancerGeneration, String), FrontEnd>,
}

impl StaticFrontEnds {
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
}

#[async_trait]
impl FrontEndLookup for StaticFrontEnds {
    async fn resolve_front_end(
        &self,
        name: &str,
        generation: LoadBalancerGeneration,
    ) -> Result<Option<FrontEnd>, DnsProviderError> {
        match self.front_ends.get(&(generation, name.to_string())) {
            Some(front_end) => Ok(Some(front_end.clone())),
            None if generation == LoadBalancerGeneration::Classic => {
                Err(DnsProviderError::LoadBalancerNotFound {
                    message: format!("There is no ACTIVE Load Balancer named '{name}'"),
                })
            }
            None => Ok(None),
        }
    }
}
