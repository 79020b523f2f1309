// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `engine.rs`

#[cfg(test)]
mod tests {
    use crate::config::EngineConfig;
    use crate::dns_errors::DnsProviderError;
    use crate::engine::{ReconcileSummary, ReconciliationEngine};
    use crate::provider::LoadBalancerGeneration;
    use crate::provider_mocks::{MockDnsZoneService, MockFrontEndLookup};
    use crate::record_set::{ChangeAction, RecordKind, RecordTarget};
    use crate::resource::RoutingResource;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn ingress(name: &str, hosts: &[&str], annotations: &[(&str, &str)]) -> RoutingResource {
        let annotations: BTreeMap<String, String> = annotations
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        RoutingResource::new(
            name,
            "web",
            hosts.iter().map(|h| (*h).to_string()).collect(),
            &annotations,
        )
    }

    fn enabled(name: &str, hosts: &[&str]) -> RoutingResource {
        ingress(
            name,
            hosts,
            &[
                ("ingress.net/route53", "true"),
                ("ingress.net/load-balancer-name", "front1"),
            ],
        )
    }

    fn lookup() -> Arc<MockFrontEndLookup> {
        Arc::new(MockFrontEndLookup::default().with(
            LoadBalancerGeneration::Classic,
            "front1",
            "front1-123.elb.amazonaws.com",
            "ZELB",
        ))
    }

    fn engine_with(
        config: EngineConfig,
        dns: MockDnsZoneService,
    ) -> (ReconciliationEngine, Arc<MockDnsZoneService>) {
        let dns = Arc::new(dns);
        let engine = ReconciliationEngine::new(config, dns.clone(), lookup());
        (engine, dns)
    }

    fn zones() -> MockDnsZoneService {
        MockDnsZoneService::with_zones(&[("x.com.", "ZX")])
    }

    #[tokio::test]
    async fn test_create_upserts_every_host() {
        let (engine, dns) = engine_with(EngineConfig::default(), zones());

        let summary = engine.on_create(&enabled("one", &["a.x.com", "b.x.com"])).await;

        assert_eq!(summary.upserted, 2);
        let changes = dns.recorded();
        assert_eq!(changes.len(), 2);
        assert!(changes.iter().all(|c| c.action == ChangeAction::Upsert));
        assert!(changes.iter().all(|c| c.zone_id == "ZX"));
        assert_eq!(changes[0].record.name, "a.x.com");
        assert_eq!(changes[1].record.name, "b.x.com");
        assert_eq!(engine.references().count("a.x.com"), 1);
        assert_eq!(engine.references().count("b.x.com"), 1);
    }

    #[tokio::test]
    async fn test_default_kind_is_cname_pointing_at_load_balancer() {
        let (engine, dns) = engine_with(EngineConfig::default(), zones());

        engine.on_create(&enabled("one", &["a.x.com"])).await;

        assert_eq!(
            dns.recorded()[0].record.target,
            RecordTarget::Cname {
                value: "front1-123.elb.amazonaws.com".to_string(),
                ttl: 300,
            }
        );
    }

    #[tokio::test]
    async fn test_configured_default_kind_applies_when_unset() {
        let config = EngineConfig {
            default_record_kind: RecordKind::Alias,
            ..EngineConfig::default()
        };
        let (engine, dns) = engine_with(config, zones());

        engine.on_create(&enabled("one", &["a.x.com"])).await;

        assert_eq!(
            dns.recorded()[0].record.target,
            RecordTarget::Alias {
                dns_name: "front1-123.elb.amazonaws.com".to_string(),
                hosted_zone_id: "ZELB".to_string(),
                evaluate_target_health: true,
            }
        );
    }

    #[tokio::test]
    async fn test_disabled_resource_is_ignored() {
        let (engine, dns) = engine_with(EngineConfig::default(), zones());
        let resource = ingress("one", &["a.x.com"], &[("ingress.net/route53", "false")]);

        assert!(engine.on_create(&resource).await.is_noop());
        assert!(engine.on_delete(&resource).await.is_noop());
        assert!(dns.recorded().is_empty());
        assert_eq!(dns.list_call_count(), 0);
    }

    #[tokio::test]
    async fn test_shared_hostname_survives_first_delete() {
        let (engine, dns) = engine_with(EngineConfig::default(), zones());
        let first = enabled("first", &["a.x.com", "b.x.com"]);
        let second = enabled("second", &["a.x.com"]);

        engine.on_create(&first).await;
        engine.on_create(&second).await;
        assert_eq!(engine.references().count("a.x.com"), 2);

        let summary = engine.on_delete(&second).await;
        assert_eq!(summary.retained, 1);
        assert_eq!(summary.deleted, 0);
        assert!(dns
            .recorded()
            .iter()
            .all(|c| c.action == ChangeAction::Upsert));

        let summary = engine.on_delete(&first).await;
        assert_eq!(summary.deleted, 2);
        let deletes: Vec<_> = dns
            .recorded()
            .into_iter()
            .filter(|c| c.action == ChangeAction::Delete)
            .map(|c| c.record.name)
            .collect();
        assert_eq!(deletes, vec!["a.x.com", "b.x.com"]);
        assert_eq!(engine.references().count("a.x.com"), 0);
        assert_eq!(engine.references().tracked(), 0);
    }

    #[tokio::test]
    async fn test_delete_without_prior_create_still_deletes() {
        let (engine, dns) = engine_with(EngineConfig::default(), zones());

        let summary = engine.on_delete(&enabled("one", &["a.x.com"])).await;

        assert_eq!(summary.deleted, 1);
        assert_eq!(dns.recorded()[0].action, ChangeAction::Delete);
        assert_eq!(engine.references().count("a.x.com"), -1);
    }

    #[tokio::test]
    async fn test_filtered_and_empty_hosts_are_skipped() {
        let config = EngineConfig {
            allow_suffixes: ".x.com".to_string(),
            ..EngineConfig::default()
        };
        let (engine, dns) = engine_with(config, zones());

        let summary = engine
            .on_create(&enabled("one", &["a.x.com", "", "a.y.com"]))
            .await;

        assert_eq!(summary.upserted, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(dns.recorded().len(), 1);
        assert_eq!(engine.references().count("a.y.com"), 0);
    }

    #[tokio::test]
    async fn test_failure_on_one_host_does_not_stop_siblings() {
        let dns = zones().fail_change(
            ChangeAction::Upsert,
            "a.x.com",
            DnsProviderError::InvalidInput {
                message: "Invalid request".to_string(),
            },
        );
        let (engine, dns) = engine_with(EngineConfig::default(), dns);

        let summary = engine.on_create(&enabled("one", &["a.x.com", "b.x.com"])).await;

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.upserted, 1);
        assert_eq!(dns.recorded().len(), 2);
        // The reference is held regardless of the upsert outcome
        assert_eq!(engine.references().count("a.x.com"), 1);
    }

    #[tokio::test]
    async fn test_zone_miss_keeps_reference_and_moves_on() {
        let (engine, dns) = engine_with(EngineConfig::default(), zones());

        let summary = engine
            .on_create(&enabled("one", &["a.nozone.org", "b.x.com"]))
            .await;

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.upserted, 1);
        assert_eq!(dns.recorded().len(), 1);
        assert_eq!(engine.references().count("a.nozone.org"), 1);
    }

    #[tokio::test]
    async fn test_legacy_alias_delete_precedes_cname_upsert() {
        let config = EngineConfig {
            legacy_delete_alias_before_create: true,
            ..EngineConfig::default()
        };
        let (engine, dns) = engine_with(config, zones());

        let summary = engine.on_create(&enabled("one", &["a.x.com"])).await;

        let changes = dns.recorded();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].action, ChangeAction::Delete);
        assert_eq!(changes[0].record.kind(), RecordKind::Alias);
        assert_eq!(changes[1].action, ChangeAction::Upsert);
        assert_eq!(changes[1].record.kind(), RecordKind::Cname);
        assert_eq!(summary.migrated, 1);
        assert_eq!(summary.upserted, 1);
    }

    #[tokio::test]
    async fn test_legacy_delete_failure_does_not_block_upsert() {
        let dns = zones().fail_change(
            ChangeAction::Delete,
            "a.x.com",
            DnsProviderError::InvalidChangeBatch {
                message: "Tried to delete resource record set but it was not found".to_string(),
            },
        );
        let config = EngineConfig {
            legacy_delete_alias_before_create: true,
            ..EngineConfig::default()
        };
        let (engine, dns) = engine_with(config, dns);

        let summary = engine.on_create(&enabled("one", &["a.x.com"])).await;

        assert_eq!(summary.migrated, 0);
        assert_eq!(summary.upserted, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(dns.recorded().len(), 2);
    }

    #[tokio::test]
    async fn test_legacy_cname_delete_only_for_alias_records() {
        let config = EngineConfig {
            legacy_delete_cname_before_create: true,
            ..EngineConfig::default()
        };
        let (engine, dns) = engine_with(config, zones());

        // CNAME desired: the CNAME-retiring flag does not apply
        engine.on_create(&enabled("one", &["a.x.com"])).await;
        assert_eq!(dns.recorded().len(), 1);

        let alias = ingress(
            "two",
            &["b.x.com"],
            &[
                ("ingress.net/route53", "true"),
                ("ingress.net/load-balancer-name", "front1"),
                ("ingress.net/record-kind", "ALIAS"),
            ],
        );
        engine.on_create(&alias).await;

        let changes = dns.recorded();
        assert_eq!(changes.len(), 3);
        assert_eq!(changes[1].action, ChangeAction::Delete);
        assert_eq!(changes[1].record.kind(), RecordKind::Cname);
        assert_eq!(changes[2].record.kind(), RecordKind::Alias);
    }

    #[tokio::test]
    async fn test_already_exists_counts_as_success() {
        let dns = zones().fail_change(
            ChangeAction::Upsert,
            "a.x.com",
            DnsProviderError::InvalidChangeBatch {
                message: "Tried to create resource record set but it already exists".to_string(),
            },
        );
        let (engine, _dns) = engine_with(EngineConfig::default(), dns);

        let summary = engine.on_create(&enabled("one", &["a.x.com"])).await;

        assert_eq!(summary.upserted, 1);
        assert_eq!(summary.failed, 0);
    }

    #[tokio::test]
    async fn test_update_without_material_change_is_skipped() {
        let (engine, dns) = engine_with(EngineConfig::default(), zones());
        let old = enabled("one", &["a.x.com"]);
        engine.on_create(&old).await;

        let summary = engine.on_update(&old, &old.clone()).await;

        assert_eq!(summary, ReconcileSummary::default());
        assert_eq!(dns.recorded().len(), 1);
        assert_eq!(engine.references().count("a.x.com"), 1);
    }

    #[tokio::test]
    async fn test_update_host_change_releases_then_acquires() {
        let (engine, dns) = engine_with(EngineConfig::default(), zones());
        let old = enabled("one", &["a.x.com"]);
        let new = enabled("one", &["b.x.com"]);
        engine.on_create(&old).await;

        let summary = engine.on_update(&old, &new).await;

        assert_eq!(summary.deleted, 1);
        assert_eq!(summary.upserted, 1);
        let changes = dns.recorded();
        assert_eq!(changes[1].action, ChangeAction::Delete);
        assert_eq!(changes[1].record.name, "a.x.com");
        assert_eq!(changes[2].action, ChangeAction::Upsert);
        assert_eq!(changes[2].record.name, "b.x.com");
        assert_eq!(engine.references().count("a.x.com"), 0);
        assert_eq!(engine.references().count("b.x.com"), 1);
    }

    #[tokio::test]
    async fn test_update_opt_out_only_deletes() {
        let (engine, dns) = engine_with(EngineConfig::default(), zones());
        let old = enabled("one", &["a.x.com"]);
        let new = ingress(
            "one",
            &["a.x.com"],
            &[
                ("ingress.net/route53", "false"),
                ("ingress.net/load-balancer-name", "front1"),
            ],
        );
        engine.on_create(&old).await;

        let summary = engine.on_update(&old, &new).await;

        assert_eq!(summary.deleted, 1);
        assert_eq!(summary.upserted, 0);
        assert_eq!(dns.recorded().last().map(|c| c.action), Some(ChangeAction::Delete));
    }

    #[tokio::test]
    async fn test_update_opt_in_only_creates() {
        let (engine, dns) = engine_with(EngineConfig::default(), zones());
        let old = ingress("one", &["a.x.com"], &[]);
        let new = enabled("one", &["a.x.com"]);

        let summary = engine.on_update(&old, &new).await;

        assert_eq!(summary.upserted, 1);
        assert_eq!(summary.deleted, 0);
        assert_eq!(dns.recorded().len(), 1);
    }

    #[tokio::test]
    async fn test_update_of_shared_host_keeps_record() {
        let (engine, dns) = engine_with(EngineConfig::default(), zones());
        let first = enabled("first", &["a.x.com"]);
        let second = enabled("second", &["a.x.com"]);
        engine.on_create(&first).await;
        engine.on_create(&second).await;

        let mut relabelled = second.clone();
        relabelled.annotations.load_balancer_name = "front2".to_string();
        let summary = engine.on_update(&second, &relabelled).await;

        assert_eq!(summary.retained, 1);
        assert_eq!(summary.deleted, 0);
        assert_eq!(engine.references().count("a.x.com"), 2);
        assert!(dns
            .recorded()
            .iter()
            .all(|c| c.action == ChangeAction::Upsert));
    }
}
