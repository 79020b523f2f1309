// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Route 53 hosted zone service.

use super::{from_build_error, from_sdk_error};
use crate::constants::HOSTED_ZONE_ID_PREFIX;
use crate::dns_errors::DnsProviderError;
use crate::provider::{DnsZoneService, HostedZone};
use crate::record_set::{ChangeAction, DesiredRecordSet, RecordTarget};
use async_trait::async_trait;
use aws_sdk_route53::types::{
    AliasTarget, Change, ChangeAction as Route53Action, ChangeBatch, ResourceRecord,
    ResourceRecordSet, RrType,
};
use aws_sdk_route53::Client;
use tracing::debug;

/// [`DnsZoneService`] backed by the Route 53 API.
#[derive(Clone, Debug)]
pub struct Route53ZoneService {
    client: Client,
}

impl Route53ZoneService {
    #[must_use]
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }

    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DnsZoneService for Route53ZoneService {
    /// List every hosted zone, following the pagination marker.
    async fn list_zones(&self) -> Result<Vec<HostedZone>, DnsProviderError> {
        let mut zones = Vec::new();
        let mut marker: Option<String> = None;
        let mut page_count = 0;

        loop {
            page_count += 1;
            let page = self
                .client
                .list_hosted_zones()
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|err| from_sdk_error(&err))?;

            zones.extend(
                page.hosted_zones()
                    .iter()
                    .map(|zone| HostedZone::new(zone.name(), strip_zone_prefix(zone.id()))),
            );

            debug!(
                page = page_count,
                total_zones = zones.len(),
                "Fetched hosted zone page"
            );

            match page.next_marker() {
                Some(next) if page.is_truncated() => marker = Some(next.to_string()),
                _ => break,
            }
        }

        Ok(zones)
    }

    async fn change_record_set(
        &self,
        action: ChangeAction,
        record: &DesiredRecordSet,
        zone_id: &str,
    ) -> Result<String, DnsProviderError> {
        let record_set = resource_record_set(record)?;
        let change = Change::builder()
            .action(route53_action(action))
            .resource_record_set(record_set)
            .build()
            .map_err(|err| from_build_error(&err))?;
        let batch = ChangeBatch::builder()
            .changes(change)
            .build()
            .map_err(|err| from_build_error(&err))?;

        let output = self
            .client
            .change_resource_record_sets()
            .hosted_zone_id(zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(|err| from_sdk_error(&err))?;

        Ok(output.change_info().map_or_else(
            || format!("{action} {} submitted", record.name),
            |info| {
                format!(
                    "{action} {} {} ({})",
                    record.name,
                    info.status().as_str(),
                    info.id()
                )
            },
        ))
    }
}

/// `/hostedzone/Z123` becomes `Z123`; bare ids pass through.
fn strip_zone_prefix(id: &str) -> &str {
    id.strip_prefix(HOSTED_ZONE_ID_PREFIX).unwrap_or(id)
}

fn route53_action(action: ChangeAction) -> Route53Action {
    match action {
        ChangeAction::Upsert => Route53Action::Upsert,
        ChangeAction::Delete => Route53Action::Delete,
    }
}

/// Translate a desired record into the Route 53 wire shape.
fn resource_record_set(record: &DesiredRecordSet) -> Result<ResourceRecordSet, DnsProviderError> {
    let builder = ResourceRecordSet::builder().name(&record.name);

    let builder = match &record.target {
        RecordTarget::Alias {
            dns_name,
            hosted_zone_id,
            evaluate_target_health,
        } => {
            let alias = AliasTarget::builder()
                .dns_name(dns_name)
                .hosted_zone_id(hosted_zone_id)
                .evaluate_target_health(*evaluate_target_health)
                .build()
                .map_err(|err| from_build_error(&err))?;
            builder.r#type(RrType::A).alias_target(alias)
        }
        RecordTarget::Cname { value, ttl } => {
            let value = ResourceRecord::builder()
                .value(value)
                .build()
                .map_err(|err| from_build_error(&err))?;
            builder
                .r#type(RrType::Cname)
                .ttl(*ttl)
                .resource_records(value)
        }
    };

    builder.build().map_err(|err| from_build_error(&err))
}

#[cfg(test)]
#[path = "route53_tests.rs"]
mod route53_tests;
