// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Load balancer lookups against both ELB API generations.

use super::from_sdk_error;
use crate::dns_errors::DnsProviderError;
use crate::provider::{FrontEnd, FrontEndLookup, LoadBalancerGeneration};
use async_trait::async_trait;

/// [`FrontEndLookup`] backed by the classic ELB and ELBv2 APIs.
#[derive(Clone, Debug)]
pub struct ElbFrontEndLookup {
    classic: aws_sdk_elasticloadbalancing::Client,
    v2: aws_sdk_elasticloadbalancingv2::Client,
}

impl ElbFrontEndLookup {
    #[must_use]
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            classic: aws_sdk_elasticloadbalancing::Client::new(sdk_config),
            v2: aws_sdk_elasticloadbalancingv2::Client::new(sdk_config),
        }
    }

    #[must_use]
    pub fn from_clients(
        classic: aws_sdk_elasticloadbalancing::Client,
        v2: aws_sdk_elasticloadbalancingv2::Client,
    ) -> Self {
        Self { classic, v2 }
    }

    async fn describe_classic(&self, name: &str) -> Result<Option<FrontEnd>, DnsProviderError> {
        let output = self
            .classic
            .describe_load_balancers()
            .load_balancer_names(name)
            .send()
            .await
            .map_err(|err| from_sdk_error(&err))?;

        Ok(output.load_balancer_descriptions().first().map(|lb| {
            FrontEnd::new(
                lb.dns_name().unwrap_or_default(),
                lb.canonical_hosted_zone_name_id().unwrap_or_default(),
            )
        }))
    }

    async fn describe_v2(&self, name: &str) -> Result<Option<FrontEnd>, DnsProviderError> {
        let output = self
            .v2
            .describe_load_balancers()
            .names(name)
            .send()
            .await
            .map_err(|err| from_sdk_error(&err))?;

        Ok(output.load_balancers().first().map(|lb| {
            FrontEnd::new(
                lb.dns_name().unwrap_or_default(),
                lb.canonical_hosted_zone_id().unwrap_or_default(),
            )
        }))
    }
}

#[async_trait]
impl FrontEndLookup for ElbFrontEndLookup {
    async fn resolve_front_end(
        &self,
        name: &str,
        generation: LoadBalancerGeneration,
    ) -> Result<Option<FrontEnd>, DnsProviderError> {
        match generation {
            LoadBalancerGeneration::Classic => self.describe_classic(name).await,
            LoadBalancerGeneration::V2 => self.describe_v2(name).await,
        }
    }
}

#[cfg(test)]
#[path = "elb_tests.rs"]
mod elb_tests;
