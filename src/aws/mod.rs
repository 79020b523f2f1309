// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! AWS implementations of the collaborator traits.
//!
//! - [`route53::Route53ZoneService`] lists hosted zones and submits record changes
//! - [`elb::ElbFrontEndLookup`] describes classic and v2 load balancers
//!
//! SDK errors are mapped onto [`DnsProviderError`] through their error code so
//! the error classifier never sees SDK types.

pub mod elb;
pub mod route53;

use crate::dns_errors::DnsProviderError;
use aws_sdk_route53::error::{DisplayErrorContext, ProvideErrorMetadata};

/// Load the shared SDK configuration from the environment (credentials chain,
/// region, retry settings).
pub async fn load_sdk_config() -> aws_config::SdkConfig {
    aws_config::defaults(aws_config::BehaviorVersion::latest())
        .load()
        .await
}

/// Map any SDK error onto the provider error taxonomy.
pub(crate) fn from_sdk_error<E>(err: &E) -> DnsProviderError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let message = err
        .message()
        .map_or_else(|| DisplayErrorContext(err).to_string(), str::to_string);
    DnsProviderError::from_code(err.code(), message)
}

/// Map a request builder error (missing required field).
pub(crate) fn from_build_error(err: &aws_sdk_route53::error::BuildError) -> DnsProviderError {
    DnsProviderError::Unclassified {
        message: format!("invalid change request: {err}"),
    }
}
