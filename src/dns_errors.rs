// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error taxonomy for the DNS zone service and load-balancer lookups.
//!
//! Collaborators translate vendor-specific failures (AWS error codes, transport
//! failures) into [`DnsProviderError`] so the reconciliation core never has to
//! inspect SDK types. The [`crate::error_classifier`] module then maps each
//! variant onto a severity bucket.

use crate::constants::ALREADY_EXISTS_MARKER;
use thiserror::Error;

/// Errors returned by the DNS zone service and the front-end lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DnsProviderError {
    /// No hosted zone is a suffix of the hostname
    ///
    /// Returned by the zone resolver when the listing succeeded but none of the
    /// zones can contain the hostname.
    #[error("Hosted zone for host '{hostname}' not found")]
    ZoneNotFound {
        /// The hostname (with trailing separator) that could not be placed
        hostname: String,
    },

    /// The zone id passed to a record change does not exist
    #[error("NoSuchHostedZone: {message}")]
    NoSuchHostedZone { message: String },

    /// An alias target references a health check that does not exist
    #[error("NoSuchHealthCheck: {message}")]
    NoSuchHealthCheck { message: String },

    /// The change batch was rejected
    ///
    /// Route 53 reports both genuine validation failures and the benign
    /// "record already exists" race under this code; see
    /// [`DnsProviderError::is_already_exists`].
    #[error("InvalidChangeBatch: {message}")]
    InvalidChangeBatch { message: String },

    /// The request contained invalid parameters
    #[error("InvalidInput: {message}")]
    InvalidInput { message: String },

    /// The request was rate limited (API or dependency throttling)
    #[error("{code}: {message}")]
    Throttled { code: String, message: String },

    /// A previous change for the same zone is still being applied
    #[error("PriorRequestNotComplete: {message}")]
    PriorRequestNotComplete { message: String },

    /// The load balancer does not exist in the queried API generation
    #[error("LoadBalancerNotFound: {message}")]
    LoadBalancerNotFound { message: String },

    /// Remote call failed with a machine-readable code not mapped above
    #[error("{code}: {message}")]
    Upstream { code: String, message: String },

    /// Remote call failed without any machine-readable code
    #[error("{message}")]
    Unclassified { message: String },
}

impl DnsProviderError {
    /// Returns the machine-readable code for this error, if it carries one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::ZoneNotFound { .. } => Some("ZoneNotFound"),
            Self::NoSuchHostedZone { .. } => Some("NoSuchHostedZone"),
            Self::NoSuchHealthCheck { .. } => Some("NoSuchHealthCheck"),
            Self::InvalidChangeBatch { .. } => Some("InvalidChangeBatch"),
            Self::InvalidInput { .. } => Some("InvalidInput"),
            Self::Throttled { code, .. } | Self::Upstream { code, .. } => Some(code.as_str()),
            Self::PriorRequestNotComplete { .. } => Some("PriorRequestNotComplete"),
            Self::LoadBalancerNotFound { .. } => Some("LoadBalancerNotFound"),
            Self::Unclassified { .. } => None,
        }
    }

    /// Returns true if this is the benign "record already exists with the same
    /// content" rejection seen while migrating between record kinds.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(
            self,
            Self::InvalidChangeBatch { message } if message.contains(ALREADY_EXISTS_MARKER)
        )
    }

    /// Translate a vendor error code and message into the taxonomy.
    ///
    /// Collaborators call this with whatever code their SDK reports; unknown
    /// codes become [`DnsProviderError::Upstream`] and a missing code becomes
    /// [`DnsProviderError::Unclassified`].
    #[must_use]
    pub fn from_code(code: Option<&str>, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            Some("NoSuchHostedZone") => Self::NoSuchHostedZone { message },
            Some("NoSuchHealthCheck") => Self::NoSuchHealthCheck { message },
            Some("InvalidChangeBatch") => Self::InvalidChangeBatch { message },
            Some("InvalidInput") => Self::InvalidInput { message },
            Some("PriorRequestNotComplete") => Self::PriorRequestNotComplete { message },
            Some(code @ ("Throttling" | "ThrottlingException" | "DependencyThrottle")) => {
                Self::Throttled {
                    code: code.to_string(),
                    message,
                }
            }
            Some("LoadBalancerNotFound" | "AccessPointNotFound") => {
                Self::LoadBalancerNotFound { message }
            }
            Some(code) => Self::Upstream {
                code: code.to_string(),
                message,
            },
            None => Self::Unclassified { message },
        }
    }
}

#[cfg(test)]
#[path = "dns_errors_tests.rs"]
mod dns_errors_tests;
