// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Severity classification for remote-call failures.
//!
//! Every error returned by a collaborator passes through [`classify`] and is
//! then logged with [`log_classified`]. No classification is fatal: the engine
//! always moves on to the next hostname.
//!
//! | Error | Severity | Log level |
//! |-------|----------|-----------|
//! | `InvalidChangeBatch` containing "but it already exists" | `Ignorable` | info |
//! | `LoadBalancerNotFound` | `LogOnly` | debug |
//! | every other coded error | `Severe` | error (with code) |
//! | `Unclassified` | `Severe` | error (message only) |

use crate::dns_errors::DnsProviderError;
use std::fmt;
use tracing::{debug, error, info};

/// Action bucket for a classified error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Benign race; treated as success for sequencing
    Ignorable,
    /// Expected miss; logged quietly
    LogOnly,
    /// Real failure; logged at error level
    Severe,
}

impl Severity {
    /// Label value used in metrics
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ignorable => "ignorable",
            Self::LogOnly => "log_only",
            Self::Severe => "severe",
        }
    }

    /// True when the failed call should count as done
    #[must_use]
    pub fn is_success_equivalent(self) -> bool {
        matches!(self, Self::Ignorable)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub severity: Severity,
    /// Machine-readable code, when the error carried one
    pub code: Option<String>,
    /// Rendered error message
    pub message: String,
}

/// Classify a collaborator error.
#[must_use]
pub fn classify(err: &DnsProviderError) -> Classification {
    let severity = match err {
        DnsProviderError::InvalidChangeBatch { .. } if err.is_already_exists() => {
            Severity::Ignorable
        }
        DnsProviderError::LoadBalancerNotFound { .. } => Severity::LogOnly,
        DnsProviderError::ZoneNotFound { .. }
        | DnsProviderError::NoSuchHostedZone { .. }
        | DnsProviderError::NoSuchHealthCheck { .. }
        | DnsProviderError::InvalidChangeBatch { .. }
        | DnsProviderError::InvalidInput { .. }
        | DnsProviderError::Throttled { .. }
        | DnsProviderError::PriorRequestNotComplete { .. }
        | DnsProviderError::Upstream { .. }
        | DnsProviderError::Unclassified { .. } => Severity::Severe,
    };

    Classification {
        severity,
        code: err.code().map(str::to_string),
        message: err.to_string(),
    }
}

/// Emit the log line for a classified error.
///
/// `operation` describes the failed call (for example `UPSERT` or
/// `list zones`) and `hostname` identifies the affected host.
pub fn log_classified(classification: &Classification, operation: &str, hostname: &str) {
    let code = classification.code.as_deref();
    match (classification.severity, code) {
        (Severity::Ignorable, _) => info!(
            operation,
            hostname,
            code = code.unwrap_or_default(),
            "{}",
            classification.message
        ),
        (Severity::LogOnly, _) => debug!(
            operation,
            hostname,
            code = code.unwrap_or_default(),
            "{}",
            classification.message
        ),
        (Severity::Severe, Some(code)) => error!(
            operation,
            hostname,
            code,
            "{}",
            classification.message
        ),
        (Severity::Severe, None) => error!(operation, hostname, "{}", classification.message),
    }

    crate::metrics::record_classified_error(classification.severity);
}

/// Classify, log and return the classification in one step.
pub fn classify_and_log(err: &DnsProviderError, operation: &str, hostname: &str) -> Classification {
    let classification = classify(err);
    log_classified(&classification, operation, hostname);
    classification
}

#[cfg(test)]
#[path = "error_classifier_tests.rs"]
mod error_classifier_tests;
