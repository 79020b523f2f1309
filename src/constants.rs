// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the Route 53 ingress controller.
//!
//! This module contains the annotation keys, DNS defaults and runtime constants
//! used throughout the codebase. Constants are organized by category for easy
//! maintenance.

// ============================================================================
// Ingress Annotation Keys
// ============================================================================

/// Opt-in flag for DNS management (boolean-as-string)
pub const ANNOTATION_DNS_ENABLED: &str = "ingress.net/route53";

/// Name of the load balancer the records should point at
pub const ANNOTATION_LOAD_BALANCER_NAME: &str = "ingress.net/load-balancer-name";

/// Explicit record kind (`ALIAS` or `CNAME`)
pub const ANNOTATION_RECORD_KIND: &str = "ingress.net/record-kind";

/// Legacy boolean form of the record kind (`true` selects an alias record)
pub const ANNOTATION_ALIAS: &str = "ingress.net/alias";

// ============================================================================
// DNS Record Constants
// ============================================================================

/// TTL for CNAME records (5 minutes)
pub const CNAME_RECORD_TTL_SECS: i64 = 300;

/// Route 53 record type used for alias records
pub const ALIAS_RECORD_TYPE: &str = "A";

/// Route 53 record type used for redirect records
pub const CNAME_RECORD_TYPE: &str = "CNAME";

/// Label separator appended to hostnames before zone matching
pub const DNS_LABEL_SEPARATOR: char = '.';

/// Prefix Route 53 puts in front of hosted zone identifiers
pub const HOSTED_ZONE_ID_PREFIX: &str = "/hostedzone/";

/// Message fragment Route 53 uses when an upsert races an identical record
pub const ALREADY_EXISTS_MARKER: &str = "but it already exists";

// ============================================================================
// Kind Constants
// ============================================================================

/// Kind name used in logs and metrics for watched resources
pub const KIND_INGRESS: &str = "Ingress";

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 4;

/// Thread name prefix for the Tokio runtime
pub const TOKIO_THREAD_NAME: &str = "route53-ingress";

// ============================================================================
// Metrics Server Constants
// ============================================================================

/// Path for Prometheus metrics endpoint
pub const METRICS_SERVER_PATH: &str = "/metrics";

/// Path for the liveness endpoint
pub const HEALTH_SERVER_PATH: &str = "/healthz";

/// Default bind address for metrics HTTP server
pub const METRICS_SERVER_BIND_ADDRESS: &str = "0.0.0.0:8080";
