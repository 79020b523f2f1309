// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # route53-ingress - Route 53 records for Kubernetes Ingresses
//!
//! Watches Ingress objects and keeps one Route 53 record per declared
//! hostname pointing at the load balancer fronting the cluster.
//!
//! ## Overview
//!
//! An Ingress opts in with annotations:
//!
//! - `ingress.net/route53: "true"` - manage records for this Ingress
//! - `ingress.net/load-balancer-name` - name of the front-end load balancer
//! - `ingress.net/record-kind: ALIAS|CNAME` - record kind (optional)
//!
//! Hostnames shared by several Ingresses are reference counted, so the record
//! is only deleted when the last declaring Ingress goes away.
//!
//! ## Modules
//!
//! - [`engine`] - Create/update/delete callbacks and per-hostname sequencing
//! - [`ingress_controller`] - Watch loop feeding the engine
//! - [`hostname_filter`] - Prefix/suffix allow list
//! - [`zone_resolver`] - Hostname to hosted zone lookup
//! - [`alias_resolver`] - Load balancer to alias target lookup
//! - [`reference_counter`] - Shared hostname bookkeeping
//! - [`change_classifier`] - Detects updates that need DNS work
//! - [`error_classifier`] - Severity of remote-call failures
//! - [`aws`] - Route 53 and ELB implementations of the collaborator traits
//!
//! ## Example
//!
//! ```rust
//! use route53_ingress::record_set::{build, RecordKind};
//!
//! let record = build("front1-123.elb.amazonaws.com", "Z35SXDOTRQ7X7K", "shop.example.com", RecordKind::Cname);
//! assert_eq!(record.record_type(), "CNAME");
//! ```

pub mod alias_resolver;
#[cfg(feature = "aws")]
pub mod aws;
pub mod change_classifier;
pub mod cli;
pub mod config;
pub mod constants;
pub mod context;
pub mod dns_errors;
pub mod engine;
pub mod error_classifier;
pub mod hostname_filter;
pub mod ingress_controller;
pub mod metrics;
pub mod provider;
pub mod record_set;
pub mod reference_counter;
pub mod resource;
pub mod zone_resolver;

#[cfg(test)]
pub(crate) mod provider_mocks;
