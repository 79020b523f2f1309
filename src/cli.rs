// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Command-line configuration.

use crate::config::EngineConfig;
use crate::constants::METRICS_SERVER_BIND_ADDRESS;
use crate::record_set::RecordKind;
use crate::zone_resolver::ZoneMatchPolicy;
use clap::Parser;
use std::net::SocketAddr;

/// Keep Route 53 records in sync with Kubernetes Ingress hostnames.
#[derive(Debug, Clone, Parser)]
#[command(name = "route53-ingress")]
#[command(version)]
#[command(about = "Keep Route 53 records in sync with Kubernetes Ingress hostnames")]
pub struct Cli {
    /// Comma-separated hostname prefixes eligible for DNS management
    #[arg(long, value_name = "PREFIXES", default_value = "")]
    pub whitelist_prefix: String,

    /// Comma-separated hostname suffixes eligible for DNS management
    #[arg(long, value_name = "SUFFIXES", default_value = "")]
    pub whitelist_suffix: String,

    /// Delete an existing ALIAS record before creating its CNAME replacement
    #[arg(long)]
    pub legacy_delete_alias_before_create: bool,

    /// Delete an existing CNAME record before creating its ALIAS replacement
    #[arg(long)]
    pub legacy_delete_cname_before_create: bool,

    /// Record kind for Ingresses that do not choose one (alias or cname)
    #[arg(long, value_name = "KIND", default_value = "cname", value_parser = parse_record_kind)]
    pub default_record_kind: RecordKind,

    /// Hosted zone selection when several zones contain a hostname
    #[arg(
        long,
        value_name = "POLICY",
        default_value = "first-match",
        value_parser = parse_zone_match
    )]
    pub zone_match: ZoneMatchPolicy,

    /// Only watch Ingresses in this namespace (all namespaces when unset)
    #[arg(short = 'n', long)]
    pub namespace: Option<String>,

    /// Address for the /metrics and /healthz server; empty disables it
    #[arg(long, value_name = "ADDR", default_value = METRICS_SERVER_BIND_ADDRESS)]
    pub metrics_bind_address: String,
}

impl Cli {
    /// Engine settings derived from the command line
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            allow_prefixes: self.whitelist_prefix.clone(),
            allow_suffixes: self.whitelist_suffix.clone(),
            legacy_delete_alias_before_create: self.legacy_delete_alias_before_create,
            legacy_delete_cname_before_create: self.legacy_delete_cname_before_create,
            default_record_kind: self.default_record_kind,
            zone_match_policy: self.zone_match,
        }
    }

    /// Parsed metrics server address; `Ok(None)` when the server is disabled.
    ///
    /// # Errors
    ///
    /// Returns an error when the address is set but not a valid socket address.
    pub fn metrics_address(&self) -> Result<Option<SocketAddr>, std::net::AddrParseError> {
        let address = self.metrics_bind_address.trim();
        if address.is_empty() {
            return Ok(None);
        }
        address.parse().map(Some)
    }
}

/// Strict record kind parser for the command line.
///
/// Unlike annotation values, a typo on the command line is rejected.
fn parse_record_kind(value: &str) -> Result<RecordKind, String> {
    match value.to_ascii_lowercase().as_str() {
        "alias" => Ok(RecordKind::Alias),
        "cname" => Ok(RecordKind::Cname),
        other => Err(format!("unknown record kind '{other}', expected alias or cname")),
    }
}

fn parse_zone_match(value: &str) -> Result<ZoneMatchPolicy, String> {
    value.parse()
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod cli_tests;
