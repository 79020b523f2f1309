// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Hostname allow-list matching.
//!
//! Hostnames are eligible for DNS management when they start with one of the
//! configured prefixes or end with one of the configured suffixes. Both lists
//! are comma-separated strings supplied on the command line. Only an empty
//! string leaves a list unconfigured; when neither list is configured every
//! hostname is eligible.
//!
//! # Example
//!
//! ```rust
//! use route53_ingress::hostname_filter::is_allowed;
//!
//! assert!(is_allowed("api-reject.example.com", "api-", "-reject"));
//! assert!(!is_allowed("web.example.com", "api-", ".internal"));
//! assert!(is_allowed("anything.example.com", "", ""));
//! assert!(!is_allowed("anything.example.com", ",", ""));
//! ```

/// Pre-split allow-lists, built once from the engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostnameFilter {
    prefixes: Vec<String>,
    suffixes: Vec<String>,
    /// False only when both raw lists were empty strings
    restricted: bool,
}

impl HostnameFilter {
    /// Build a filter from comma-separated prefix and suffix lists.
    ///
    /// Empty entries produced by the split (`"a,,b"`, trailing commas) are
    /// dropped. A non-empty list with no remaining entries (`","`) is still
    /// configured and matches nothing.
    #[must_use]
    pub fn new(allow_prefixes: &str, allow_suffixes: &str) -> Self {
        Self {
            prefixes: split_list(allow_prefixes),
            suffixes: split_list(allow_suffixes),
            restricted: !allow_prefixes.is_empty() || !allow_suffixes.is_empty(),
        }
    }

    /// Returns true if the hostname passes the allow-list.
    ///
    /// The prefix check runs first; once it matches the suffix check is
    /// skipped, so the two lists are effectively OR'd together.
    #[must_use]
    pub fn is_allowed(&self, hostname: &str) -> bool {
        if !self.restricted {
            return true;
        }

        let prefix_match = self
            .prefixes
            .iter()
            .any(|prefix| hostname.starts_with(prefix.as_str()));
        if prefix_match {
            return true;
        }

        self.suffixes
            .iter()
            .any(|suffix| hostname.ends_with(suffix.as_str()))
    }

    /// Configured prefixes, in configuration order
    #[must_use]
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Configured suffixes, in configuration order
    #[must_use]
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Returns true if either list was configured
    #[must_use]
    pub fn is_restricted(&self) -> bool {
        self.restricted
    }
}

/// Returns true if `hostname` is eligible under the given comma-separated
/// prefix and suffix lists.
///
/// Convenience wrapper around [`HostnameFilter`] for one-off checks; the engine
/// keeps a pre-built filter instead of re-splitting per call.
#[must_use]
pub fn is_allowed(hostname: &str, allow_prefixes: &str, allow_suffixes: &str) -> bool {
    HostnameFilter::new(allow_prefixes, allow_suffixes).is_allowed(hostname)
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "hostname_filter_tests.rs"]
mod hostname_filter_tests;
