// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Per-hostname reference counting.
//!
//! Several Ingresses may declare the same hostname. The counter records how
//! many currently-known Ingresses declare each hostname so that deleting one of
//! them does not remove a record the others still need. Counts live only in
//! memory and are rebuilt from the watcher's initial listing after a restart.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Mutex-guarded map from hostname to the number of resources declaring it.
///
/// A single lock guards the whole map; the update rate of a control-plane
/// controller is far too low for contention to matter. The lock is never held
/// across an `.await`.
#[derive(Debug, Default)]
pub struct ReferenceCounter {
    counts: Mutex<HashMap<String, i64>>,
}

impl ReferenceCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, i64>> {
        // Counts stay consistent even if a holder panicked mid-update
        self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record that one more resource declares `hostname`.
    ///
    /// Returns the new count.
    pub fn acquire(&self, hostname: &str) -> i64 {
        let mut counts = self.lock();
        let count = counts.entry(hostname.to_string()).or_insert(0);
        *count += 1;
        debug!(hostname, count = *count, "Acquired hostname reference");
        *count
    }

    /// Record that one resource no longer declares `hostname`.
    ///
    /// Returns true when no references remain and the remote record should be
    /// deleted. The count may go negative when a release has no matching
    /// acquire (for example after a restart); that is tolerated.
    pub fn release(&self, hostname: &str) -> bool {
        let mut counts = self.lock();
        let count = counts.entry(hostname.to_string()).or_insert(0);
        *count -= 1;
        let remaining = *count;

        if remaining == 0 {
            counts.remove(hostname);
        }

        debug!(hostname, remaining, "Released hostname reference");
        remaining <= 0
    }

    /// Current count for `hostname` (zero when untracked)
    #[must_use]
    pub fn count(&self, hostname: &str) -> i64 {
        self.lock().get(hostname).copied().unwrap_or(0)
    }

    /// Number of hostnames with a non-zero count
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.lock().len()
    }

    /// Copy of all non-zero counts
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, i64> {
        self.lock().clone()
    }
}

#[cfg(test)]
#[path = "reference_counter_tests.rs"]
mod reference_counter_tests;
