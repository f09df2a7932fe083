// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sliding-window rate limiter keyed by client identifier.
//!
//! Each client owns an ordered sequence of admission timestamps (whole
//! seconds since the Unix epoch). Stale timestamps are pruned lazily when
//! the client is next checked; a periodic [`RateLimiter::sweep`] drops
//! clients whose whole window has expired.
//!
//! When `max_tracked_clients` is set, a recency index ordered by last check
//! picks the eviction victim without scanning the table.

use crate::config::RateLimitConfig;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Result of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// Request is admitted and recorded
    Allowed {
        /// Admissions left in the current window
        remaining: u32,
    },
    /// Request is over the limit and was not recorded
    Limited {
        /// Seconds until the oldest admission leaves the window
        retry_after_secs: u64,
    },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed { .. })
    }
}

/// Window state of one client.
struct ClientWindow {
    /// Admission timestamps, oldest first
    times: VecDeque<u64>,
    /// Key of this client in [`Table::recency`]
    seen: u64,
}

#[derive(Default)]
struct Table {
    clients: HashMap<String, ClientWindow>,
    /// Client ids by last check, least recent first
    recency: BTreeMap<u64, String>,
    next_seen: u64,
}

impl Table {
    fn next_seen(&mut self) -> u64 {
        let seen = self.next_seen;
        self.next_seen += 1;
        seen
    }
}

/// Thread-safe sliding-window rate limiter.
pub struct RateLimiter {
    /// Configuration
    config: RateLimitConfig,
    /// Per-client windows and their recency order
    table: Mutex<Table>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            table: Mutex::new(Table::default()),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Check and record an admission for `client_id` at `now`.
    ///
    /// Prune, count and append happen under one lock, so two concurrent
    /// checks for the same client can never both see a stale count. The
    /// pruned sequence is stored back whatever the decision; a limited
    /// request is not itself recorded but still counts as the client's
    /// latest activity for eviction.
    pub fn check(&self, client_id: &str, now: u64) -> RateDecision {
        let limit = self.config.max_per_window as usize;
        let window_start = now.saturating_sub(self.config.window_secs);

        let mut guard = self.lock();
        if !guard.clients.contains_key(client_id) {
            self.make_room(&mut guard);
        }

        let seen = guard.next_seen();
        let Table { clients, recency, .. } = &mut *guard;
        let window = clients
            .entry(client_id.to_string())
            .or_insert_with(|| ClientWindow {
                times: VecDeque::new(),
                seen,
            });
        recency.remove(&window.seen);
        window.seen = seen;
        recency.insert(seen, client_id.to_string());

        let times = &mut window.times;
        while times.front().is_some_and(|&t| t < window_start) {
            times.pop_front();
        }

        if times.len() >= limit {
            // The oldest entry leaves the window once `window_start` passes it.
            let retry_after_secs = times
                .front()
                .map(|&oldest| {
                    oldest
                        .saturating_add(self.config.window_secs)
                        .saturating_add(1)
                        .saturating_sub(now)
                })
                .unwrap_or(self.config.window_secs);
            if times.is_empty() {
                clients.remove(client_id);
                recency.remove(&seen);
            }
            debug!(client_id, retry_after_secs, "Client rate limit exceeded");
            return RateDecision::Limited { retry_after_secs };
        }

        times.push_back(now);
        let remaining = (limit - times.len()) as u32;
        RateDecision::Allowed { remaining }
    }

    /// Snapshot of the timestamps currently stored for `client_id`.
    ///
    /// Does not prune; reflects the state as of the client's last check.
    pub fn history(&self, client_id: &str) -> Vec<u64> {
        self.lock()
            .clients
            .get(client_id)
            .map(|window| window.times.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of clients currently holding window state.
    pub fn tracked_clients(&self) -> usize {
        self.lock().clients.len()
    }

    /// Remove every client whose whole window has expired at `now`.
    ///
    /// Returns the number of clients removed. This walks the whole table and
    /// belongs on the background sweep task, not the request path.
    pub fn sweep(&self, now: u64) -> usize {
        let window_start = now.saturating_sub(self.config.window_secs);
        let mut guard = self.lock();
        let Table { clients, recency, .. } = &mut *guard;

        let before = clients.len();
        clients.retain(|_, window| {
            let live = window.times.back().is_some_and(|&newest| newest >= window_start);
            if !live {
                recency.remove(&window.seen);
            }
            live
        });
        before - clients.len()
    }

    /// Evict least recently checked clients until a new one fits.
    fn make_room(&self, table: &mut Table) {
        let cap = self.config.max_tracked_clients;
        if cap == 0 {
            return;
        }

        while table.clients.len() >= cap {
            let Some((_, victim)) = table.recency.pop_first() else {
                break;
            };
            table.clients.remove(&victim);
            debug!(client_id = %victim, cap, "Client table full, evicted least recently seen");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        // The critical sections never leave the table half-updated, so a
        // poisoned lock still guards consistent data.
        self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
