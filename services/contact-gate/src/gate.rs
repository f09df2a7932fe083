// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission gate: honeypot check followed by per-client rate limiting.
//!
//! The gate is total. Every submission maps to exactly one [`Outcome`] and
//! only [`Outcome::Accepted`] may go on to storage and notification.

use crate::limiter::{RateDecision, RateLimiter};
use crate::models::ContactSubmission;
use chrono::Utc;
use std::fmt;
use tracing::{debug, info};

/// Client identifier used when the requester's address is unknown.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Gate decision for one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Passed both checks and was counted against the client's quota
    Accepted,
    /// Honeypot was filled; silently discarded, quota untouched
    Dropped,
    /// Client already used its quota for the current window
    RateLimited,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Dropped => "dropped",
            Self::RateLimited => "rate_limited",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abuse-mitigation gate in front of the contact endpoint.
pub struct SubmissionGate {
    limiter: RateLimiter,
}

impl SubmissionGate {
    pub fn new(limiter: RateLimiter) -> Self {
        Self { limiter }
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Classify `submission` from `client_id` at `now` (Unix seconds).
    pub fn evaluate(&self, submission: &ContactSubmission, client_id: &str, now: u64) -> Outcome {
        if submission.honeypot_triggered() {
            info!(client_id, "Honeypot triggered, dropping submission");
            return Outcome::Dropped;
        }

        match self.limiter.check(client_id, now) {
            RateDecision::Allowed { remaining } => {
                debug!(client_id, remaining, "Submission accepted");
                Outcome::Accepted
            }
            RateDecision::Limited { retry_after_secs } => {
                info!(client_id, retry_after_secs, "Submission rate limited");
                Outcome::RateLimited
            }
        }
    }

    /// [`evaluate`](Self::evaluate) against the wall clock.
    pub fn evaluate_now(&self, submission: &ContactSubmission, client_id: &str) -> Outcome {
        self.evaluate(submission, client_id, unix_now())
    }
}

/// Current time in whole seconds since the Unix epoch.
pub fn unix_now() -> u64 {
    Utc::now().timestamp().max(0) as u64
}
