// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Attack simulation patterns for security testing.

/// Attack pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of submissions to send
    pub total_requests: usize,
    /// Submissions per minute across all clients
    pub requests_per_minute: f64,
    /// Number of unique clients to simulate
    pub unique_clients: usize,
    /// Fraction of submissions with the honeypot filled (0.0-1.0)
    pub honeypot_ratio: f64,
    /// Fraction of submissions with a malformed email (0.0-1.0)
    pub invalid_ratio: f64,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            requests_per_minute: 600.0,
            unique_clients: 1,
            honeypot_ratio: 0.0,
            invalid_ratio: 0.0,
        }
    }
}

/// Predefined attack patterns.
impl AttackConfig {
    /// Single client flood - one address hammering the form.
    pub fn single_client_flood() -> Self {
        Self {
            total_requests: 200,
            requests_per_minute: 6000.0,
            ..Default::default()
        }
    }

    /// Distributed campaign - many clients, a few submissions each.
    pub fn distributed_attack() -> Self {
        Self {
            total_requests: 500,
            requests_per_minute: 3000.0,
            unique_clients: 100,
            ..Default::default()
        }
    }

    /// Naive form-filling bot - fills every field, honeypot included.
    pub fn honeypot_bot() -> Self {
        Self {
            total_requests: 300,
            requests_per_minute: 6000.0,
            unique_clients: 3,
            honeypot_ratio: 1.0,
            ..Default::default()
        }
    }

    /// Mixed bot - half its submissions trip the honeypot.
    pub fn mixed_bot() -> Self {
        Self {
            total_requests: 200,
            requests_per_minute: 6000.0,
            honeypot_ratio: 0.5,
            ..Default::default()
        }
    }

    /// Garbage payloads with malformed emails.
    pub fn malformed_payloads() -> Self {
        Self {
            total_requests: 50,
            unique_clients: 5,
            invalid_ratio: 1.0,
            ..Default::default()
        }
    }

    /// Slow drip - stay just under the default limit of 10 per minute.
    pub fn slow_drip() -> Self {
        Self {
            total_requests: 100,
            requests_per_minute: 9.0,
            ..Default::default()
        }
    }

    /// Virtual timestamp (Unix seconds) of the `index`-th submission.
    pub fn timestamp(&self, start: u64, index: usize) -> u64 {
        start + (index as f64 * 60.0 / self.requests_per_minute).floor() as u64
    }

    /// Length of the simulated campaign in seconds.
    pub fn duration_secs(&self) -> u64 {
        self.timestamp(0, self.total_requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamps_follow_rate() {
        let config = AttackConfig {
            requests_per_minute: 30.0,
            ..Default::default()
        };
        assert_eq!(config.timestamp(1_000, 0), 1_000);
        assert_eq!(config.timestamp(1_000, 1), 1_002);
        assert_eq!(config.timestamp(1_000, 30), 1_060);
    }
}
