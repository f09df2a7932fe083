// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus metrics for the contact endpoint.

use crate::gate::Outcome;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Metric handles backed by a private registry.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    submissions: IntCounterVec,
    storage_failures: IntCounter,
    notifications: IntCounterVec,
    tracked_clients: IntGauge,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let submissions = IntCounterVec::new(
            Opts::new("contact_submissions_total", "Contact submissions by gate outcome"),
            &["outcome"],
        )?;
        let storage_failures = IntCounter::new(
            "contact_storage_failures_total",
            "Accepted contacts that could not be stored",
        )?;
        let notifications = IntCounterVec::new(
            Opts::new("contact_notifications_total", "Notification attempts by result"),
            &["result"],
        )?;
        let tracked_clients = IntGauge::new(
            "contact_tracked_clients",
            "Clients currently holding rate limit state",
        )?;

        registry.register(Box::new(submissions.clone()))?;
        registry.register(Box::new(storage_failures.clone()))?;
        registry.register(Box::new(notifications.clone()))?;
        registry.register(Box::new(tracked_clients.clone()))?;

        Ok(Self {
            registry,
            submissions,
            storage_failures,
            notifications,
            tracked_clients,
        })
    }

    pub fn record_outcome(&self, outcome: Outcome) {
        self.submissions.with_label_values(&[outcome.as_str()]).inc();
    }

    pub fn record_storage_failure(&self) {
        self.storage_failures.inc();
    }

    pub fn record_notification(&self, sent: bool) {
        let result = if sent { "sent" } else { "failed" };
        self.notifications.with_label_values(&[result]).inc();
    }

    pub fn set_tracked_clients(&self, count: usize) {
        self.tracked_clients.set(count as i64);
    }

    pub fn submissions(&self, outcome: Outcome) -> u64 {
        self.submissions.with_label_values(&[outcome.as_str()]).get()
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        if let Err(e) = TextEncoder::new().encode(&self.registry.gather(), &mut buffer) {
            tracing::error!(error = %e, "Failed to encode metrics");
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}
