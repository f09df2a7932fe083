// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact form payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A contact form submission as received over the wire. Untrusted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
    /// Honeypot field, hidden from humans and expected to stay empty
    #[serde(default)]
    pub hp: Option<String>,
}

impl ContactSubmission {
    /// True when the honeypot carries anything besides whitespace.
    pub fn honeypot_triggered(&self) -> bool {
        self.hp.as_deref().is_some_and(|hp| !hp.trim().is_empty())
    }
}

/// An accepted contact message, ready for storage and notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    name: String,
    email: String,
    subject: Option<String>,
    message: String,
    created_at: DateTime<Utc>,
}

impl Contact {
    /// Build a contact from an admitted submission, discarding the honeypot.
    pub fn from_submission(submission: ContactSubmission, created_at: DateTime<Utc>) -> Self {
        let subject = submission
            .subject
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            name: submission.name.trim().to_string(),
            email: submission.email.trim().to_string(),
            subject,
            message: submission.message.trim().to_string(),
            created_at,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
