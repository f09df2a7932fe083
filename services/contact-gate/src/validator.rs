// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Contact submission validator.
//!
//! Runs before the gate and rejects bodies that no legitimate form could
//! produce:
//! - Required fields present and non-blank
//! - Email address shape
//! - Field length caps

use crate::config::ValidationConfig;
use crate::models::ContactSubmission;
use thiserror::Error;
use tracing::debug;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Field {field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// Result of validation.
#[derive(Debug, Clone)]
pub enum ValidationResult {
    /// Submission is valid
    Valid,
    /// Submission is invalid
    Invalid(ValidationError),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(e) => Some(e),
        }
    }
}

/// Contact submission validator.
pub struct ContactValidator {
    config: ValidationConfig,
}

impl ContactValidator {
    /// Create a new validator with the given configuration.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a complete submission. The honeypot is not inspected here.
    pub fn validate(&self, submission: &ContactSubmission) -> ValidationResult {
        let required = [
            ("name", submission.name.as_str()),
            ("email", submission.email.as_str()),
            ("message", submission.message.as_str()),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                debug!(field, "Missing required field");
                return ValidationResult::Invalid(ValidationError::MissingField(field));
            }
        }

        let lengths = [
            ("name", submission.name.as_str(), self.config.max_name_len),
            (
                "subject",
                submission.subject.as_deref().unwrap_or(""),
                self.config.max_subject_len,
            ),
            ("message", submission.message.as_str(), self.config.max_message_len),
        ];
        for (field, value, max) in lengths {
            if value.trim().chars().count() > max {
                debug!(field, max, "Field too long");
                return ValidationResult::Invalid(ValidationError::TooLong { field, max });
            }
        }

        let email = submission.email.trim();
        if !is_plausible_email(email) {
            debug!(email = %email, "Invalid email address");
            return ValidationResult::Invalid(ValidationError::InvalidEmail(email.to_string()));
        }

        ValidationResult::Valid
    }
}

/// Syntactic check only: `local@domain.tld` with no whitespace.
fn is_plausible_email(email: &str) -> bool {
    if email.len() > 254 || email.chars().any(char::is_whitespace) {
        return false;
    }

    let (local, domain) = match email.split_once('@') {
        Some(parts) => parts,
        None => return false,
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        })
}
