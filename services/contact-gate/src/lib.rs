// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Gate
//!
//! This crate provides the backend for a site contact form. Submissions pass
//! an abuse-mitigation gate before anything is stored or mailed:
//!
//! - Honeypot field check (silent drop)
//! - Per-client sliding-window rate limiting (10 per minute default)
//! - Bounded client table with periodic sweeping
//! - Optional document store persistence
//! - Optional, fire-and-forget email notification

pub mod config;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod limiter;
pub mod metrics;
pub mod models;
pub mod notify;
pub mod storage;
pub mod validator;

pub use config::Config;
pub use gate::{Outcome, SubmissionGate};
pub use limiter::{RateDecision, RateLimiter};
pub use models::{Contact, ContactSubmission};
pub use validator::{ContactValidator, ValidationResult};
