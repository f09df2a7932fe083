// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Email notification for accepted contacts.
//!
//! Mail goes out through an HTTP mail relay. Delivery is best effort: a
//! failed send is reported as `false` and never surfaces to the submitter.

use crate::config::NotifyConfig;
use crate::models::Contact;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Notification error types.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Mail relay request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Mail relay refused message: {0}")]
    Refused(u16),
}

/// Something that can tell the site owner about a new contact.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Returns whether the notification was handed off successfully.
    async fn send_email_notification(&self, contact: &Contact) -> bool;
}

/// Message body posted to the mail relay.
#[derive(Debug, Serialize)]
pub struct RelayMessage {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub text: String,
}

impl RelayMessage {
    pub fn for_contact(contact: &Contact, from: &str, to: &str) -> Self {
        let subject = match contact.subject() {
            Some(subject) => format!("New contact: {}", subject),
            None => format!("New contact from {}", contact.name()),
        };
        let text = format!(
            "Name: {}\nEmail: {}\nSubject: {}\nReceived: {}\n\n{}\n",
            contact.name(),
            contact.email(),
            contact.subject().unwrap_or("(none)"),
            contact.created_at().to_rfc3339(),
            contact.message(),
        );

        Self {
            from: from.to_string(),
            to: to.to_string(),
            reply_to: contact.email().to_string(),
            subject,
            text,
        }
    }
}

/// Notifier that posts messages to an HTTP mail relay.
pub struct MailRelayNotifier {
    relay_url: String,
    from: String,
    to: String,
    client: reqwest::Client,
}

impl MailRelayNotifier {
    pub fn new(relay_url: String, from: String, to: String, client: reqwest::Client) -> Self {
        Self {
            relay_url,
            from,
            to,
            client,
        }
    }

    async fn deliver(&self, message: &RelayMessage) -> Result<(), NotifyError> {
        let response = self.client.post(&self.relay_url).json(message).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(NotifyError::Refused(response.status().as_u16()))
        }
    }
}

#[async_trait::async_trait]
impl Notifier for MailRelayNotifier {
    async fn send_email_notification(&self, contact: &Contact) -> bool {
        let message = RelayMessage::for_contact(contact, &self.from, &self.to);
        match self.deliver(&message).await {
            Ok(()) => {
                debug!(to = %self.to, "Contact notification sent");
                true
            }
            Err(e) => {
                warn!(error = %e, to = %self.to, "Contact notification failed");
                false
            }
        }
    }
}

/// Build the notifier described by `config`.
///
/// Notifications need both a relay and a recipient; with either missing
/// nothing is sent.
pub fn from_config(config: &NotifyConfig) -> anyhow::Result<Option<Arc<dyn Notifier>>> {
    let (relay_url, to) = match (&config.relay_url, &config.to) {
        (Some(relay_url), Some(to)) => (relay_url.clone(), to.clone()),
        _ => return Ok(None),
    };

    let client = reqwest::Client::builder().timeout(config.timeout()).build()?;
    let notifier: Arc<dyn Notifier> = Arc::new(MailRelayNotifier::new(
        relay_url,
        config.from.clone(),
        to,
        client,
    ));
    Ok(Some(notifier))
}
