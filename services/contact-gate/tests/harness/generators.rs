// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for attack simulation.

use contact_gate::models::ContactSubmission;
use std::net::{IpAddr, Ipv4Addr};

/// Generate a pool of client identifiers (IPv4 strings) for testing.
pub fn generate_clients(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c)).to_string()
        })
        .collect()
}

/// A submission a human could have sent.
pub fn legitimate_submission(i: usize) -> ContactSubmission {
    ContactSubmission {
        name: format!("Visitor {}", i),
        email: format!("visitor{}@example.org", i),
        subject: Some(format!("Question {}", i)),
        message: "Hello, I enjoyed the article and had a question.".to_string(),
        hp: Some(String::new()),
    }
}

/// A submission from a bot that filled the hidden field.
pub fn honeypot_submission(i: usize) -> ContactSubmission {
    let values = honeypot_values();
    ContactSubmission {
        hp: Some(values[i % values.len()].to_string()),
        message: "Cheap pills http://spam.example".to_string(),
        ..legitimate_submission(i)
    }
}

/// A submission with a malformed email address.
pub fn malformed_submission(i: usize) -> ContactSubmission {
    let emails = generate_malformed_emails();
    ContactSubmission {
        email: emails[i % emails.len()].to_string(),
        ..legitimate_submission(i)
    }
}

/// Values a form-filling bot typically puts in a hidden field.
pub fn honeypot_values() -> Vec<&'static str> {
    vec![
        "spammer-filled-this",
        "http://spam.example",
        "1",
        "  x  ",
        "\tbot\n",
        "admin@example.com",
    ]
}

/// Honeypot values that must not count as a trigger.
pub fn blank_honeypot_values() -> Vec<Option<&'static str>> {
    vec![None, Some(""), Some(" "), Some("\t\n"), Some("   \r\n  ")]
}

/// Generate malformed email variations for testing.
pub fn generate_malformed_emails() -> Vec<&'static str> {
    vec![
        "plainaddress",
        "@no-local-part.com",
        "no-domain@",
        "no-tld@localhost",
        "two@@example.com",
        "spaces in@example.com",
        "dots@example..com",
        "hyphen@-example.com",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_clients() {
        let clients = generate_clients(256);
        assert_eq!(clients.len(), 256);
        // All should be unique
        let unique: std::collections::HashSet<_> = clients.iter().collect();
        assert_eq!(unique.len(), 256);
    }

    #[test]
    fn test_honeypot_submissions_trigger() {
        for i in 0..honeypot_values().len() {
            assert!(honeypot_submission(i).honeypot_triggered());
        }
        assert!(!legitimate_submission(0).honeypot_triggered());
    }
}
