// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for contact gate attack simulation.
//!
//! Simulates spam campaigns against the gate on a virtual clock, so the
//! runs are deterministic and finish instantly.

pub mod attacks;
pub mod generators;
pub mod metrics;
