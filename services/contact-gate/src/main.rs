// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Gate Service
//!
//! Serves the contact form endpoint and a few health routes:
//!
//! - `GET /`, `GET /test`: liveness banners for the frontend
//! - `GET /health`, `GET /healthz`: health check
//! - `POST /api/contact`: contact submission
//! - `GET /metrics`: Prometheus metrics
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables (a `.env` file is
//! honoured):
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `RUST_LOG`: Tracing filter (default: info)
//! - `RATE_LIMIT_PER_MIN`: Max accepted submissions per client per minute (default: 10)
//! - `STORAGE_ENDPOINT`: Document store URL (default: contacts are not persisted)
//! - `NOTIFY_RELAY_URL` / `NOTIFY_TO`: Mail relay and recipient (default: disabled)
//! - `ALLOWED_ORIGINS`: CORS origins (default: *)

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_gate::{
    config::Config,
    gate::{unix_now, SubmissionGate},
    handlers::{router, AppState},
    limiter::RateLimiter,
    metrics::Metrics,
    notify, storage,
    validator::ContactValidator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables, then configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(env_filter(&config.log_filter))
        .init();

    info!(
        bind_addr = %config.bind_addr,
        rate_limit_per_min = config.rate_limit.max_per_window,
        window_secs = config.rate_limit.window_secs,
        storage_enabled = config.storage.enabled,
        remote_storage = config.storage.endpoint.is_some(),
        notifications = config.notify.relay_url.is_some(),
        "Starting contact gate"
    );

    // Create application state
    let gate = SubmissionGate::new(RateLimiter::new(config.rate_limit.clone()));
    let validator = ContactValidator::new(config.validation.clone());
    let store = storage::from_config(&config.storage)?;
    let notifier = notify::from_config(&config.notify)?;
    if config.notify.relay_url.is_some() && notifier.is_none() {
        tracing::warn!("NOTIFY_RELAY_URL set without NOTIFY_TO, notifications disabled");
    }

    let state = Arc::new(AppState {
        gate,
        validator,
        store,
        notifier,
        metrics: Metrics::new()?,
        config: config.clone(),
    });

    // Spawn sweep task
    let sweep_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_state.config.rate_limit.sweep_interval());
        loop {
            interval.tick().await;
            let limiter = sweep_state.gate.limiter();
            let removed = limiter.sweep(unix_now());
            sweep_state.metrics.set_tracked_clients(limiter.tracked_clients());
            if removed > 0 {
                tracing::debug!(removed, "Swept expired rate limit windows");
            }
        }
    });

    let app = router(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}

/// Tracing filter from `directives`, falling back to `info` when they do
/// not parse.
fn env_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"))
}
