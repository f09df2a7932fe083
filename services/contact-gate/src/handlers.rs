// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact gate service.
//!
//! Honeypot drops and real acceptances produce the same response body, so
//! a bot cannot tell that it was caught. Rate limiting is reported in the
//! body with a 200 status.

use crate::config::{Config, HttpConfig};
use crate::error::{AppError, Result};
use crate::gate::{Outcome, SubmissionGate, UNKNOWN_CLIENT};
use crate::metrics::Metrics;
use crate::models::{Contact, ContactSubmission};
use crate::notify::Notifier;
use crate::storage::{DocumentStore, StorageError};
use crate::validator::{ContactValidator, ValidationResult};
use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, State},
    http::{header, HeaderMap, HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

/// Shared application state.
pub struct AppState {
    pub gate: SubmissionGate,
    pub validator: ContactValidator,
    pub store: Option<Arc<dyn DocumentStore>>,
    pub notifier: Option<Arc<dyn Notifier>>,
    pub metrics: Metrics,
    pub config: Config,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Contact submission response.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ContactReply {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

impl ContactReply {
    fn ok() -> Self {
        Self {
            ok: true,
            reason: None,
        }
    }

    fn rate_limited() -> Self {
        Self {
            ok: false,
            reason: Some(Outcome::RateLimited.as_str()),
        }
    }
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/", get(root))
        .route("/test", get(alive))
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/api/contact", post(submit_contact));

    if state.config.metrics.enabled {
        app = app.route(&state.config.metrics.path, get(metrics_handler));
    }

    let cors = cors_layer(&state.config.http);
    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &HttpConfig) -> CorsLayer {
    if config.allowed_origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Service banner.
pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "service": "backend-minimal" }))
}

/// Liveness probe used by the frontend.
pub async fn alive() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "backend alive" }))
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "contact-gate",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Prometheus scrape endpoint.
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> String {
    state
        .metrics
        .set_tracked_clients(state.gate.limiter().tracked_clients());
    state.metrics.render()
}

/// Accept a contact form submission.
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    payload: std::result::Result<Json<ContactSubmission>, JsonRejection>,
) -> Result<Json<ContactReply>> {
    let Json(submission) = payload.map_err(|rejection| {
        debug!(error = %rejection.body_text(), "Rejected contact body");
        AppError::InvalidBody(rejection.body_text())
    })?;

    if let ValidationResult::Invalid(err) = state.validator.validate(&submission) {
        info!(error = %err, "Contact validation failed");
        return Err(err.into());
    }

    let peer = connect_info.map(|ConnectInfo(addr)| addr);
    let client_id = client_id(&headers, peer, state.config.http.trust_forwarded_for);

    let outcome = state.gate.evaluate_now(&submission, &client_id);
    state.metrics.record_outcome(outcome);

    match outcome {
        Outcome::Dropped => Ok(Json(ContactReply::ok())),
        Outcome::RateLimited => Ok(Json(ContactReply::rate_limited())),
        Outcome::Accepted => {
            let contact = Contact::from_submission(submission, Utc::now());
            persist(&state, &contact).await?;
            notify(&state, contact);
            Ok(Json(ContactReply::ok()))
        }
    }
}

async fn persist(state: &AppState, contact: &Contact) -> Result<()> {
    let Some(store) = &state.store else {
        return Ok(());
    };

    let collection = &state.config.storage.collection;
    let stored = match serde_json::to_value(contact) {
        Ok(record) => store.create_document(collection, record).await,
        Err(e) => Err(StorageError::Encode(e)),
    };

    match stored {
        Ok(id) => {
            info!(collection = %collection, id = %id, "Contact stored");
            Ok(())
        }
        Err(e) => {
            state.metrics.record_storage_failure();
            error!(collection = %collection, error = %e, "Failed to store contact");
            Err(e.into())
        }
    }
}

/// Hand the contact to the notifier on a detached task.
fn notify(state: &AppState, contact: Contact) {
    let Some(notifier) = state.notifier.clone() else {
        return;
    };
    let metrics = state.metrics.clone();

    tokio::spawn(async move {
        let sent = notifier.send_email_notification(&contact).await;
        metrics.record_notification(sent);
        if !sent {
            warn!("Contact accepted but notification was not delivered");
        }
    });
}

/// Identify the requester for rate limiting.
///
/// With `trust_forwarded_for`, the first `X-Forwarded-For` hop wins;
/// otherwise the peer address is used, falling back to `"unknown"`.
pub fn client_id(headers: &HeaderMap, peer: Option<SocketAddr>, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
