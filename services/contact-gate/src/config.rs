// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact gate service.
//!
//! Every setting has a default, so an empty environment yields a working
//! service. Persistence and notifications stay off until their endpoints
//! are configured.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Configuration errors raised at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid URL for {var}: {value}")]
    InvalidUrl { var: &'static str, value: String },
}

/// Configuration for the contact gate service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Tracing filter directives, read from `RUST_LOG` (default: info)
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Validation configuration
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Document store configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Email notification configuration
    #[serde(default)]
    pub notify: NotifyConfig,

    /// HTTP surface configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Sliding-window rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum accepted submissions per client per window (default: 10)
    #[serde(default = "default_max_per_window")]
    pub max_per_window: u32,

    /// Length of the trailing window in seconds (default: 60)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// How often expired clients are swept, in seconds (default: 60)
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Upper bound on tracked clients, 0 disables the cap (default: 100000)
    #[serde(default = "default_max_tracked_clients")]
    pub max_tracked_clients: usize,
}

/// Validation limits for incoming submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,

    #[serde(default = "default_max_subject_len")]
    pub max_subject_len: usize,

    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,
}

/// Document store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Persist accepted contacts when an endpoint is set (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Remote document store base URL; nothing is persisted when absent
    #[serde(default)]
    pub endpoint: Option<String>,

    /// API key sent as `X-Api-Key`
    #[serde(default)]
    pub api_key: Option<String>,

    /// Collection accepted contacts are written to (default: contacts)
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Store request timeout in seconds (default: 10)
    #[serde(default = "default_storage_timeout_secs")]
    pub timeout_secs: u64,
}

/// Email notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// HTTP mail relay URL; notifications are disabled when absent
    #[serde(default)]
    pub relay_url: Option<String>,

    /// Recipient of notifications
    #[serde(default)]
    pub to: Option<String>,

    /// Sender address (default: noreply@localhost)
    #[serde(default = "default_from")]
    pub from: String,

    /// Relay request timeout in seconds (default: 10)
    #[serde(default = "default_notify_timeout_secs")]
    pub timeout_secs: u64,
}

/// HTTP surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Allowed CORS origins, `*` allows any (default: ["*"])
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Take the client id from `X-Forwarded-For` (default: false)
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_max_per_window() -> u32 {
    10
}

fn default_window_secs() -> u64 {
    60
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_max_tracked_clients() -> usize {
    100_000
}

fn default_max_name_len() -> usize {
    256
}

fn default_max_subject_len() -> usize {
    256
}

fn default_max_message_len() -> usize {
    4096
}

fn default_collection() -> String {
    "contacts".to_string()
}

fn default_storage_timeout_secs() -> u64 {
    10
}

fn default_from() -> String {
    "noreply@localhost".to_string()
}

fn default_notify_timeout_secs() -> u64 {
    10
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            log_filter: default_log_filter(),
            rate_limit: RateLimitConfig::default(),
            validation: ValidationConfig::default(),
            storage: StorageConfig::default(),
            notify: NotifyConfig::default(),
            http: HttpConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_per_window: default_max_per_window(),
            window_secs: default_window_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            max_tracked_clients: default_max_tracked_clients(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_name_len: default_max_name_len(),
            max_subject_len: default_max_subject_len(),
            max_message_len: default_max_message_len(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            endpoint: None,
            api_key: None,
            collection: default_collection(),
            timeout_secs: default_storage_timeout_secs(),
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            relay_url: None,
            to: None,
            from: default_from(),
            timeout_secs: default_notify_timeout_secs(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            trust_forwarded_for: false,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Get the rate window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Get the sweep interval, never shorter than one second
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl StorageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl NotifyConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unparseable numbers and booleans fall back to their defaults; URLs
    /// that do not parse are rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let flag = |key: &str| non_empty(key).and_then(|v| parse_bool(&v));

        let defaults = Config::default();

        let storage_endpoint = non_empty("STORAGE_ENDPOINT");
        if let Some(endpoint) = &storage_endpoint {
            check_url("STORAGE_ENDPOINT", endpoint)?;
        }
        let relay_url = non_empty("NOTIFY_RELAY_URL");
        if let Some(relay) = &relay_url {
            check_url("NOTIFY_RELAY_URL", relay)?;
        }

        let allowed_origins = non_empty("ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.http.allowed_origins);

        Ok(Config {
            bind_addr: non_empty("BIND_ADDR").unwrap_or(defaults.bind_addr),
            log_filter: non_empty("RUST_LOG").unwrap_or(defaults.log_filter),
            rate_limit: RateLimitConfig {
                max_per_window: parse_num(non_empty("RATE_LIMIT_PER_MIN"))
                    .unwrap_or(defaults.rate_limit.max_per_window),
                window_secs: parse_num(non_empty("RATE_WINDOW_SECS")).unwrap_or(defaults.rate_limit.window_secs),
                sweep_interval_secs: parse_num(non_empty("RATE_SWEEP_INTERVAL_SECS"))
                    .unwrap_or(defaults.rate_limit.sweep_interval_secs),
                max_tracked_clients: parse_num(non_empty("RATE_MAX_TRACKED_CLIENTS"))
                    .unwrap_or(defaults.rate_limit.max_tracked_clients),
            },
            validation: defaults.validation,
            storage: StorageConfig {
                enabled: flag("STORAGE_ENABLED").unwrap_or(defaults.storage.enabled),
                endpoint: storage_endpoint,
                api_key: non_empty("STORAGE_API_KEY"),
                collection: non_empty("STORAGE_COLLECTION").unwrap_or(defaults.storage.collection),
                timeout_secs: parse_num(non_empty("STORAGE_TIMEOUT_SECS"))
                    .unwrap_or(defaults.storage.timeout_secs),
            },
            notify: NotifyConfig {
                relay_url,
                to: non_empty("NOTIFY_TO"),
                from: non_empty("NOTIFY_FROM").unwrap_or(defaults.notify.from),
                timeout_secs: parse_num(non_empty("NOTIFY_TIMEOUT_SECS"))
                    .unwrap_or(defaults.notify.timeout_secs),
            },
            http: HttpConfig {
                allowed_origins,
                trust_forwarded_for: flag("TRUST_FORWARDED_FOR")
                    .unwrap_or(defaults.http.trust_forwarded_for),
            },
            metrics: MetricsConfig {
                enabled: flag("METRICS_ENABLED").unwrap_or(defaults.metrics.enabled),
                path: defaults.metrics.path,
            },
        })
    }
}

fn parse_num<T: FromStr>(value: Option<String>) -> Option<T> {
    value.and_then(|v| v.parse().ok())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn check_url(var: &'static str, value: &str) -> Result<(), ConfigError> {
    match Url::parse(value) {
        Ok(u) if matches!(u.scheme(), "http" | "https") && u.host_str().is_some() => Ok(()),
        _ => Err(ConfigError::InvalidUrl {
            var,
            value: value.to_string(),
        }),
    }
}
