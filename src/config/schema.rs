//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.
//! The DashScope API key is the one exception: it only ever comes from the
//! environment and is skipped by serde in both directions.

use serde::{Deserialize, Serialize};

/// Environment variable holding the DashScope API key.
pub const API_KEY_ENV_VAR: &str = "DASHSCOPE_API_KEY";

/// Environment variable selecting the DashScope region.
pub const REGION_ENV_VAR: &str = "DASHSCOPE_REGION";

pub const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com/api/v1";
pub const SINGAPORE_BASE_URL: &str = "https://dashscope-intl.aliyuncs.com/api/v1";
pub const DEFAULT_MODEL: &str = "qwen-image-plus";

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Outbound timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Upstream DashScope settings.
    pub dashscope: DashScopeConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

impl ProxyConfig {
    /// Overlay DashScope settings from an environment lookup.
    ///
    /// An empty `DASHSCOPE_API_KEY` counts as unset. `DASHSCOPE_REGION`
    /// replaces the file value whenever it is present.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV_VAR).filter(|k| !k.is_empty()) {
            self.dashscope.api_key = Some(key);
        }
        if let Some(region) = lookup(REGION_ENV_VAR) {
            self.dashscope.region = Region::from(region);
        }
    }

    /// Overlay DashScope settings from the process environment.
    pub fn apply_process_env(&mut self) {
        self.apply_env(|name| std::env::var(name).ok());
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeouts for the outbound DashScope call.
///
/// Unset values leave the transport defaults in place.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: Option<u64>,

    /// Total time allowed for one upstream request/response in seconds.
    pub upstream_secs: Option<u64>,
}

/// DashScope region. Only the exact value `singapore` selects the
/// international endpoint; every other value falls back to the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Region {
    #[default]
    Default,
    Singapore,
}

impl From<&str> for Region {
    fn from(value: &str) -> Self {
        match value {
            "singapore" => Region::Singapore,
            _ => Region::Default,
        }
    }
}

impl From<String> for Region {
    fn from(value: String) -> Self {
        Region::from(value.as_str())
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        match region {
            Region::Default => "default".to_string(),
            Region::Singapore => "singapore".to_string(),
        }
    }
}

/// Upstream DashScope configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DashScopeConfig {
    /// Bearer token for DashScope. Environment only.
    #[serde(skip)]
    pub api_key: Option<String>,

    /// Region selecting the base URL.
    pub region: Region,

    /// Model name sent with every generation request.
    pub model: String,

    /// Base URL for the default (mainland) region.
    pub default_base_url: String,

    /// Base URL for the Singapore region.
    pub singapore_base_url: String,
}

impl DashScopeConfig {
    /// Base URL for the configured region.
    pub fn base_url(&self) -> &str {
        match self.region {
            Region::Singapore => &self.singapore_base_url,
            Region::Default => &self.default_base_url,
        }
    }
}

impl Default for DashScopeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            region: Region::Default,
            model: DEFAULT_MODEL.to_string(),
            default_base_url: DEFAULT_BASE_URL.to_string(),
            singapore_base_url: SINGAPORE_BASE_URL.to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Inbound request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}
