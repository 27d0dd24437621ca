//! Configuration management for the chat relay
//!
//! Parses an optional TOML configuration file, then applies environment
//! overrides (`PORT`, `OPENAI_API_KEY`) once at startup. Every section has
//! defaults, so the relay runs with no file at all.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::str::FromStr;

/// Environment variable overriding `server.port`
pub const PORT_ENV: &str = "PORT";

/// Environment variable overriding `upstream.api_key`
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Socket address to bind
    ///
    /// Falls back to all interfaces if the host is not an IP address.
    pub fn socket_addr(&self) -> SocketAddr {
        let ip = self
            .host
            .parse::<IpAddr>()
            .unwrap_or_else(|_| IpAddr::from([0, 0, 0, 0]));
        SocketAddr::from((ip, self.port))
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Upstream completion API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Base URL of the OpenAI-compatible API, including the `/v1` segment
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer credential. Usually supplied through `OPENAI_API_KEY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<ApiKey>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
        }
    }
}

impl UpstreamConfig {
    /// Full URL of the chat completion endpoint
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

/// Upstream bearer credential
///
/// `Debug` output is redacted so the key never reaches the logs.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a raw key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Raw key for the Authorization header
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| {
            AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            }
        })?;

        let config: Self =
            toml::from_str(&content).map_err(|source| AppError::ConfigParseFailed {
                path: path_display.clone(),
                source,
            })?;

        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Build the startup configuration
    ///
    /// Reads `path` when given (defaults otherwise), then applies environment
    /// overrides through `env`. Pass `|name| std::env::var(name).ok()` in
    /// production; tests pass a closure over a fixed map.
    pub fn load<F>(path: Option<&Path>, env: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        let config = config.with_env_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `PORT` and `OPENAI_API_KEY` overrides
    ///
    /// Empty values are ignored.
    pub fn with_env_overrides<F>(mut self, env: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = env(PORT_ENV).filter(|v| !v.trim().is_empty()) {
            self.server.port = port.trim().parse().map_err(|_| {
                AppError::Config(format!(
                    "{} must be a port number between 0 and 65535 (got '{}')",
                    PORT_ENV, port
                ))
            })?;
            tracing::debug!(port = self.server.port, "Port overridden from environment");
        }

        if let Some(key) = env(API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.upstream.api_key = Some(ApiKey::new(key.trim()));
        }

        Ok(self)
    }

    /// Validate configuration after parsing
    ///
    /// The API key is not checked. A missing key surfaces as an
    /// upstream authorization failure.
    pub fn validate(&self) -> AppResult<()> {
        if self.server.host.trim().is_empty() {
            return Err(AppError::Config(
                "server.host cannot be empty".to_string(),
            ));
        }

        let base_url = &self.upstream.base_url;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "upstream.base_url '{}' must start with http:// or https://",
                base_url
            )));
        }

        if self.observability.log_level.trim().is_empty() {
            return Err(AppError::Config(
                "observability.log_level cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config =
            toml::from_str(toml_str).map_err(|source| AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }
}
