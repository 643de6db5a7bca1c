//! # Configuration
//!
//! Layered runtime settings: compiled defaults, an optional `recimat.toml`
//! next to the binary, then `RECIMAT_*` environment variables, each layer
//! overriding the one before it.
//!
//! # Examples
//!
//! ```no_run
//! use recimat::config::PlatformConfig;
//!
//! let config = PlatformConfig::load().unwrap();
//! println!("backend at {}", config.backend.base_url);
//! ```

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Default backend base URL.
const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default per-request timeout in milliseconds.
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default snapshot refresh period in seconds.
const DEFAULT_REFRESH_SECS: u64 = 5;

/// Default tracing filter.
const DEFAULT_LOG_FILTER: &str = "recimat=info";

/// Backend API settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the persistence API.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Snapshot refresh settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Seconds between full snapshot polls.
    pub period_secs: u64,
}

impl RefreshConfig {
    /// Returns the refresh period as a [`Duration`].
    #[must_use]
    pub const fn period(&self) -> Duration {
        Duration::from_secs(self.period_secs)
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            period_secs: DEFAULT_REFRESH_SECS,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Tracing filter directive, overridable via `RUST_LOG`.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Backend API settings.
    pub backend: BackendConfig,
    /// Snapshot refresh settings.
    pub refresh: RefreshConfig,
    /// Logging settings.
    pub log: LogConfig,
}

impl PlatformConfig {
    /// Loads configuration from defaults, file, and environment.
    ///
    /// A `.env` file is honored if present. `recimat.toml` is optional;
    /// environment variables use the `RECIMAT_` prefix with `__` as the
    /// section separator (`RECIMAT_BACKEND__BASE_URL`).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a source is malformed or a value
    /// cannot deserialize into the expected type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name("recimat").required(false))
                .add_source(Environment::with_prefix("RECIMAT").separator("__")),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured filter. Calling this twice is a
/// no-op; the first subscriber stays installed.
pub fn init_tracing(config: &LogConfig) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter.clone()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_platform_conventions() {
        let config = PlatformConfig::default();
        assert_eq!(config.backend.base_url, "http://localhost:3000");
        assert_eq!(config.backend.timeout_ms, 10_000);
        assert_eq!(config.refresh.period(), Duration::from_secs(5));
        assert_eq!(config.log.filter, "recimat=info");
    }

    #[test]
    fn overrides_deserialize_into_sections() {
        let config = PlatformConfig::from_builder(
            Config::builder()
                .set_override("backend.base_url", "https://api.recimat.co")
                .unwrap()
                .set_override("refresh.period_secs", 30_i64)
                .unwrap(),
        )
        .unwrap();

        assert_eq!(config.backend.base_url, "https://api.recimat.co");
        assert_eq!(config.refresh.period(), Duration::from_secs(30));
        // Untouched sections keep their defaults.
        assert_eq!(config.backend.timeout_ms, 10_000);
    }

    #[test]
    fn missing_file_is_not_an_error() {
        // No recimat.toml exists in the test environment.
        let config = PlatformConfig::from_builder(
            Config::builder().add_source(File::with_name("recimat").required(false)),
        )
        .unwrap();
        assert_eq!(config, PlatformConfig::default());
    }
}
