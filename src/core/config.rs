//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure populated from
//! environment variables once at startup. The resulting [`Config`] is
//! immutable and shared behind an `Arc`.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Default upstream geocoder service.
const DEFAULT_GEOCODER_BASE: &str = "http://mb.georepublic.info/";
const DEFAULT_GEOCODE_PREFIX: &str = "/geocoderService/service/geocode/geojson/";
const DEFAULT_REVERSE_PREFIX: &str = "/geocoderService/service/reversegeocode/json/";
const DEFAULT_ROUTER_PREFIX: &str = "/pgrServer/api/latlng/dijkstra";
const DEFAULT_REQUEST_TIMEOUT_SECS: f64 = 10.0;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Upstream geocoder / router endpoints.
    pub geocoder: GeocoderConfig,

    /// Transport configuration.
    pub transport: TransportConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

impl LoggingConfig {
    /// Read `MCP_LOG_LEVEL` (default `info`).
    pub fn from_env() -> Self {
        Self {
            level: std::env::var("MCP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

/// Endpoints of the upstream geocoding and routing service.
///
/// Prefixes are stored as given; slash normalization happens when URLs are
/// composed, so `"geo"`, `"/geo"` and `"/geo/"` are equivalent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Service root, e.g. `http://mb.georepublic.info/`.
    pub base_url: String,

    /// Path prefix for forward geocoding (address appended as last segment).
    pub geocode_prefix: String,

    /// Path prefix for reverse geocoding (`{lon},{lat}` appended).
    pub reverse_prefix: String,

    /// Path of the Dijkstra shortest-path endpoint (query parameters).
    pub router_prefix: String,

    /// Bound on each outbound request, connect through body read.
    pub request_timeout: Duration,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEOCODER_BASE.to_string(),
            geocode_prefix: DEFAULT_GEOCODE_PREFIX.to_string(),
            reverse_prefix: DEFAULT_REVERSE_PREFIX.to_string(),
            router_prefix: DEFAULT_ROUTER_PREFIX.to_string(),
            request_timeout: Duration::from_secs_f64(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl GeocoderConfig {
    /// Load geocoder settings from `GEOCODER_*`, `ROUTER_PREFIX` and
    /// `REQUEST_TIMEOUT`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base) = std::env::var("GEOCODER_BASE") {
            config.base_url = base;
        }
        if let Ok(prefix) = std::env::var("GEOCODER_GEOCODE_PREFIX") {
            config.geocode_prefix = prefix;
        }
        if let Ok(prefix) = std::env::var("GEOCODER_REVERSE_PREFIX") {
            config.reverse_prefix = prefix;
        }
        if let Ok(prefix) = std::env::var("ROUTER_PREFIX") {
            config.router_prefix = prefix;
        }

        if let Ok(raw) = std::env::var("REQUEST_TIMEOUT") {
            match parse_timeout(&raw) {
                Some(timeout) => config.request_timeout = timeout,
                None => warn!(
                    "Invalid REQUEST_TIMEOUT '{}', using default of {}s",
                    raw, DEFAULT_REQUEST_TIMEOUT_SECS
                ),
            }
        }

        config
    }
}

/// Parse a timeout expressed in (fractional) seconds.
///
/// Returns `None` for anything that is not a finite, strictly positive number.
pub fn parse_timeout(raw: &str) -> Option<Duration> {
    let secs: f64 = raw.trim().parse().ok()?;
    if secs.is_finite() && secs > 0.0 {
        Duration::try_from_secs_f64(secs).ok()
    } else {
        None
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "geocoder-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            geocoder: GeocoderConfig::default(),
            transport: TransportConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, `MCP_TRANSPORT`, ...). Upstream and CORS settings keep
    /// their deployment names (`GEOCODER_BASE`, `REQUEST_TIMEOUT`,
    /// `CORS_ALLOWED_ORIGINS`, ...).
    ///
    /// `.env` loading is left to the binary, which does it before logging
    /// starts.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        config.logging = LoggingConfig::from_env();
        config.geocoder = GeocoderConfig::from_env();
        config.transport = TransportConfig::from_env();

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    const GEOCODER_VARS: [&str; 5] = [
        "GEOCODER_BASE",
        "GEOCODER_GEOCODE_PREFIX",
        "GEOCODER_REVERSE_PREFIX",
        "ROUTER_PREFIX",
        "REQUEST_TIMEOUT",
    ];

    fn clear_geocoder_env() {
        for var in GEOCODER_VARS {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_geocoder_defaults() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_geocoder_env();

        let config = GeocoderConfig::from_env();
        assert_eq!(config.base_url, "http://mb.georepublic.info/");
        assert_eq!(
            config.geocode_prefix,
            "/geocoderService/service/geocode/geojson/"
        );
        assert_eq!(
            config.reverse_prefix,
            "/geocoderService/service/reversegeocode/json/"
        );
        assert_eq!(config.router_prefix, "/pgrServer/api/latlng/dijkstra");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_geocoder_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("GEOCODER_BASE", "http://example.test");
            std::env::set_var("GEOCODER_GEOCODE_PREFIX", "geo");
            std::env::set_var("GEOCODER_REVERSE_PREFIX", "/rev/");
            std::env::set_var("ROUTER_PREFIX", "/route");
            std::env::set_var("REQUEST_TIMEOUT", "2.5");
        }

        let config = GeocoderConfig::from_env();
        assert_eq!(config.base_url, "http://example.test");
        assert_eq!(config.geocode_prefix, "geo");
        assert_eq!(config.reverse_prefix, "/rev/");
        assert_eq!(config.router_prefix, "/route");
        assert_eq!(config.request_timeout, Duration::from_millis(2500));

        clear_geocoder_env();
    }

    #[test]
    fn test_invalid_timeout_falls_back_to_default() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_geocoder_env();
        unsafe {
            std::env::set_var("REQUEST_TIMEOUT", "soon");
        }

        let config = GeocoderConfig::from_env();
        assert_eq!(config.request_timeout, Duration::from_secs(10));

        clear_geocoder_env();
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("10"), Some(Duration::from_secs(10)));
        assert_eq!(parse_timeout(" 0.25 "), Some(Duration::from_millis(250)));
        assert_eq!(parse_timeout("0"), None);
        assert_eq!(parse_timeout("-1"), None);
        assert_eq!(parse_timeout("inf"), None);
        assert_eq!(parse_timeout("NaN"), None);
        assert_eq!(parse_timeout(""), None);
    }

    #[test]
    fn test_config_default_server_name() {
        let config = Config::default();
        assert_eq!(config.server.name, "geocoder-mcp-server");
        assert_eq!(config.server.version, env!("CARGO_PKG_VERSION"));
    }
}
