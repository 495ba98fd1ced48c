//! Transport configuration types.

use serde::{Deserialize, Serialize};
#[cfg(feature = "http")]
use std::time::Duration;
use tracing::warn;

#[cfg(feature = "http")]
use crate::core::config::parse_timeout;

/// Transport configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Standard input/output transport.
    #[cfg(feature = "stdio")]
    Stdio,

    /// MCP streamable HTTP transport.
    #[cfg(feature = "http")]
    Http(HttpConfig),
}

/// HTTP transport configuration.
#[cfg(feature = "http")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Path where the tool transport is mounted.
    #[serde(default = "default_rpc_path")]
    pub rpc_path: String,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,

    /// Origins allowed to call the tool transport from a browser.
    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    /// Whether browsers may send credentials with cross-origin requests.
    #[serde(default)]
    pub cors_allow_credentials: bool,

    /// How long an idle MCP session is kept before it is closed.
    #[serde(default = "default_session_idle_timeout")]
    pub session_idle_timeout: Duration,
}

#[cfg(feature = "http")]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[cfg(feature = "http")]
fn default_rpc_path() -> String {
    "/mcp".to_string()
}

#[cfg(feature = "http")]
fn default_cors() -> bool {
    true
}

#[cfg(feature = "http")]
fn default_cors_origins() -> Vec<String> {
    parse_origins("http://localhost,http://127.0.0.1")
}

#[cfg(feature = "http")]
fn default_session_idle_timeout() -> Duration {
    Duration::from_secs(30 * 60)
}

/// Normalize an endpoint path to a single leading slash and no trailing one.
pub fn normalize_path(raw: &str) -> String {
    format!("/{}", raw.trim().trim_matches('/'))
}

/// Split a comma-separated origin list, trimming entries and dropping empty ones.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

/// Interpret a boolean flag: only `"true"` (any case, no padding) enables it.
pub fn parse_flag(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true")
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "http")]
        {
            return Self::Http(HttpConfig::default());
        }

        #[cfg(all(not(feature = "http"), feature = "stdio"))]
        {
            return Self::Stdio;
        }

        #[cfg(not(any(feature = "stdio", feature = "http")))]
        {
            compile_error!("At least one transport feature must be enabled: stdio or http");
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: default_host(),
            rpc_path: default_rpc_path(),
            enable_cors: default_cors(),
            cors_allowed_origins: default_cors_origins(),
            cors_allow_credentials: false,
            session_idle_timeout: default_session_idle_timeout(),
        }
    }
}

#[cfg(feature = "http")]
impl HttpConfig {
    /// Load HTTP settings from `MCP_HTTP_*` and `CORS_*` variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("MCP_HTTP_PORT") {
            match raw.trim().parse() {
                Ok(port) => config.port = port,
                Err(_) => warn!("Invalid MCP_HTTP_PORT '{}', using {}", raw, config.port),
            }
        }
        if let Ok(host) = std::env::var("MCP_HTTP_HOST") {
            config.host = host;
        }
        if let Ok(path) = std::env::var("MCP_HTTP_PATH") {
            config.rpc_path = normalize_path(&path);
        }
        if let Ok(v) = std::env::var("MCP_HTTP_CORS") {
            config.enable_cors = v.to_lowercase() != "false" && v != "0";
        }
        if let Ok(raw) = std::env::var("CORS_ALLOWED_ORIGINS") {
            config.cors_allowed_origins = parse_origins(&raw);
        }
        if let Ok(raw) = std::env::var("CORS_ALLOW_CREDENTIALS") {
            config.cors_allow_credentials = parse_flag(&raw);
        }
        if let Ok(raw) = std::env::var("MCP_SESSION_IDLE_TIMEOUT") {
            match parse_timeout(&raw) {
                Some(idle) => config.session_idle_timeout = idle,
                None => warn!(
                    "Invalid MCP_SESSION_IDLE_TIMEOUT '{}', using {:?}",
                    raw, config.session_idle_timeout
                ),
            }
        }

        config
    }
}

impl TransportConfig {
    /// Load transport config from environment variables.
    ///
    /// `MCP_TRANSPORT` selects `stdio` or `http`; when unset, HTTP is used
    /// if compiled in.
    pub fn from_env() -> Self {
        let transport = std::env::var("MCP_TRANSPORT")
            .unwrap_or_default()
            .to_lowercase();

        match transport.as_str() {
            #[cfg(feature = "stdio")]
            "stdio" => Self::Stdio,
            #[cfg(feature = "http")]
            "http" => Self::Http(HttpConfig::from_env()),
            other => {
                if !other.is_empty() {
                    warn!("Unsupported MCP_TRANSPORT '{}', using default", other);
                }
                Self::default_from_env()
            }
        }
    }

    #[cfg(feature = "http")]
    fn default_from_env() -> Self {
        Self::Http(HttpConfig::from_env())
    }

    #[cfg(not(feature = "http"))]
    fn default_from_env() -> Self {
        Self::default()
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (standard MCP mode)".to_string(),
            #[cfg(feature = "http")]
            Self::Http(cfg) => format!("HTTP on {}:{}{}", cfg.host, cfg.port, cfg.rpc_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_trims_and_drops_empty() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("True"));
        assert!(!parse_flag("1"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
        assert!(!parse_flag(" true"));
        assert!(!parse_flag("true\n"));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("mcp"), "/mcp");
        assert_eq!(normalize_path("/mcp/"), "/mcp");
        assert_eq!(normalize_path(" //api/mcp// "), "/api/mcp");
        assert_eq!(normalize_path(""), "/");
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_config_defaults() {
        let config = HttpConfig::default();
        assert_eq!(config.rpc_path, "/mcp");
        assert!(config.enable_cors);
        assert!(!config.cors_allow_credentials);
        assert_eq!(config.session_idle_timeout, Duration::from_secs(1800));
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://localhost".to_string(), "http://127.0.0.1".to_string()]
        );
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_description_mentions_path() {
        let config = TransportConfig::Http(HttpConfig {
            port: 9000,
            host: "0.0.0.0".to_string(),
            ..HttpConfig::default()
        });
        assert_eq!(config.description(), "HTTP on 0.0.0.0:9000/mcp");
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_path_from_env_gets_leading_slash() {
        static ENV_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_HTTP_PATH", "mcp/");
            std::env::set_var("MCP_SESSION_IDLE_TIMEOUT", "90");
        }

        let config = HttpConfig::from_env();
        assert_eq!(config.rpc_path, "/mcp");
        assert_eq!(config.session_idle_timeout, Duration::from_secs(90));

        unsafe {
            std::env::remove_var("MCP_HTTP_PATH");
            std::env::remove_var("MCP_SESSION_IDLE_TIMEOUT");
        }
    }
}
