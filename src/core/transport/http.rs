//! HTTP transport implementation.
//!
//! Serves MCP streamable HTTP through rmcp's [`StreamableHttpService`] at the
//! configured path (default `/mcp`). POST carries JSON-RPC, GET opens the
//! server event stream and DELETE ends a session. `initialize` issues the
//! `Mcp-Session-Id`, and every later request must present a live one.
//! Sessions idle for longer than `session_idle_timeout` are closed and
//! dropped from the session table.
//!
//! Browser clients are supported through a CORS policy on that path, and
//! `/healthz` serves as the liveness check. Each request runs on its own
//! task, so a slow upstream never blocks other calls or the health endpoint.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderName, HeaderValue, Method, header},
    response::IntoResponse,
    routing::get,
};
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::sessions::{GeocoderSessions, HANDSHAKE_TIMEOUT};
use super::{TransportError, TransportResult, config::HttpConfig, normalize_path};
use crate::core::McpServer;

/// Session header used by MCP streamable HTTP clients.
pub const SESSION_HEADER: &str = "mcp-session-id";

const HEALTH_PATH: &str = "/healthz";

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// What `GET /` reports about this server.
#[derive(Clone)]
struct ServiceInfo {
    name: Arc<str>,
    version: Arc<str>,
    rpc_path: Arc<str>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Run the HTTP transport until Ctrl-C.
    ///
    /// On shutdown every open session is cancelled so that long-lived event
    /// streams do not hold the server open.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let streamable = StreamableHttpServerConfig::default();
        let sessions = streamable.cancellation_token.clone();
        let app = build_router(&self.config, server, streamable)?;

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!(
            "Ready - listening on {} (MCP streamable HTTP, CORS {})",
            addr, cors_status
        );
        info!(
            "  → MCP:    POST/GET/DELETE {}",
            normalize_path(&self.config.rpc_path)
        );
        info!("  → Health: GET {}", HEALTH_PATH);
        info!(
            "  → Idle sessions close after {:?}",
            self.config.session_idle_timeout
        );
        if self.config.enable_cors {
            info!(
                "  → CORS origins: {:?} (credentials: {})",
                self.config.cors_allowed_origins, self.config.cors_allow_credentials
            );
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                sessions.cancel();
            })
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Build the application router.
///
/// CORS applies to the MCP path only; `/healthz` and `/` are plain
/// same-origin endpoints. Fails if the MCP path would shadow one of them or
/// is not a literal route.
pub fn build_router(
    config: &HttpConfig,
    server: McpServer,
    streamable: StreamableHttpServerConfig,
) -> TransportResult<Router> {
    let rpc_path = mcp_path(&config.rpc_path)?;

    let info = ServiceInfo {
        name: Arc::from(server.name()),
        version: Arc::from(server.version()),
        rpc_path: Arc::from(rpc_path.as_str()),
    };

    let sessions = GeocoderSessions::new(config.session_idle_timeout, HANDSHAKE_TIMEOUT);
    let mcp = StreamableHttpService::new(
        move || Ok(server.clone()),
        Arc::new(sessions),
        streamable,
    );

    let mut rpc = Router::new().route_service(&rpc_path, mcp);
    if config.enable_cors {
        rpc = rpc.layer(cors_layer(config));
    }

    Ok(Router::new()
        .route(HEALTH_PATH, get(health_check))
        .route("/", get(root_handler))
        .with_state(info)
        .merge(rpc)
        .layer(TraceLayer::new_for_http()))
}

/// Normalize the MCP path and make sure axum can mount it as a literal route.
fn mcp_path(raw: &str) -> TransportResult<String> {
    let path = normalize_path(raw);

    if path == "/" || path == HEALTH_PATH {
        return Err(TransportError::invalid_path(
            path,
            "collides with a built-in endpoint",
        ));
    }
    if path.split('/').any(|segment| {
        segment.starts_with(':') || segment.starts_with('*') || segment.contains(['{', '}'])
    }) {
        return Err(TransportError::invalid_path(
            path,
            "route parameters are not allowed",
        ));
    }

    Ok(path)
}

/// CORS policy for browser-based MCP clients.
///
/// A `*` entry allows any origin; combined with credentials the request
/// origin is echoed back, since browsers reject a literal `*` in that case.
pub fn cors_layer(config: &HttpConfig) -> CorsLayer {
    let wildcard = config.cors_allowed_origins.iter().any(|o| o == "*");

    let origins = if wildcard && config.cors_allow_credentials {
        AllowOrigin::mirror_request()
    } else if wildcard {
        AllowOrigin::any()
    } else {
        let list: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {:?}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(list)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS, Method::DELETE])
        .allow_headers(AllowHeaders::mirror_request())
        .expose_headers([
            HeaderName::from_static(SESSION_HEADER),
            header::CONTENT_TYPE,
            header::CACHE_CONTROL,
        ])
        .allow_credentials(config.cors_allow_credentials)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Root handler - provides API info.
async fn root_handler(State(info): State<ServiceInfo>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": &*info.name,
        "version": &*info.version,
        "transport": "streamable-http",
        "endpoints": {
            "mcp": &*info.rpc_path,
            "health": HEALTH_PATH
        },
        "tools": ["geocode", "reverse_geocode", "shortest_path"]
    }))
}

/// Liveness endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
