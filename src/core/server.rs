//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol. It only advertises tools; each tool call is routed to its
//! definition under `domains/tools/definitions/` through the rmcp
//! `ToolRouter` built in `domains/tools/router.rs`. Both transports serve
//! this same handler, and every clone shares a single [`GeocoderClient`].

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use std::sync::Arc;

use super::config::Config;
use crate::domains::tools::{GeocoderClient, build_tool_router};

const INSTRUCTIONS: &str = "Location services for Japan. Use `geocode` to turn an address into \
coordinates, `reverse_geocode` to turn latitude/longitude into an address, and `shortest_path` \
to compute a Dijkstra route between two latitude/longitude points.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    ///
    /// Fails only if the upstream HTTP client cannot be constructed.
    pub fn new(config: Config) -> crate::Result<Self> {
        let config = Arc::new(config);
        let client = Arc::new(GeocoderClient::new(config.geocoder.clone())?);

        Ok(Self {
            tool_router: build_tool_router::<Self>(client),
            config,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: self.name().to_string(),
                version: self.version().to_string(),
                ..Implementation::from_build_env()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
