//! Geocoder MCP Server Library
//!
//! An MCP (Model Context Protocol) server exposing three location tools
//! backed by an external Japanese geocoding and routing service:
//!
//! - `geocode` - address to coordinates
//! - `reverse_geocode` - coordinates to address
//! - `shortest_path` - Dijkstra route between two coordinates
//!
//! Each tool call issues exactly one HTTP GET upstream and relays the JSON
//! response (or `{"raw": text}` for non-JSON responses).
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server handler and the
//!   STDIO / HTTP transports
//! - **domains::tools**: the tool definitions and the upstream client
//!
//! # Example
//!
//! ```rust,no_run
//! use geocoder_mcp_server::{core::Config, core::McpServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config)?;
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
