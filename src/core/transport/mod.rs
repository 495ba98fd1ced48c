//! Transport layer for the MCP server.
//!
//! This module provides different transport implementations:
//! - **STDIO**: Standard input/output - feature: `stdio`
//! - **HTTP**: MCP streamable HTTP with sessions, CORS and a liveness
//!   endpoint - feature: `http`
//!
//! Each transport handles the connection lifecycle and delegates
//! message processing to the MCP server handler.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
mod sessions;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::{TransportConfig, normalize_path, parse_flag, parse_origins};
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "http")]
pub use config::HttpConfig;
