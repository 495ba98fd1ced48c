//! Tools domain module.
//!
//! Tools are the callable operations exposed to MCP clients. Every tool here
//! forwards one request to the upstream geocoder and relays its answer.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `router.rs` - rmcp ToolRouter builder shared by every transport
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Define params, execute(), to_tool() and create_route()
//! 3. Export in `definitions/mod.rs`
//! 4. Add route in `router.rs` using `with_route()`

pub mod definitions;
mod error;
pub mod router;

pub use definitions::GeocoderClient;
pub use error::ToolError;
pub use router::build_tool_router;
