//! Geocode tool definition.
//!
//! Looks up a free-text (Japanese) address and returns the geocoder's GeoJSON.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};

use super::client::GeocoderClient;
use super::common::tool_result;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the geocode tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GeocodeParams {
    /// Address to geocode.
    #[schemars(description = "Japanese address to geocode, e.g. 東京都千代田区丸の内1-1")]
    pub address: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Geocode tool - address to coordinates.
pub struct GeocodeTool;

impl GeocodeTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "geocode";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Geocode a Japanese address. Returns the geocoder's JSON response if available; otherwise {\"raw\": \"...\"} with the response text.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(address = %params.address))]
    pub async fn execute(params: &GeocodeParams, client: &GeocoderClient) -> CallToolResult {
        info!("Geocode tool called");
        tool_result(client.geocode(&params.address).await)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GeocodeParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for the rmcp router.
    pub fn create_route<S>(client: Arc<GeocoderClient>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let client = client.clone();
            async move {
                let params: GeocodeParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &client).await)
            }
            .boxed()
        })
    }
}
