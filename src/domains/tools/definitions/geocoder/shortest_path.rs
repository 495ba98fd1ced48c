//! Shortest path tool definition.
//!
//! Asks the pgRouting service for the Dijkstra path between two points.
//! Callers give latitude/longitude pairs; the router wants X=longitude and
//! Y=latitude, which [`GeocoderClient::shortest_path`] takes care of.

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

use super::client::{GeocoderClient, RouteQuery};
use super::common::{coordinate, tool_result};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the shortest path tool.
#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
pub struct ShortestPathParams {
    #[schemars(description = "Latitude of the start point")]
    #[serde(deserialize_with = "coordinate")]
    pub source_lat: f64,

    #[schemars(description = "Longitude of the start point")]
    #[serde(deserialize_with = "coordinate")]
    pub source_lon: f64,

    #[schemars(description = "Latitude of the destination")]
    #[serde(deserialize_with = "coordinate")]
    pub target_lat: f64,

    #[schemars(description = "Longitude of the destination")]
    #[serde(deserialize_with = "coordinate")]
    pub target_lon: f64,
}

impl From<ShortestPathParams> for RouteQuery {
    fn from(params: ShortestPathParams) -> Self {
        Self {
            source_lat: params.source_lat,
            source_lon: params.source_lon,
            target_lat: params.target_lat,
            target_lon: params.target_lon,
        }
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Shortest path tool - Dijkstra routing between two coordinates.
pub struct ShortestPathTool;

impl ShortestPathTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "shortest_path";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Find the shortest path (Dijkstra) between two coordinates given as latitude/longitude pairs. Returns the router's JSON response if available; otherwise {\"raw\": \"...\"} with the response text.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(
        source_lat = params.source_lat,
        source_lon = params.source_lon,
        target_lat = params.target_lat,
        target_lon = params.target_lon,
    ))]
    pub async fn execute(params: &ShortestPathParams, client: &GeocoderClient) -> CallToolResult {
        info!("Shortest path tool called");
        tool_result(client.shortest_path(&RouteQuery::from(*params)).await)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ShortestPathParams>(),
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
                let params: ShortestPathParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &client).await)
            }
            .boxed()
        })
    }
}
