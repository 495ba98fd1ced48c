//! Reverse geocode tool definition.

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
use super::common::{coordinate, tool_result};

/// Parameters for the reverse geocode tool.
#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
pub struct ReverseGeocodeParams {
    #[schemars(description = "Latitude in decimal degrees")]
    #[serde(deserialize_with = "coordinate")]
    pub lat: f64,

    #[schemars(description = "Longitude in decimal degrees")]
    #[serde(deserialize_with = "coordinate")]
    pub lon: f64,
}

/// Reverse geocode tool - coordinates to address.
pub struct ReverseGeocodeTool;

impl ReverseGeocodeTool {
    pub const NAME: &'static str = "reverse_geocode";

    pub const DESCRIPTION: &'static str = "Reverse geocode using latitude and longitude coordinates. Returns the geocoder's JSON response if available; otherwise {\"raw\": \"...\"} with the response text.";

    #[instrument(skip_all, fields(lat = params.lat, lon = params.lon))]
    pub async fn execute(params: &ReverseGeocodeParams, client: &GeocoderClient) -> CallToolResult {
        info!("Reverse geocode tool called");
        tool_result(client.reverse_geocode(params.lat, params.lon).await)
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ReverseGeocodeParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    pub fn create_route<S>(client: Arc<GeocoderClient>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let client = client.clone();
            async move {
                let params: ReverseGeocodeParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &client).await)
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{MockUpstream, client_for};
    use super::*;
    use serde_json::json;

    #[test]
    fn test_params_accept_integers() {
        let params: ReverseGeocodeParams = serde_json::from_str(r#"{"lat": 35, "lon": 139.5}"#).unwrap();
        assert_eq!(params.lat, 35.0);
        assert_eq!(params.lon, 139.5);
    }

    #[test]
    fn test_params_accept_numeric_strings() {
        let params: ReverseGeocodeParams =
            serde_json::from_str(r#"{"lat": "35.68", "lon": "139.76"}"#).unwrap();
        assert_eq!(params.lat, 35.68);
        assert_eq!(params.lon, 139.76);

        assert!(serde_json::from_str::<ReverseGeocodeParams>(r#"{"lat": "north", "lon": 139}"#).is_err());
    }

    #[tokio::test]
    async fn test_execute_sends_lon_lat_segment() {
        let upstream = MockUpstream::start(200, Some("text/plain"), "OK").await;
        let client = client_for(&upstream);

        let params = ReverseGeocodeParams {
            lat: 35.68,
            lon: 139.76,
        };
        let result = ReverseGeocodeTool::execute(&params, &client).await;

        assert_eq!(result.structured_content, Some(json!({"raw": "OK"})));
        assert_eq!(upstream.requests()[0].path, "/rev/139.76,35.68");
    }

    #[tokio::test]
    async fn test_execute_reports_upstream_failure() {
        let upstream = MockUpstream::start(503, Some("text/plain"), "service down").await;
        let client = client_for(&upstream);

        let params = ReverseGeocodeParams { lat: 1.0, lon: 2.0 };
        let result = ReverseGeocodeTool::execute(&params, &client).await;

        assert_eq!(result.is_error, Some(true));
        assert!(result.structured_content.is_none());
    }
}
