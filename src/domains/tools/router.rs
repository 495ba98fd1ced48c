//! Tool Router - builds the rmcp ToolRouter.
//!
//! Each tool knows how to create its own route; this module just wires them
//! to the shared geocoder client.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use super::definitions::{GeocodeTool, GeocoderClient, ReverseGeocodeTool, ShortestPathTool};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(client: Arc<GeocoderClient>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(GeocodeTool::create_route(client.clone()))
        .with_route(ReverseGeocodeTool::create_route(client.clone()))
        .with_route(ShortestPathTool::create_route(client))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GeocoderConfig;

    struct TestServer {}

    fn test_client() -> Arc<GeocoderClient> {
        Arc::new(GeocoderClient::new(GeocoderConfig::default()).unwrap())
    }

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(test_client());
        let tools = router.list_all();
        assert_eq!(tools.len(), 3);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"geocode"));
        assert!(names.contains(&"reverse_geocode"));
        assert!(names.contains(&"shortest_path"));
    }

    #[test]
    fn test_router_uses_tool_metadata() {
        let router: ToolRouter<TestServer> = build_tool_router(test_client());

        for tool in [
            GeocodeTool::to_tool(),
            ReverseGeocodeTool::to_tool(),
            ShortestPathTool::to_tool(),
        ] {
            let routed = router
                .list_all()
                .into_iter()
                .find(|t| t.name == tool.name)
                .unwrap();
            assert_eq!(routed.description, tool.description);
            assert_eq!(routed.input_schema, tool.input_schema);
        }
    }
}
