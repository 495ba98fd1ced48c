//! HTTP client for the upstream geocoder and router.
//!
//! One pooled `reqwest::Client` is shared by every tool call. Each call builds
//! its URL from the immutable [`GeocoderConfig`], performs a single GET bounded
//! by the configured timeout, and classifies the response by its declared
//! content type. Dropping a call's future aborts the request and returns its
//! connection to the pool.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::core::config::GeocoderConfig;
use crate::domains::tools::ToolError;

/// Accept header sent with every upstream request.
pub const ACCEPT_HEADER: &str = "application/json, text/plain;q=0.8, */*;q=0.5";

/// Everything except RFC 3986 unreserved characters is escaped, so `/`, `?`,
/// `&` and spaces inside an address never leak into the URL structure.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A source/target coordinate pair for routing, in latitude/longitude order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteQuery {
    pub source_lat: f64,
    pub source_lon: f64,
    pub target_lat: f64,
    pub target_lon: f64,
}

/// Client for the geocoder / pgRouting service.
#[derive(Debug, Clone)]
pub struct GeocoderClient {
    http: reqwest::Client,
    config: GeocoderConfig,
}

impl GeocoderClient {
    /// Build a client whose requests are bounded by `config.request_timeout`.
    pub fn new(config: GeocoderConfig) -> Result<Self, ToolError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ToolError::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// `{base}{geocode_prefix}/{percent-encoded address}`
    pub fn geocode_url(&self, address: &str) -> String {
        format!(
            "{}{}{}",
            self.base(),
            segment_prefix(&self.config.geocode_prefix),
            utf8_percent_encode(address, PATH_SEGMENT)
        )
    }

    /// `{base}{reverse_prefix}/{lon},{lat}` - longitude first.
    pub fn reverse_geocode_url(&self, lat: f64, lon: f64) -> String {
        format!(
            "{}{}{},{}",
            self.base(),
            segment_prefix(&self.config.reverse_prefix),
            format_coordinate(lon),
            format_coordinate(lat)
        )
    }

    /// `{base}{router_prefix}?source_x=..&source_y=..&target_x=..&target_y=..`
    ///
    /// The router's X axis is longitude and its Y axis is latitude.
    pub fn shortest_path_url(&self, query: &RouteQuery) -> Result<String, ToolError> {
        let params = [
            ("source_x", format_coordinate(query.source_lon)),
            ("source_y", format_coordinate(query.source_lat)),
            ("target_x", format_coordinate(query.target_lon)),
            ("target_y", format_coordinate(query.target_lat)),
        ];
        let encoded = serde_urlencoded::to_string(params)
            .map_err(|e| ToolError::internal(format!("failed to encode route query: {e}")))?;

        Ok(format!(
            "{}{}?{}",
            self.base(),
            path_prefix(&self.config.router_prefix),
            encoded
        ))
    }

    /// Geocode a free-text address.
    pub async fn geocode(&self, address: &str) -> Result<Value, ToolError> {
        self.fetch(&self.geocode_url(address)).await
    }

    /// Reverse geocode a latitude/longitude pair.
    pub async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Value, ToolError> {
        self.fetch(&self.reverse_geocode_url(lat, lon)).await
    }

    /// Ask the router for the Dijkstra shortest path between two points.
    pub async fn shortest_path(&self, query: &RouteQuery) -> Result<Value, ToolError> {
        let url = self.shortest_path_url(query)?;
        self.fetch(&url).await
    }

    async fn fetch(&self, url: &str) -> Result<Value, ToolError> {
        debug!(url, "Forwarding request to upstream");

        let response = self
            .http
            .get(url)
            .header(ACCEPT, ACCEPT_HEADER)
            .send()
            .await
            .inspect_err(|e| warn!(url, "Upstream request failed: {}", e))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(url, status = status.as_u16(), "Upstream returned an error status");
            return Err(ToolError::upstream(status.as_u16(), body));
        }

        debug!(url, status = status.as_u16(), content_type = %content_type, "Upstream responded");
        classify_body(&content_type, body)
    }
}

/// Turn an upstream body into the tool response shape.
///
/// The declared content type alone picks the branch: a JSON content type is
/// parsed (and a parse failure is an error), anything else is wrapped as
/// `{"raw": body}`.
pub fn classify_body(content_type: &str, body: String) -> Result<Value, ToolError> {
    if content_type
        .to_ascii_lowercase()
        .contains("application/json")
    {
        serde_json::from_str(&body).map_err(|e| ToolError::MalformedBody(e.to_string()))
    } else {
        Ok(json!({ "raw": body }))
    }
}

/// Normalize a prefix to exactly one leading and one trailing slash.
fn segment_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

/// Normalize a path to exactly one leading slash and no trailing slash.
fn path_prefix(prefix: &str) -> String {
    format!("/{}", prefix.trim_matches('/'))
}

/// Render a coordinate the way the upstream expects it: integral values keep
/// a `.0` suffix (`35.0`, not `35`).
pub fn format_coordinate(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
