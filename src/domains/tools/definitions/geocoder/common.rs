//! Result helpers shared by the geocoder tools.

use rmcp::model::{CallToolResult, Content};
use serde::Deserialize;
use serde::de::{self, Deserializer, Unexpected};
use serde_json::Value;
use tracing::warn;

use crate::domains::tools::ToolError;

/// Convert an upstream outcome into an MCP tool result.
///
/// JSON objects are returned as structured content (with a text rendering for
/// clients that ignore it); other JSON values are returned as text only.
/// Failures become `isError` results carrying the error message.
pub fn tool_result(outcome: Result<Value, ToolError>) -> CallToolResult {
    match outcome {
        Ok(value @ Value::Object(_)) => CallToolResult::structured(value),
        Ok(other) => CallToolResult::success(vec![Content::text(other.to_string())]),
        Err(e) => error_result(&e.to_string()),
    }
}

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Deserialize a coordinate given either as a JSON number or as a numeric
/// string such as `"35.68"`.
pub fn coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| {
                de::Error::invalid_value(Unexpected::Str(&text), &"a number or numeric string")
            }),
    }
}
