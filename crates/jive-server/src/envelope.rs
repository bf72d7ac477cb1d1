//! The uniform response envelope.
//!
//! Every tool call, MCP or HTTP, resolves to
//! `{success, data?, error?: {code, message, details?}}`. Error codes are
//! stable across versions; messages are not.

use jive_domain::error::{Error, Result};
use serde::Serialize;

/// Machine-readable error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Stable error code
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Structured context (cycle edge, missing deps, offending field, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// The envelope carried by every tool response.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResponse {
    /// Whether the call succeeded
    pub success: bool,
    /// Action-specific payload on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Error body on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl ToolResponse {
    /// Successful envelope around a payload.
    #[must_use]
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed envelope from a domain error.
    #[must_use]
    pub fn err(error: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code: error.code().to_owned(),
                message: error.to_string(),
                details: error.details(),
            }),
        }
    }

    /// Serialized form; infallible for the closed payload set.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self)
            .unwrap_or_else(|_| "{\"success\":false}".to_owned())
    }
}

impl From<Result<serde_json::Value>> for ToolResponse {
    fn from(result: Result<serde_json::Value>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(error) => Self::err(&error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let response = ToolResponse::ok(serde_json::json!({"id": "x"}));
        let value: serde_json::Value = serde_json::from_str(&response.to_json()).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["id"], "x");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn error_envelope_carries_code_and_details() {
        let err = Error::CycleDetected {
            from: "c".to_owned(),
            to: "a".to_owned(),
        };
        let response = ToolResponse::err(&err);
        let value: serde_json::Value = serde_json::from_str(&response.to_json()).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["code"], "CycleDetected");
        assert_eq!(value["error"]["details"]["edge"]["from"], "c");
    }
}
