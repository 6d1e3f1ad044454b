//! JSON-RPC 2.0 message types
//!
//! Core packet, response, and error types for JSON-RPC communication.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A decoded inbound JSON-RPC packet.
///
/// Batch forms are not supported; [`Packet::decode`] rejects arrays so the
/// caller can drop the frame without side effects.
#[derive(Debug, Clone)]
pub enum Packet {
    /// A request carrying an id the client expects a response for.
    Request {
        /// Request identifier, echoed back in the response.
        id: Value,
        /// Method name to invoke.
        method: String,
        /// Method parameters.
        params: Option<Value>,
    },
    /// A notification; no response may be sent.
    Notification {
        /// Method name.
        method: String,
        /// Notification parameters.
        params: Option<Value>,
    },
    /// A response to a server-initiated request.
    Response {
        /// The id of the request this answers.
        id: Value,
        /// Success result, if any.
        result: Option<Value>,
        /// Error object, if the request failed.
        error: Option<Value>,
    },
}

impl Packet {
    /// Decode a JSON value into a packet.
    ///
    /// Returns `Err` with a human-readable reason for shapes this server
    /// does not process (batches, frames that are neither request,
    /// notification, nor response).
    pub fn decode(value: Value) -> Result<Packet, String> {
        if value.is_array() {
            return Err("batch requests are not supported".to_string());
        }
        let obj = match value.as_object() {
            Some(obj) => obj,
            None => return Err("packet is not a JSON object".to_string()),
        };
        if let Some(method) = obj.get("method").and_then(|m| m.as_str()) {
            let method = method.to_string();
            let params = obj.get("params").cloned();
            return Ok(match obj.get("id") {
                Some(id) if !id.is_null() => Packet::Request { id: id.clone(), method, params },
                _ => Packet::Notification { method, params },
            });
        }
        if let Some(id) = obj.get("id") {
            if obj.contains_key("result") || obj.contains_key("error") {
                return Ok(Packet::Response {
                    id: id.clone(),
                    result: obj.get("result").cloned(),
                    error: obj.get("error").cloned(),
                });
            }
        }
        Err("packet is neither request, notification, nor response".to_string())
    }
}

/// JSON-RPC 2.0 response message
///
/// Represents an outgoing response to the LSP client.
/// Either `result` or `error` should be set, but not both.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,

    /// Request identifier (matches the request's id)
    pub id: Option<Value>,

    /// Success result (mutually exclusive with error)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Error result (mutually exclusive with result)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Create a success response
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self { jsonrpc: "2.0".to_string(), id, result: Some(result), error: None }
    }

    /// Create an error response
    pub fn error(id: Option<Value>, error: JsonRpcError) -> Self {
        Self { jsonrpc: "2.0".to_string(), id, result: None, error: Some(error) }
    }

    /// Create a null result response (for methods that return nothing)
    pub fn null(id: Option<Value>) -> Self {
        Self { jsonrpc: "2.0".to_string(), id, result: Some(Value::Null), error: None }
    }
}

/// JSON-RPC 2.0 error object
///
/// Represents an error that occurred during request processing.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JsonRpcError {
    /// Error code (see `errors` for standard codes)
    pub code: i32,

    /// Human-readable error message
    pub message: String,

    /// Additional error data (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Create a new error
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), data: None }
    }
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for JsonRpcError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_request() {
        let packet = Packet::decode(json!({
            "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}
        }))
        .unwrap();
        match packet {
            Packet::Request { id, method, .. } => {
                assert_eq!(id, json!(1));
                assert_eq!(method, "initialize");
            }
            other => panic!("expected request, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_notification() {
        let packet = Packet::decode(json!({
            "jsonrpc": "2.0", "method": "initialized"
        }))
        .unwrap();
        assert!(matches!(packet, Packet::Notification { .. }));
    }

    #[test]
    fn test_decode_response() {
        let packet = Packet::decode(json!({
            "jsonrpc": "2.0", "id": 9, "result": [{"masterFile": null}]
        }))
        .unwrap();
        assert!(matches!(packet, Packet::Response { .. }));
    }

    #[test]
    fn test_batch_is_rejected() {
        assert!(Packet::decode(json!([{"jsonrpc": "2.0", "method": "x"}])).is_err());
    }

    #[test]
    fn test_response_serialization_skips_absent_error() {
        let response = JsonRpcResponse::success(Some(json!(1)), json!({"ok": true}));
        let text = serde_json::to_string(&response).unwrap();
        assert!(!text.contains("error"));
        assert!(text.contains("\"result\""));
    }
}
