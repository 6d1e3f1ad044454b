//! Standard JSON-RPC 2.0 error codes and response helpers.

use crate::JsonRpcError;

/// Invalid JSON was received by the server.
pub const PARSE_ERROR: i32 = -32700;
/// The JSON sent is not a valid request object.
pub const INVALID_REQUEST: i32 = -32600;
/// The method does not exist / is not available.
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Invalid method parameters.
pub const INVALID_PARAMS: i32 = -32602;
/// Internal JSON-RPC error.
pub const INTERNAL_ERROR: i32 = -32603;

/// Build a `MethodNotFound` error naming the offending method.
pub fn method_not_found(method: &str) -> JsonRpcError {
    JsonRpcError::new(METHOD_NOT_FOUND, format!("method not found: {method}"))
}

/// Build an `InvalidParams` error with a short reason.
pub fn invalid_params(reason: impl Into<String>) -> JsonRpcError {
    JsonRpcError::new(INVALID_PARAMS, reason)
}

/// Build an `InternalError` carrying the human-readable message of an
/// expected contract failure (e.g. "No definition found").
pub fn internal_error(message: impl Into<String>) -> JsonRpcError {
    JsonRpcError::new(INTERNAL_ERROR, message)
}
