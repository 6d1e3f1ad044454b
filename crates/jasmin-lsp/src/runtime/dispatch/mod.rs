//! Request dispatch and routing.
//!
//! One handler per method, organized by area:
//!
//! - **lifecycle**: initialize, initialized, shutdown, exit
//! - **text_document**: sync notifications and the navigation requests
//! - **workspace**: symbol search, watched files, configuration responses
//! - **custom**: the `jasmin-lsp/*` methods
//!
//! Handlers return `Result<Value, JsonRpcError>` for requests and event
//! lists for notifications; the response for a request is enqueued
//! `Immediate` so it overtakes any diagnostics the handler produced.
//! A panicking handler is caught here, logged, and answered with an empty
//! result (list-valued methods) or `null` so the client never stalls.

mod custom;
mod lifecycle;
mod text_document;
mod workspace;

use super::LspServer;
use crate::convert::position_to_point;
use crate::event::{Event, Priority};
use jasmin_cst::Point;
use jasmin_lsp_protocol::{
    CONFIG_REQUEST_ID, JsonRpcError, JsonRpcResponse, Packet, invalid_params, method_not_found,
    methods,
};
use serde_json::Value;
use std::panic::{AssertUnwindSafe, catch_unwind};

impl LspServer {
    /// Route one decoded packet to its handler, returning the events it
    /// produced (response, diagnostics, server-initiated requests).
    pub fn dispatch(&mut self, packet: Packet) -> Vec<(Priority, Event)> {
        match packet {
            Packet::Request { id, method, params } => self.dispatch_request(id, method, params),
            Packet::Notification { method, params } => self.dispatch_notification(&method, params),
            Packet::Response { id, result, error } => self.dispatch_response(&id, result, error),
        }
    }

    fn dispatch_request(
        &mut self,
        id: Value,
        method: String,
        params: Option<Value>,
    ) -> Vec<(Priority, Event)> {
        let mut effects = Vec::new();
        let outcome =
            catch_unwind(AssertUnwindSafe(|| self.handle_request(&method, params, &mut effects)));

        let response = match outcome {
            Ok(Ok(result)) => JsonRpcResponse::success(Some(id), result),
            Ok(Err(error)) => {
                tracing::debug!("{method} failed: {error}");
                JsonRpcResponse::error(Some(id), error)
            }
            Err(payload) => {
                tracing::error!("handler for {method} panicked: {}", panic_message(&payload));
                JsonRpcResponse::success(Some(id), fallback_result(&method))
            }
        };

        match serde_json::to_value(&response) {
            Ok(json) => effects.push((Priority::Immediate, Event::Outbound(json))),
            Err(e) => tracing::error!("response serialization failed: {e}"),
        }
        effects
    }

    fn handle_request(
        &mut self,
        method: &str,
        params: Option<Value>,
        effects: &mut Vec<(Priority, Event)>,
    ) -> Result<Value, JsonRpcError> {
        match method {
            methods::INITIALIZE => self.handle_initialize(params, effects),
            methods::SHUTDOWN => {
                self.shutdown_received = true;
                Ok(Value::Null)
            }
            methods::TEXT_DOCUMENT_DEFINITION => self.handle_definition(params),
            methods::TEXT_DOCUMENT_REFERENCES => self.handle_references(params),
            methods::TEXT_DOCUMENT_HOVER => self.handle_hover(params),
            methods::TEXT_DOCUMENT_DOCUMENT_SYMBOL => self.handle_document_symbol(params),
            methods::TEXT_DOCUMENT_RENAME => self.handle_rename(params),
            methods::WORKSPACE_SYMBOL => self.handle_workspace_symbol(params),
            methods::JASMIN_GET_REQUIRED_NAMESPACES => self.handle_get_required_namespaces(),
            other => Err(method_not_found(other)),
        }
    }

    fn dispatch_notification(
        &mut self,
        method: &str,
        params: Option<Value>,
    ) -> Vec<(Priority, Event)> {
        let outcome = catch_unwind(AssertUnwindSafe(|| match method {
            methods::INITIALIZED => Vec::new(),
            methods::EXIT => {
                if !self.shutdown_received {
                    tracing::warn!("exit received without a prior shutdown");
                }
                self.exiting = true;
                Vec::new()
            }
            methods::TEXT_DOCUMENT_DID_OPEN => self.handle_did_open(params),
            methods::TEXT_DOCUMENT_DID_CHANGE => self.handle_did_change(params),
            methods::TEXT_DOCUMENT_DID_CLOSE => self.handle_did_close(params),
            methods::WORKSPACE_DID_CHANGE_WATCHED_FILES => {
                self.handle_did_change_watched_files(params)
            }
            methods::JASMIN_SET_MASTER_FILE => self.handle_set_master_file(params),
            methods::JASMIN_SET_NAMESPACE_PATHS => self.handle_set_namespace_paths(params),
            other => {
                tracing::debug!("ignoring notification {other}");
                Vec::new()
            }
        }));

        match outcome {
            Ok(events) => events,
            Err(payload) => {
                tracing::error!("handler for {method} panicked: {}", panic_message(&payload));
                Vec::new()
            }
        }
    }

    fn dispatch_response(
        &mut self,
        id: &Value,
        result: Option<Value>,
        error: Option<Value>,
    ) -> Vec<(Priority, Event)> {
        if id.as_i64() == Some(CONFIG_REQUEST_ID) {
            if let Some(error) = error {
                tracing::warn!("workspace/configuration failed: {error}");
                return Vec::new();
            }
            return self.handle_configuration_response(result);
        }
        tracing::debug!("discarding response with unknown id {id}");
        Vec::new()
    }
}

/// What to answer when a handler dies unexpectedly: an empty list for
/// list-valued methods, `null` for the rest.
fn fallback_result(method: &str) -> Value {
    match method {
        methods::TEXT_DOCUMENT_REFERENCES
        | methods::TEXT_DOCUMENT_DOCUMENT_SYMBOL
        | methods::WORKSPACE_SYMBOL
        | methods::JASMIN_GET_REQUIRED_NAMESPACES => Value::Array(Vec::new()),
        _ => Value::Null,
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Pull `(uri, position)` out of a `TextDocumentPositionParams` shape.
fn parse_text_document_position(params: &Option<Value>) -> Result<(String, Point), JsonRpcError> {
    let params = params.as_ref().ok_or_else(|| invalid_params("missing params"))?;
    let uri = params
        .pointer("/textDocument/uri")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid_params("missing textDocument.uri"))?;
    let point = params
        .get("position")
        .and_then(position_to_point)
        .ok_or_else(|| invalid_params("missing position"))?;
    Ok((uri.to_string(), point))
}
