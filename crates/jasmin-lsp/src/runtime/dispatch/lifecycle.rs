//! Server lifecycle handlers.

use super::super::LspServer;
use crate::event::{Event, Priority};
use jasmin_analysis::uri::uri_to_path;
use jasmin_lsp_protocol::capabilities::server_capabilities;
use jasmin_lsp_protocol::{
    CONFIG_REQUEST_ID, INVALID_REQUEST, JsonRpcError, SERVER_NAME, SERVER_VERSION, internal_error,
    methods,
};
use serde_json::{Value, json};

impl LspServer {
    /// Handle the `initialize` request.
    ///
    /// Advertises capabilities and enqueues the startup
    /// `workspace/configuration` request at `Low` priority, so the
    /// response reaches the client first.
    pub(crate) fn handle_initialize(
        &mut self,
        params: Option<Value>,
        effects: &mut Vec<(Priority, Event)>,
    ) -> Result<Value, JsonRpcError> {
        if self.initialized {
            return Err(JsonRpcError::new(
                INVALID_REQUEST,
                "initialize may only be sent once",
            ));
        }

        if let Some(params) = &params {
            let root_uri = params
                .get("rootUri")
                .and_then(Value::as_str)
                .or_else(|| params.pointer("/workspaceFolders/0/uri").and_then(Value::as_str));
            self.config.workspace_root = root_uri.and_then(uri_to_path);
            if let Some(root) = &self.config.workspace_root {
                tracing::info!("workspace root: {}", root.display());
            }
        }
        self.initialized = true;

        let capabilities = serde_json::to_value(server_capabilities())
            .map_err(|e| internal_error(format!("capability serialization failed: {e}")))?;

        effects.push((
            Priority::Low,
            Event::Outbound(json!({
                "jsonrpc": "2.0",
                "id": CONFIG_REQUEST_ID,
                "method": methods::WORKSPACE_CONFIGURATION,
                "params": { "items": [{ "section": SERVER_NAME }] },
            })),
        ));

        Ok(json!({
            "capabilities": capabilities,
            "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
        }))
    }
}
