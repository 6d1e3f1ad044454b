//! Common test utilities for LSP integration tests.
//!
//! Tests drive the dispatcher directly through JSON values; no subprocess
//! or real stdio is involved. Helpers here build packets, collect the
//! events a dispatch produced, and compute positions inside fixture text.

#![allow(dead_code)] // Shared across test files; not every file uses everything.

use jasmin_lsp::{Event, LspServer, Priority};
use jasmin_lsp_protocol::Packet;
use serde_json::{Value, json};

/// A server with inert I/O; all interaction goes through `dispatch`.
pub fn server() -> LspServer {
    LspServer::with_io(std::io::empty(), std::io::sink())
}

pub fn send(server: &mut LspServer, message: Value) -> Vec<(Priority, Event)> {
    let packet = Packet::decode(message).expect("test message must decode");
    server.dispatch(packet)
}

pub fn request(
    server: &mut LspServer,
    id: i64,
    method: &str,
    params: Value,
) -> Vec<(Priority, Event)> {
    send(server, json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params }))
}

pub fn notify(server: &mut LspServer, method: &str, params: Value) -> Vec<(Priority, Event)> {
    send(server, json!({ "jsonrpc": "2.0", "method": method, "params": params }))
}

pub fn initialize(server: &mut LspServer) -> Vec<(Priority, Event)> {
    request(server, 1, "initialize", json!({ "capabilities": {} }))
}

pub fn open(server: &mut LspServer, uri: &str, text: &str) -> Vec<(Priority, Event)> {
    notify(
        server,
        "textDocument/didOpen",
        json!({ "textDocument": { "uri": uri, "text": text, "version": 1 } }),
    )
}

/// The JSON of every outbound event, in returned order.
pub fn outbound(events: &[(Priority, Event)]) -> Vec<&Value> {
    events
        .iter()
        .filter_map(|(_, e)| match e {
            Event::Outbound(v) => Some(v),
            Event::Inbound(_) => None,
        })
        .collect()
}

/// The `result` of the single response among the events.
pub fn response_result(events: &[(Priority, Event)]) -> Value {
    let response = outbound(events)
        .into_iter()
        .find(|v| v.get("result").is_some() || v.get("error").is_some())
        .expect("no response among events");
    assert!(response.get("error").is_none(), "unexpected error: {response}");
    response.get("result").cloned().unwrap_or(Value::Null)
}

/// The `error` of the single response among the events.
pub fn response_error(events: &[(Priority, Event)]) -> Value {
    outbound(events)
        .into_iter()
        .find_map(|v| v.get("error"))
        .cloned()
        .expect("no error response among events")
}

/// All notifications with the given method.
pub fn notifications<'a>(events: &'a [(Priority, Event)], method: &str) -> Vec<&'a Value> {
    outbound(events)
        .into_iter()
        .filter(|v| v.get("method").and_then(Value::as_str) == Some(method))
        .collect()
}

/// Line/character of the `offset`-th byte of the first occurrence of
/// `needle` in `text`.
pub fn pos_of(text: &str, needle: &str, offset: usize) -> Value {
    let byte = text.find(needle).expect("needle not in text") + offset;
    let before = &text[..byte];
    let line = before.matches('\n').count();
    let character = byte - before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    json!({ "line": line, "character": character })
}

/// `TextDocumentPositionParams` for a needle in the fixture text.
pub fn at(uri: &str, text: &str, needle: &str, offset: usize) -> Value {
    json!({ "textDocument": { "uri": uri }, "position": pos_of(text, needle, offset) })
}
