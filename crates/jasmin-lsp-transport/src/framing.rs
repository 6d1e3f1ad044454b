//! Message framing for the LSP Base Protocol.

use jasmin_lsp_protocol::{JsonRpcResponse, Packet};
use std::collections::HashMap;
use std::io::{self, BufRead, Write};

/// Why a read did not yield a packet.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The frame was malformed (bad headers, bad JSON, unsupported packet
    /// shape). Recoverable: skip the frame and keep reading.
    #[error("malformed frame: {0}")]
    ParseError(String),

    /// The peer closed the stream. Terminates the session cleanly.
    #[error("end of input stream")]
    EndOfFile,

    /// An I/O failure on the underlying stream.
    #[error("transport i/o error: {0}")]
    Io(#[from] io::Error),
}

/// Read one framed JSON-RPC packet.
///
/// Headers are read line-by-line until the empty separator line; only
/// `Content-Length` is required, other headers are tolerated and ignored.
/// The body is read with an exact byte count so the next frame starts
/// cleanly regardless of message boundaries in the underlying stream.
pub fn read_message<R: BufRead>(reader: &mut R) -> Result<Packet, TransportError> {
    let mut headers = HashMap::new();

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(TransportError::EndOfFile);
        }

        let line = line.trim_end();
        if line.is_empty() {
            break;
        }

        if let Some((key, value)) = line.split_once(':') {
            headers.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    let length: usize = headers
        .get("Content-Length")
        .ok_or_else(|| TransportError::ParseError("missing Content-Length header".to_string()))?
        .parse()
        .map_err(|_| TransportError::ParseError("invalid Content-Length header".to_string()))?;

    let mut content = vec![0u8; length];
    reader.read_exact(&mut content).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            TransportError::EndOfFile
        } else {
            TransportError::Io(e)
        }
    })?;

    let value: serde_json::Value = serde_json::from_slice(&content)
        .map_err(|e| TransportError::ParseError(format!("invalid JSON body: {e}")))?;

    Packet::decode(value).map_err(TransportError::ParseError)
}

/// Write a response with proper framing, emitting exactly the announced
/// number of body bytes.
pub fn write_message<W: Write>(writer: &mut W, response: &JsonRpcResponse) -> io::Result<()> {
    let content = serde_json::to_string(response)?;
    write!(writer, "Content-Length: {}\r\n\r\n{}", content.len(), content)?;
    writer.flush()
}

/// Write a notification with proper framing.
pub fn write_notification<W: Write>(
    writer: &mut W,
    method: &str,
    params: serde_json::Value,
) -> io::Result<()> {
    let notification = serde_json::json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params
    });
    write_json(writer, &notification)
}

/// Write an arbitrary pre-built JSON message with proper framing.
///
/// Used for server-initiated requests, where the message already carries
/// its own id and method.
pub fn write_json<W: Write>(writer: &mut W, message: &serde_json::Value) -> io::Result<()> {
    let content = serde_json::to_string(message)?;
    write!(writer, "Content-Length: {}\r\n\r\n{}", content.len(), content)?;
    writer.flush()
}
