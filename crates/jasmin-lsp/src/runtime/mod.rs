//! Full JSON-RPC LSP server implementation.
//!
//! The loop is single-threaded and cooperative: it drains the priority
//! queue, blocking on the transport only when the queue is empty. Handlers
//! never perform I/O; they return events, and outbound writes happen when
//! the loop hands an [`Event::Outbound`] back to the source. Responses are
//! enqueued `Immediate`, so everything a request produced is written before
//! the next inbound packet is read.

mod diagnostics;
mod dispatch;

use crate::event::{Event, EventQueue, Priority};
use crate::state::{DocumentStore, ServerConfig};
use jasmin_lsp_transport::{TransportError, read_message, write_json};
use std::io::{BufRead, BufReader, Write};

/// The interface between the loop and whatever feeds and consumes events.
///
/// `receive` blocks for the next inbound work; `handle` consumes one event
/// and may produce follow-up events. The loop is generic over this trait,
/// which keeps it independent of transport and dispatch details.
pub trait EventSource {
    /// Block until inbound work is available.
    fn receive(&mut self) -> Result<Vec<(Priority, Event)>, TransportError>;
    /// Consume one event, returning any follow-up events.
    fn handle(&mut self, event: Event) -> Vec<(Priority, Event)>;
}

/// Drain the queue; block on the source when it is empty.
///
/// `ParseError` skips the frame and continues; `EndOfFile` ends the loop
/// cleanly; I/O errors propagate.
pub fn run_loop<S: EventSource>(source: &mut S) -> anyhow::Result<()> {
    let mut queue = EventQueue::new();
    loop {
        match queue.pop() {
            Some(event) => {
                for (priority, follow_up) in source.handle(event) {
                    queue.push(priority, follow_up);
                }
            }
            None => match source.receive() {
                Ok(events) => {
                    for (priority, event) in events {
                        queue.push(priority, event);
                    }
                }
                Err(TransportError::ParseError(msg)) => {
                    tracing::warn!("skipping malformed frame: {msg}");
                }
                Err(TransportError::EndOfFile) => {
                    tracing::info!("input stream closed, shutting down");
                    return Ok(());
                }
                Err(TransportError::Io(e)) => return Err(e.into()),
            },
        }
    }
}

/// LSP server owning the transport, the document store, and configuration.
pub struct LspServer {
    reader: Box<dyn BufRead>,
    writer: Box<dyn Write>,
    pub(crate) store: DocumentStore,
    pub(crate) config: ServerConfig,
    pub(crate) initialized: bool,
    pub(crate) shutdown_received: bool,
    pub(crate) exiting: bool,
}

impl LspServer {
    /// Create a server over stdin/stdout.
    pub fn new() -> Self {
        Self::with_io(BufReader::new(std::io::stdin()), std::io::stdout())
    }

    /// Create a server over arbitrary streams (used by tests).
    pub fn with_io(reader: impl BufRead + 'static, writer: impl Write + 'static) -> Self {
        LspServer {
            reader: Box::new(reader),
            writer: Box::new(writer),
            store: DocumentStore::new(),
            config: ServerConfig::default(),
            initialized: false,
            shutdown_received: false,
            exiting: false,
        }
    }

    /// Run until the client closes the stream or sends `exit`.
    pub fn run(&mut self) -> anyhow::Result<()> {
        run_loop(self)
    }
}

impl Default for LspServer {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for LspServer {
    fn receive(&mut self) -> Result<Vec<(Priority, Event)>, TransportError> {
        if self.exiting {
            return Err(TransportError::EndOfFile);
        }
        let packet = read_message(&mut self.reader)?;
        Ok(vec![(Priority::High, Event::Inbound(packet))])
    }

    fn handle(&mut self, event: Event) -> Vec<(Priority, Event)> {
        match event {
            Event::Inbound(packet) => self.dispatch(packet),
            Event::Outbound(message) => {
                if let Err(e) = write_json(&mut self.writer, &message) {
                    tracing::error!("failed to write outbound message: {e}");
                }
                Vec::new()
            }
        }
    }
}
