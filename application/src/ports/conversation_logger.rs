//! Port for structured conversation logging.
//!
//! Records every exchange with the oracle (prompt, sample count, stop
//! sequence, completions or failure) as machine-readable events.
//!
//! This is separate from `tracing`: tracing carries human-readable
//! diagnostics, this port carries the full transcript (JSONL in practice).

use serde_json::Value;

/// A structured conversation event
pub struct ConversationEvent {
    /// Event type identifier ("oracle_request", "oracle_response", "oracle_error")
    pub event_type: &'static str,
    /// Event-specific fields
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Sink for conversation events.
///
/// `log` is synchronous and infallible; a sink that cannot write drops the
/// event instead of failing the solve.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Sink that discards everything
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
