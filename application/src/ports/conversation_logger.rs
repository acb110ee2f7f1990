//! Port for the structured run transcript.
//!
//! Separate from `tracing`: tracing carries human-readable diagnostics,
//! this port records every model response, tool call and tool result of a
//! run in a machine-readable form (JSONL in infrastructure).

use serde_json::Value;
use std::sync::Mutex;

/// One transcript event: a type tag plus an event-specific JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationEvent {
    /// e.g. "run_started", "llm_response", "tool_call", "tool_result", "run_finished"
    pub event_type: &'static str,
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

/// Sink for transcript events.
///
/// `log` is synchronous and non-fallible so transcript problems never
/// disturb a run; implementations drop events they cannot write.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}

/// Keeps events in memory, for inspecting a run in tests.
#[derive(Default)]
pub struct RecordingConversationLogger {
    events: Mutex<Vec<ConversationEvent>>,
}

impl RecordingConversationLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ConversationEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn event_types(&self) -> Vec<&'static str> {
        self.events().iter().map(|e| e.event_type).collect()
    }
}

impl ConversationLogger for RecordingConversationLogger {
    fn log(&self, event: ConversationEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
