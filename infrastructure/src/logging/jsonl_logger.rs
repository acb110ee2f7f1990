//! JSONL transcript writer.
//!
//! Every [`ConversationEvent`] becomes one line: the payload's fields (or
//! the payload under `data` when it is not an object) plus `type`, `seq`
//! and an RFC 3339 `timestamp`. Lines are flushed as they are written so a
//! killed worker still leaves a readable transcript.

use board_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// File name used inside a session directory
pub const TRANSCRIPT_FILE: &str = "run.jsonl";

struct Sink {
    writer: BufWriter<File>,
    seq: u64,
}

pub struct JsonlConversationLogger {
    sink: Mutex<Sink>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open `path` for appending, creating parent directories.
    pub fn create(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            sink: Mutex::new(Sink {
                writer: BufWriter::new(file),
                seq: 0,
            }),
            path: path.to_path_buf(),
        })
    }

    /// Transcript at `<session_dir>/run.jsonl`, or `None` (with a warning)
    /// when it cannot be created. A missing transcript never stops a run.
    pub fn for_session(session_dir: &Path) -> Option<Self> {
        let path = session_dir.join(TRANSCRIPT_FILE);
        match Self::create(&path) {
            Ok(logger) => Some(logger),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not open run transcript");
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn record(event: ConversationEvent, seq: u64) -> Value {
    let mut map = match event.payload {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    map.insert("type".to_string(), Value::from(event.event_type));
    map.insert("seq".to_string(), Value::from(seq));
    map.insert(
        "timestamp".to_string(),
        Value::from(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
    );
    Value::Object(map)
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(mut sink) = self.sink.lock() else {
            return;
        };
        sink.seq += 1;
        let line = record(event, sink.seq);
        let Ok(line) = serde_json::to_string(&line) else {
            return;
        };
        if let Err(e) = writeln!(sink.writer, "{}", line).and_then(|_| sink.writer.flush()) {
            warn!(path = %self.path.display(), error = %e, "Dropped transcript event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_events_become_numbered_lines() {
        let dir = tempfile::tempdir().unwrap();
        let logger = JsonlConversationLogger::for_session(dir.path()).unwrap();

        logger.log(ConversationEvent::new(
            "tool_call",
            json!({"tool": "read_file", "args": {"path": "foo.rs"}}),
        ));
        logger.log(ConversationEvent::new("run_finished", json!({"status": "completed"})));

        let lines = read_lines(&dir.path().join(TRANSCRIPT_FILE));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "tool_call");
        assert_eq!(lines[0]["tool"], "read_file");
        assert_eq!(lines[0]["seq"], 1);
        assert_eq!(lines[1]["seq"], 2);
        assert!(lines[1]["timestamp"].is_string());
    }

    #[test]
    fn test_non_object_payload_goes_under_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/t.jsonl");
        let logger = JsonlConversationLogger::create(&path).unwrap();

        logger.log(ConversationEvent::new("note", json!("just a string")));

        let lines = read_lines(&path);
        assert_eq!(lines[0]["type"], "note");
        assert_eq!(lines[0]["data"], "just a string");
    }

    #[test]
    fn test_reopen_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TRANSCRIPT_FILE);

        JsonlConversationLogger::create(&path)
            .unwrap()
            .log(ConversationEvent::new("a", json!({})));
        JsonlConversationLogger::create(&path)
            .unwrap()
            .log(ConversationEvent::new("b", json!({})));

        let types: Vec<_> = read_lines(&path)
            .iter()
            .map(|l| l["type"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(types, vec!["a", "b"]);
    }

    #[test]
    fn test_unwritable_session_dir() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "").unwrap();

        assert!(JsonlConversationLogger::for_session(&blocker.join("session")).is_none());
    }
}
