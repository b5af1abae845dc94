//! JSONL file writer for oracle transcripts.
//!
//! Each [`ConversationEvent`] becomes one JSON line carrying the payload
//! fields plus `type`, `seq` and `timestamp`. The file is opened in append
//! mode so a resumed benchmark keeps the earlier transcript.

use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tq_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use tracing::warn;

struct Sink {
    writer: BufWriter<File>,
    seq: u64,
}

/// JSONL conversation logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex`. Flushes after every line and on `Drop`.
pub struct JsonlConversationLogger {
    sink: Mutex<Sink>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open (or create) the log at `path`, creating parent directories.
    ///
    /// Returns `None` if the file cannot be opened; transcript logging is
    /// then simply skipped.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create conversation log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(
                    "Could not open conversation log file {}: {}",
                    path.display(),
                    e
                );
                return None;
            }
        };

        Some(Self {
            sink: Mutex::new(Sink {
                writer: BufWriter::new(file),
                seq: 0,
            }),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: ConversationEvent, seq: u64) -> Value {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

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
        map.insert("timestamp".to_string(), Value::from(timestamp));
        Value::Object(map)
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(mut sink) = self.sink.lock() else {
            return;
        };
        sink.seq += 1;
        let record = Self::record(event, sink.seq);

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };
        if let Err(e) = writeln!(sink.writer, "{}", line).and_then(|_| sink.writer.flush()) {
            warn!("Dropping conversation event: {}", e);
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut sink) = self.sink.lock() {
            let _ = sink.writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_record_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("oracle.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        logger.log(ConversationEvent::new(
            "oracle_request",
            serde_json::json!({"role": "search", "prompt": "2+2=?", "samples": 5}),
        ));
        logger.log(ConversationEvent::new(
            "oracle_response",
            serde_json::json!({"role": "search", "completions": ["the answer is 4"]}),
        ));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "oracle_request");
        assert_eq!(lines[0]["samples"], 5);
        assert_eq!(lines[0]["seq"], 1);
        assert_eq!(lines[1]["type"], "oracle_response");
        assert_eq!(lines[1]["completions"][0], "the answer is 4");
        assert_eq!(lines[1]["seq"], 2);
        assert!(lines[1]["timestamp"].is_string());
    }

    #[test]
    fn test_non_object_payload_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oracle.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        logger.log(ConversationEvent::new(
            "oracle_error",
            serde_json::json!("Timeout"),
        ));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["type"], "oracle_error");
        assert_eq!(lines[0]["data"], "Timeout");
    }

    #[test]
    fn test_reopening_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oracle.jsonl");

        for _ in 0..2 {
            let logger = JsonlConversationLogger::new(&path).unwrap();
            logger.log(ConversationEvent::new("oracle_request", serde_json::json!({})));
        }

        assert_eq!(read_lines(&path).len(), 2);
    }
}
