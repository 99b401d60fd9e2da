//! OCR Pipeline Event Logger
//!
//! One structured event per pipeline step, emitted under the `ocr_events`
//! target so they can be filtered out of (or into) the NDJSON log.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_payload;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    ImageReceived {
        transport: String,
        bytes: usize,
    },
    PayloadRejected {
        reason: String,
    },
    ExtractionCompleted {
        backend: String,
        blocks: usize,
        lines: usize,
        elapsed_ms: u64,
    },
    ExtractionFailed {
        backend: String,
        error_msg: String,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: PipelineEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Build the log entry for an event, redacting any free-form text.
    pub fn entry(request_id: &str, mut event: PipelineEvent) -> EventLogEntry {
        match &mut event {
            PipelineEvent::PayloadRejected { reason } => {
                *reason = redact_payload(reason);
            }
            PipelineEvent::ExtractionFailed { error_msg, .. } => {
                *error_msg = redact_payload(error_msg);
            }
            PipelineEvent::ImageReceived { .. } | PipelineEvent::ExtractionCompleted { .. } => {}
        }

        EventLogEntry {
            request_id: request_id.into(),
            timestamp: Utc::now(),
            event,
        }
    }

    /// Log a pipeline event through the tracing system.
    pub fn log_event(request_id: &str, event: PipelineEvent) {
        let entry = Self::entry(request_id, event);
        let json = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: "ocr_events", request_id = %entry.request_id, event = %json, "OCR pipeline event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_is_redacted() {
        let blob = "QUJD".repeat(40);
        let entry = EventLogger::entry(
            "req-1",
            PipelineEvent::ExtractionFailed {
                backend: "textract".into(),
                error_msg: format!("bad payload {}", blob),
            },
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["event"]["type"], "extraction_failed");
        assert!(!json["event"]["error_msg"].as_str().unwrap().contains(&blob));
    }

    #[test]
    fn test_completed_event_shape() {
        let entry = EventLogger::entry(
            "req-2",
            PipelineEvent::ExtractionCompleted {
                backend: "static".into(),
                blocks: 3,
                lines: 2,
                elapsed_ms: 5,
            },
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["request_id"], "req-2");
        assert_eq!(json["event"]["lines"], 2);
    }
}
