//! Structured logging for TextSnap.
//!
//! Sets up the global `tracing` subscriber, scrubs image payloads and tokens
//! out of log lines, and emits per-request OCR pipeline events.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, EventLogger, PipelineEvent};
pub use logger::{LoggingOptions, init_logger};
pub use redact::redact_payload;
