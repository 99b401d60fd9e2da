//! The seam between the session controller and the OCR gateway.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use textsnap_core::OcrRequest;

/// Correlates a dispatched extraction with its eventual result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// One extraction request as sent to the gateway.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub id: RequestId,
    pub body: OcrRequest,
}

/// Where an extraction failure originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The gateway could not be reached or answered with something unusable.
    Transport,
    /// The gateway rejected the request (HTTP 400).
    GatewayInput,
    /// The OCR backend failed (HTTP 500).
    Backend,
}

/// Outcome of one extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExtractionResult {
    /// `text` may be empty when the image contains no text.
    Success { text: String },
    Failure { kind: FailureKind, message: String },
}

impl ExtractionResult {
    pub fn success(text: impl Into<String>) -> Self {
        ExtractionResult::Success { text: text.into() }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        ExtractionResult::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            ExtractionResult::Success { text } => Some(text),
            ExtractionResult::Failure { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionResult::Success { .. })
    }
}

/// Sends an extraction request to the gateway. Every outcome, including
/// network failure, is folded into an [`ExtractionResult`].
#[async_trait]
pub trait ExtractionTransport: Send + Sync {
    async fn extract(&self, request: &ExtractionRequest) -> ExtractionResult;
}
