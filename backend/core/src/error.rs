use thiserror::Error;

/// Failure of a single OCR backend invocation.
///
/// Every variant surfaces to callers as a backend invocation failure; the
/// `Display` text is what the gateway passes through in its `message` field.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR backend unreachable: {0}")]
    Transport(String),

    #[error("OCR backend throttled the request: {0}")]
    Throttled(String),

    #[error("OCR backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed OCR backend response: {0}")]
    MalformedResponse(String),
}

impl OcrError {
    /// Whether the backend rejected the call for capacity reasons.
    pub fn is_throttled(&self) -> bool {
        matches!(self, OcrError::Throttled(_))
    }
}
