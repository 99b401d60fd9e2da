//! HTTP contract between the client and the gateway (`POST /ocr`).

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

/// Status message returned alongside non-empty text.
pub const STATUS_TEXT_EXTRACTED: &str = "Text extracted successfully";

/// Status message returned when the backend recognized no lines.
pub const STATUS_NO_TEXT: &str = "No text found";

/// Request body: `{ "image": "<base64>" }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl OcrRequest {
    /// Encode raw image bytes into the canonical request shape.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            image: Some(STANDARD.encode(bytes)),
        }
    }

    /// The base64 payload, if present and non-empty.
    pub fn payload(&self) -> Option<&str> {
        self.image.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Decode a base64 payload. Surrounding whitespace is ignored.
    pub fn decode(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(payload.trim())
    }
}

/// Success body: `{ "success": "<status>", "text": "<joined lines>" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrResponse {
    pub success: String,
    pub text: String,
}

impl OcrResponse {
    pub fn from_text(text: String) -> Self {
        let success = if text.is_empty() {
            STATUS_NO_TEXT
        } else {
            STATUS_TEXT_EXTRACTED
        };
        Self {
            success: success.to_string(),
            text,
        }
    }
}

/// Error body: `{ "error": "<summary>", "message"?: "<backend detail>" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
