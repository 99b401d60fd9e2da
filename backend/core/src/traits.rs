use async_trait::async_trait;

use crate::error::OcrError;
use crate::types::TextBlock;

/// A text-recognition engine the gateway forwards images to.
///
/// Implementations receive the raw, already-decoded image bytes and return
/// the recognized blocks in the engine's own order. One call is one attempt;
/// callers never retry.
#[async_trait]
pub trait OcrBackend: Send + Sync {
    /// Backend name (e.g., "textract", "static").
    fn name(&self) -> &str;

    /// Run text detection over a single image.
    async fn detect_text(&self, image: &[u8]) -> Result<Vec<TextBlock>, OcrError>;
}
