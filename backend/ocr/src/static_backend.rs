use async_trait::async_trait;
use textsnap_core::{OcrBackend, OcrError, TextBlock};

/// A backend that returns the same blocks for every image.
///
/// Used for local development without an OCR service, and in tests.
pub struct StaticBackend {
    blocks: Vec<TextBlock>,
}

impl StaticBackend {
    pub fn new(blocks: Vec<TextBlock>) -> Self {
        Self { blocks }
    }

    /// Every entry becomes one LINE block.
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self::new(lines.into_iter().map(TextBlock::line).collect())
    }
}

#[async_trait]
impl OcrBackend for StaticBackend {
    fn name(&self) -> &str {
        "static"
    }

    async fn detect_text(&self, _image: &[u8]) -> Result<Vec<TextBlock>, OcrError> {
        Ok(self.blocks.clone())
    }
}
