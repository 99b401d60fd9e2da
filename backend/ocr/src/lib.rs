//! OCR backends the gateway can forward images to.

pub mod static_backend;
pub mod textract;

use std::sync::Arc;

use anyhow::{bail, Result};
use textsnap_config::OcrConfig;
use textsnap_core::OcrBackend;

pub use static_backend::StaticBackend;
pub use textract::TextractBackend;

/// Build the configured backend.
pub fn backend_from_config(config: &OcrConfig) -> Result<Arc<dyn OcrBackend>> {
    match config.effective_provider() {
        "textract" => {
            let Some(endpoint) = config.endpoint.as_deref().filter(|e| !e.trim().is_empty()) else {
                bail!("the textract OCR provider requires `ocr.endpoint` (or TEXTSNAP_OCR_ENDPOINT)");
            };
            let mut backend = TextractBackend::new(endpoint);
            if let Some(token) = &config.api_token {
                backend = backend.with_api_token(token);
            }
            Ok(Arc::new(backend))
        }
        "static" => Ok(Arc::new(StaticBackend::from_lines(config.static_lines.clone()))),
        other => bail!("unknown OCR provider '{other}'"),
    }
}
