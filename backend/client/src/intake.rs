//! Capture adapters. Each channel turns its native payload into an
//! [`ImageCandidate`]; nothing here validates.

use std::io;
use std::path::Path;

use bytes::Bytes;

use crate::candidate::{ImageCandidate, ImageOrigin};
use crate::mime_detect::{detect_mime_type, is_image, subtype};

/// Read a file chosen with the picker. The declared type comes from the
/// extension, not the content.
pub async fn read_picked_file(path: &Path) -> io::Result<ImageCandidate> {
    let bytes = tokio::fs::read(path).await?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(ImageCandidate::new(
        bytes,
        detect_mime_type(path),
        filename,
        ImageOrigin::Picker,
    ))
}

#[derive(Debug, Clone)]
pub struct DroppedFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Bytes,
}

/// Files dropped onto the drop zone, in drop order.
#[derive(Debug, Clone, Default)]
pub struct DropPayload {
    pub files: Vec<DroppedFile>,
}

impl DropPayload {
    pub fn new(files: Vec<DroppedFile>) -> Self {
        Self { files }
    }

    /// Only the first dropped file is considered.
    pub fn into_candidate(self) -> Option<ImageCandidate> {
        let file = self.files.into_iter().next()?;
        Some(ImageCandidate::new(
            file.bytes,
            file.media_type,
            file.name,
            ImageOrigin::Drop,
        ))
    }
}

#[derive(Debug, Clone)]
pub struct ClipboardItem {
    pub media_type: String,
    pub bytes: Bytes,
}

/// Items on the clipboard at paste time.
#[derive(Debug, Clone, Default)]
pub struct ClipboardPayload {
    pub items: Vec<ClipboardItem>,
}

impl ClipboardPayload {
    pub fn new(items: Vec<ClipboardItem>) -> Self {
        Self { items }
    }

    /// First image item, named `pasted-image.<subtype>`.
    pub fn into_candidate(self) -> Option<ImageCandidate> {
        let item = self
            .items
            .into_iter()
            .find(|item| is_image(&item.media_type))?;
        let filename = format!("pasted-image.{}", subtype(&item.media_type));
        Some(ImageCandidate::new(
            item.bytes,
            item.media_type,
            filename,
            ImageOrigin::Paste,
        ))
    }
}
