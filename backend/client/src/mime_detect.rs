//! MIME type detection for picked files.
//!
//! The file picker hands over a path; its declared type is derived from the
//! extension the way a browser labels a selected file.

use std::path::Path;

/// Detect MIME type by file extension.
pub fn detect_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "avif" => "image/avif",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "tiff" | "tif" => "image/tiff",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Whether a MIME type is for an image.
pub fn is_image(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

/// File extension conventionally used for an image MIME type
/// (`image/jpeg` → `jpeg`, `image/png; q=1` → `png`).
pub fn subtype(mime: &str) -> &str {
    let essence = mime.split(';').next().unwrap_or("").trim();
    essence.split_once('/').map(|(_, sub)| sub).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_jpeg() {
        assert_eq!(detect_mime_type(&PathBuf::from("photo.JPG")), "image/jpeg");
    }

    #[test]
    fn detects_avif() {
        assert_eq!(detect_mime_type(&PathBuf::from("shot.avif")), "image/avif");
    }

    #[test]
    fn unknown_extension_fallback() {
        assert_eq!(detect_mime_type(&PathBuf::from("file.xyz")), "application/octet-stream");
    }

    #[test]
    fn subtype_strips_parameters() {
        assert_eq!(subtype("image/png; charset=binary"), "png");
        assert_eq!(subtype("garbage"), "");
    }
}
