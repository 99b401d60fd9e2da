//! User-facing notification texts.

pub const PROCESSING: &str = "Processing image...";
pub const EXTRACTION_SUCCEEDED: &str = "Text extraction completed successfully!";
pub const NO_TEXT_FOUND: &str = "No text found in the image";
pub const NO_IMAGE_IN_CLIPBOARD: &str = "No image found in clipboard. Please copy an image and try again.";
pub const TEXT_COPIED: &str = "Text copied to clipboard!";
pub const NETWORK_FAILURE: &str = "Network error: unable to reach the OCR gateway";
pub const INVALID_GATEWAY_RESPONSE: &str = "Invalid response from the OCR gateway";

/// Error notification for a failed extraction.
pub fn extraction_failed(message: &str) -> String {
    format!("Failed to extract text: {message}")
}

/// Error notification for a file the picker could not read.
pub fn unreadable_file(detail: &str) -> String {
    format!("Could not read the selected file: {detail}")
}
