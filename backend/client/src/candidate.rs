use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Which input channel produced an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageOrigin {
    Picker,
    Drop,
    Paste,
}

impl fmt::Display for ImageOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ImageOrigin::Picker => "picker",
            ImageOrigin::Drop => "drop",
            ImageOrigin::Paste => "paste",
        };
        write!(f, "{}", s)
    }
}

/// An image captured from an input channel but not yet validated.
#[derive(Debug, Clone)]
pub struct ImageCandidate {
    pub bytes: Bytes,
    /// Media type as declared by the source (file picker, drop, clipboard).
    pub declared_type: String,
    pub filename: String,
    pub origin: ImageOrigin,
}

impl ImageCandidate {
    pub fn new(
        bytes: impl Into<Bytes>,
        declared_type: impl Into<String>,
        filename: impl Into<String>,
        origin: ImageOrigin,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            declared_type: declared_type.into(),
            filename: filename.into(),
            origin,
        }
    }

    /// Size in bytes.
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lowercased text after the last `.` of the filename; the whole name if
    /// it has no dot.
    pub fn extension(&self) -> String {
        self.filename
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_lowercased() {
        let c = ImageCandidate::new(vec![1, 2, 3], "image/png", "Scan.PNG", ImageOrigin::Picker);
        assert_eq!(c.extension(), "png");
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn test_extension_of_multi_dot_name() {
        let c = ImageCandidate::new(Vec::new(), "image/jpeg", "receipt.final.jpeg", ImageOrigin::Drop);
        assert_eq!(c.extension(), "jpeg");
        assert!(c.is_empty());
    }

    #[test]
    fn test_origin_display() {
        assert_eq!(ImageOrigin::Paste.to_string(), "paste");
    }
}
