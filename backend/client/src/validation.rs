//! Intake validation. Runs before anything touches the network.

use textsnap_config::ClientConfig;
use thiserror::Error;

use crate::candidate::ImageCandidate;
use crate::mime_detect::is_image;

/// Filename extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "avif"];

/// 10 MiB.
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Why a candidate was refused. Each reason has its own user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please upload only image files")]
    NotAnImage { declared_type: String },

    #[error("Unsupported file format. Please use: JPG, JPEG, PNG, AVIF")]
    UnsupportedExtension { extension: String },

    #[error("File size too large. Please use an image under {}MB", .limit / (1024 * 1024))]
    TooLarge { size: u64, limit: u64 },
}

/// Acceptance rules for candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub max_bytes: u64,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl ValidationPolicy {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            max_bytes: config.effective_max_image_bytes(),
        }
    }

    /// Accept or reject a candidate. Depends only on the candidate's declared
    /// type, filename, and length.
    ///
    /// Checks run in a fixed order (media category, extension, size) so the
    /// reported reason is always the first one that applies.
    pub fn validate(&self, candidate: &ImageCandidate) -> Result<(), ValidationError> {
        if !is_image(&candidate.declared_type) {
            return Err(ValidationError::NotAnImage {
                declared_type: candidate.declared_type.clone(),
            });
        }

        let extension = candidate.extension();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ValidationError::UnsupportedExtension { extension });
        }

        if candidate.len() > self.max_bytes {
            return Err(ValidationError::TooLarge {
                size: candidate.len(),
                limit: self.max_bytes,
            });
        }

        Ok(())
    }
}
