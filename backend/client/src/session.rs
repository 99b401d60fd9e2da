//! Session state as observed by a UI.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::candidate::{ImageCandidate, ImageOrigin};
use crate::notification::Notification;
use crate::transport::{ExtractionResult, RequestId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub Uuid);

impl ImageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The image currently being previewed and processed.
#[derive(Debug, Clone)]
pub struct ActiveImage {
    pub id: ImageId,
    pub filename: String,
    pub media_type: String,
    pub size: u64,
    pub origin: ImageOrigin,
    pub bytes: Bytes,
}

impl ActiveImage {
    pub(crate) fn from_candidate(candidate: ImageCandidate) -> Self {
        Self {
            id: ImageId::new(),
            size: candidate.len(),
            filename: candidate.filename,
            media_type: candidate.declared_type,
            origin: candidate.origin,
            bytes: candidate.bytes,
        }
    }
}

/// Snapshot of everything a UI needs to render a session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub(crate) image: Option<ActiveImage>,
    pub(crate) result: Option<ExtractionResult>,
    pub(crate) busy: bool,
    pub(crate) notifications: Vec<Notification>,
    pub(crate) pending: Option<RequestId>,
}

impl SessionState {
    pub fn image(&self) -> Option<&ActiveImage> {
        self.image.as_ref()
    }

    pub fn result(&self) -> Option<&ExtractionResult> {
        self.result.as_ref()
    }

    /// Text of the last successful extraction.
    pub fn text(&self) -> Option<&str> {
        self.result.as_ref().and_then(ExtractionResult::text)
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Request whose response is still awaited, if any.
    pub fn pending_request(&self) -> Option<RequestId> {
        self.pending
    }
}
