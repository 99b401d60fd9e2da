//! Transient user-visible notifications.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Severity of a notification, which determines its styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Neutral progress or guidance.
    Info,
    /// A completed operation.
    Success,
    /// A rejected input or a failed operation.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// Identifier unique within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NotificationId(pub u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
    /// Monotonic deadline after which the notification is removed.
    pub expires_at: Instant,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Ordered list of live notifications plus the id counter.
#[derive(Debug, Clone)]
pub(crate) struct NotificationCenter {
    items: Vec<Notification>,
    next_id: u64,
    ttl: Duration,
}

impl NotificationCenter {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
            ttl,
        }
    }

    pub(crate) fn push(&mut self, message: impl Into<String>, severity: Severity) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id += 1;
        self.items.push(Notification {
            id,
            message: message.into(),
            severity,
            created_at: Utc::now(),
            expires_at: Instant::now() + self.ttl,
        });
        id
    }

    /// Remove a notification. Unknown ids are ignored.
    pub(crate) fn dismiss(&mut self, id: NotificationId) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Drop everything whose deadline has passed, returning the removed ids.
    pub(crate) fn prune_expired(&mut self, now: Instant) -> Vec<NotificationId> {
        let mut removed = Vec::new();
        self.items.retain(|n| {
            if n.is_expired(now) {
                removed.push(n.id);
                false
            } else {
                true
            }
        });
        removed
    }

    /// Remove every notification. Ids keep counting up.
    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    /// Earliest expiry among live notifications.
    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        self.items.iter().map(|n| n.expires_at).min()
    }

    pub(crate) fn items(&self) -> &[Notification] {
        &self.items
    }
}
