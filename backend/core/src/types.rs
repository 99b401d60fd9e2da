use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification the OCR engine attaches to each recognized block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockKind {
    Page,
    Line,
    Word,
    /// Any classification this crate does not know about.
    #[serde(other)]
    Other,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BlockKind::Page => "PAGE",
            BlockKind::Line => "LINE",
            BlockKind::Word => "WORD",
            BlockKind::Other => "OTHER",
        };
        write!(f, "{}", s)
    }
}

/// One block of recognized text as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextBlock {
    pub kind: BlockKind,
    #[serde(default)]
    pub text: String,
}

impl TextBlock {
    pub fn new(kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn line(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Line, text)
    }

    pub fn word(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Word, text)
    }

    /// Whether this block is a full recognized line of text.
    pub fn is_line(&self) -> bool {
        self.kind == BlockKind::Line
    }
}
