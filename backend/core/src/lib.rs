pub mod error;
pub mod traits;
pub mod types;
pub mod wire;

pub use error::OcrError;
pub use traits::OcrBackend;
pub use types::{BlockKind, TextBlock};
pub use wire::{
    ErrorBody, OcrRequest, OcrResponse, STATUS_NO_TEXT, STATUS_TEXT_EXTRACTED,
};
