//! TextSnap OCR Gateway HTTP API Server
//!
//! Accepts base64 (or multipart) images, forwards them to the configured OCR
//! backend, and returns the recognized lines as plain text.

pub mod error;
pub mod health_api;
pub mod normalize;
pub mod ocr_api;
pub mod server;
pub mod upload;

pub use error::GatewayError;
pub use normalize::join_lines;
pub use server::{GatewayState, build_router, start_server};
