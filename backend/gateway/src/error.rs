//! Gateway error types with structured JSON responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use textsnap_core::{ErrorBody, OcrError};

pub const MISSING_IMAGE_MESSAGE: &str = "No image data provided in the request body";
pub const BACKEND_FAILURE_MESSAGE: &str = "Failed to process image with the OCR backend";

/// Everything the gateway can answer besides a successful extraction.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{}", MISSING_IMAGE_MESSAGE)]
    MissingImage,
    #[error("{0}")]
    InvalidPayload(String),
    #[error("Request body exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },
    #[error(transparent)]
    Backend(#[from] OcrError),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::MissingImage | GatewayError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            GatewayError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            GatewayError::Backend(err) => ErrorBody {
                error: BACKEND_FAILURE_MESSAGE.to_string(),
                message: Some(err.to_string()),
            },
            other => ErrorBody {
                error: other.to_string(),
                message: None,
            },
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        if let GatewayError::Backend(err) = &self {
            tracing::error!(error = %err, "OCR backend invocation failed");
        }
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_passes_message_through() {
        let err = GatewayError::from(OcrError::Throttled("Rate exceeded".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.body();
        assert_eq!(body.error, BACKEND_FAILURE_MESSAGE);
        assert!(body.message.unwrap().contains("Rate exceeded"));
    }

    #[test]
    fn missing_image_is_bad_request() {
        let err = GatewayError::MissingImage;
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body().error, MISSING_IMAGE_MESSAGE);
        assert!(err.body().message.is_none());
    }
}
