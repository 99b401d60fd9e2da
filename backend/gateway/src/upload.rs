//! `POST /ocr/upload`: multipart variant of `/ocr`.
//!
//! The `file` field is normalized to raw bytes and handed to the same
//! extraction path as the JSON endpoint.

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
};
use textsnap_core::OcrResponse;
use textsnap_logging::{EventLogger, PipelineEvent};

use crate::error::GatewayError;
use crate::ocr_api::run_extraction;
use crate::server::GatewayState;

const FILE_FIELD: &str = "file";

/// Handler for `POST /ocr/upload`.
pub async fn upload_image(
    State(state): State<GatewayState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<OcrResponse>, GatewayError> {
    let request_id = uuid::Uuid::new_v4().to_string();

    let image = match read_file_field(multipart, state.body_limit).await {
        Ok(image) => image,
        Err(err) => {
            EventLogger::log_event(
                &request_id,
                PipelineEvent::PayloadRejected {
                    reason: err.to_string(),
                },
            );
            return Err(err);
        }
    };

    EventLogger::log_event(
        &request_id,
        PipelineEvent::ImageReceived {
            transport: "multipart".into(),
            bytes: image.len(),
        },
    );

    run_extraction(&state, &request_id, &image).await.map(Json)
}

async fn read_file_field(
    multipart: Result<Multipart, MultipartRejection>,
    limit: usize,
) -> Result<Vec<u8>, GatewayError> {
    let mut multipart =
        multipart.map_err(|rejection| GatewayError::InvalidPayload(rejection.body_text()))?;

    let too_large_or_invalid = |err: axum::extract::multipart::MultipartError| {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            GatewayError::PayloadTooLarge { limit }
        } else {
            GatewayError::InvalidPayload(err.body_text())
        }
    };

    while let Some(field) = multipart.next_field().await.map_err(too_large_or_invalid)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let is_image = field
            .content_type()
            .is_some_and(|ct| ct.starts_with("image/"));
        if !is_image {
            return Err(GatewayError::InvalidPayload("Not an image".into()));
        }

        let data = field.bytes().await.map_err(too_large_or_invalid)?;
        if data.is_empty() {
            return Err(GatewayError::MissingImage);
        }
        return Ok(data.to_vec());
    }

    Err(GatewayError::MissingImage)
}
