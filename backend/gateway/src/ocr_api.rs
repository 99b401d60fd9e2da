//! `POST /ocr`: base64 image in JSON, recognized text out.

use std::time::Instant;

use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::StatusCode,
};
use textsnap_core::{OcrRequest, OcrResponse};
use textsnap_logging::{EventLogger, PipelineEvent};
use tracing::debug;

use crate::error::GatewayError;
use crate::normalize::{join_lines, line_count};
use crate::server::GatewayState;

/// Handler for `POST /ocr`.
///
/// The body is parsed by hand so that every malformed request still gets a
/// structured `{ "error" }` answer.
pub async fn extract_text(
    State(state): State<GatewayState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<OcrResponse>, GatewayError> {
    let request_id = uuid::Uuid::new_v4().to_string();

    let image = match decode_body(body, state.body_limit) {
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
            transport: "json".into(),
            bytes: image.len(),
        },
    );

    run_extraction(&state, &request_id, &image).await.map(Json)
}

/// Parse and decode the JSON body into raw image bytes.
fn decode_body(
    body: Result<Bytes, BytesRejection>,
    limit: usize,
) -> Result<Vec<u8>, GatewayError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            GatewayError::PayloadTooLarge { limit }
        } else {
            GatewayError::InvalidPayload(rejection.body_text())
        }
    })?;

    let request: OcrRequest = serde_json::from_slice(&body)
        .map_err(|e| GatewayError::InvalidPayload(format!("Request body is not valid JSON: {e}")))?;

    let payload = request.payload().ok_or(GatewayError::MissingImage)?;
    let image = OcrRequest::decode(payload).map_err(|e| {
        GatewayError::InvalidPayload(format!("Image payload is not valid base64: {e}"))
    })?;

    if image.is_empty() {
        return Err(GatewayError::MissingImage);
    }
    Ok(image)
}

/// One backend invocation, normalized. Shared by every upload transport.
pub async fn run_extraction(
    state: &GatewayState,
    request_id: &str,
    image: &[u8],
) -> Result<OcrResponse, GatewayError> {
    let backend = state.backend.name().to_string();
    let start = Instant::now();

    let blocks = match state.backend.detect_text(image).await {
        Ok(blocks) => blocks,
        Err(err) => {
            EventLogger::log_event(
                request_id,
                PipelineEvent::ExtractionFailed {
                    backend,
                    error_msg: err.to_string(),
                },
            );
            return Err(GatewayError::Backend(err));
        }
    };

    let text = join_lines(&blocks);
    EventLogger::log_event(
        request_id,
        PipelineEvent::ExtractionCompleted {
            backend,
            blocks: blocks.len(),
            lines: line_count(&blocks),
            elapsed_ms: start.elapsed().as_millis() as u64,
        },
    );
    debug!(request_id, chars = text.chars().count(), "Extraction finished");

    Ok(OcrResponse::from_text(text))
}
