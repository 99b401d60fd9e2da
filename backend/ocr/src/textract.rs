//! Textract-compatible text detection over HTTP.
//!
//! Speaks the JSON protocol of `DetectDocumentText`: the image goes out
//! base64-encoded under `Document.Bytes`, recognized blocks come back under
//! `Blocks` in reading order. Request signing is left to whatever sits at the
//! endpoint (a signing proxy, LocalStack, or a compatible service).

use std::time::Instant;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use textsnap_core::{BlockKind, OcrBackend, OcrError, TextBlock};

const TARGET_DETECT_DOCUMENT_TEXT: &str = "Textract.DetectDocumentText";
const AMZ_JSON_CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Error types the service reports when it is over capacity.
const THROTTLING_ERRORS: &[&str] = &[
    "ThrottlingException",
    "ProvisionedThroughputExceededException",
    "LimitExceededException",
];

pub struct TextractBackend {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
}

impl TextractBackend {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_token: None,
        }
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DetectDocumentTextRequest {
    document: Document,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Document {
    bytes: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DetectDocumentTextResponse {
    #[serde(default)]
    blocks: Option<Vec<TextractBlock>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TextractBlock {
    block_type: BlockKind,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ServiceError {
    #[serde(rename = "__type", default)]
    error_type: String,
    #[serde(alias = "Message", default)]
    message: String,
}

/// Map a non-success response to a backend error.
fn classify_failure(status: StatusCode, body: &str) -> OcrError {
    let service_error = serde_json::from_str::<ServiceError>(body).ok();
    let throttled = status == StatusCode::TOO_MANY_REQUESTS
        || service_error.as_ref().is_some_and(|e| {
            // `__type` may carry a namespace prefix ("com.amazonaws...#ThrottlingException").
            let short = e.error_type.rsplit('#').next().unwrap_or_default();
            THROTTLING_ERRORS.contains(&short)
        });

    let detail = match service_error {
        Some(e) if !e.message.is_empty() => e.message,
        _ => body.to_string(),
    };

    if throttled {
        OcrError::Throttled(detail)
    } else {
        OcrError::Status {
            status: status.as_u16(),
            body: detail,
        }
    }
}

#[async_trait]
impl OcrBackend for TextractBackend {
    fn name(&self) -> &str {
        "textract"
    }

    async fn detect_text(&self, image: &[u8]) -> Result<Vec<TextBlock>, OcrError> {
        let start = Instant::now();
        let body = DetectDocumentTextRequest {
            document: Document {
                bytes: STANDARD.encode(image),
            },
        };

        debug!(endpoint = %self.endpoint, bytes = image.len(), "Sending DetectDocumentText");

        let mut request = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, AMZ_JSON_CONTENT_TYPE)
            .header("X-Amz-Target", TARGET_DETECT_DOCUMENT_TEXT)
            .json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| OcrError::Transport(e.to_string()))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| OcrError::Transport(e.to_string()))?;

        if !status.is_success() {
            let err = classify_failure(status, &raw);
            warn!(status = %status, error = %err, "DetectDocumentText failed");
            return Err(err);
        }

        let parsed: DetectDocumentTextResponse = serde_json::from_str(&raw)
            .map_err(|e| OcrError::MalformedResponse(e.to_string()))?;

        let blocks: Vec<TextBlock> = parsed
            .blocks
            .unwrap_or_default()
            .into_iter()
            .map(|b| TextBlock::new(b.block_type, b.text.unwrap_or_default()))
            .collect();

        debug!(
            blocks = blocks.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "DetectDocumentText completed"
        );
        Ok(blocks)
    }
}
