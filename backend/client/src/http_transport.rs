//! [`ExtractionTransport`] over HTTP to the gateway's `POST /ocr`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use textsnap_core::{ErrorBody, OcrResponse};

use crate::messages;
use crate::transport::{ExtractionRequest, ExtractionResult, ExtractionTransport, FailureKind};

pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn ocr_url(&self) -> String {
        format!("{}/ocr", self.base_url)
    }
}

#[async_trait]
impl ExtractionTransport for HttpTransport {
    async fn extract(&self, request: &ExtractionRequest) -> ExtractionResult {
        debug!(request = %request.id, url = %self.ocr_url(), "Sending extraction request");

        let response = match self
            .client
            .post(self.ocr_url())
            .json(&request.body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!(request = %request.id, error = %e, "Gateway unreachable");
                return ExtractionResult::failure(FailureKind::Transport, messages::NETWORK_FAILURE);
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            return match serde_json::from_str::<OcrResponse>(&body) {
                Ok(parsed) => ExtractionResult::success(parsed.text),
                Err(e) => {
                    warn!(request = %request.id, error = %e, "Unreadable gateway response");
                    ExtractionResult::failure(FailureKind::Transport, messages::INVALID_GATEWAY_RESPONSE)
                }
            };
        }

        let error_body = serde_json::from_str::<ErrorBody>(&body).ok();
        debug!(request = %request.id, status = %status, "Gateway returned an error status");
        classify_status(status, error_body)
    }
}

/// Map a non-2xx status and its (optional) structured body to a failure.
fn classify_status(status: StatusCode, body: Option<ErrorBody>) -> ExtractionResult {
    let code = status.as_u16();
    match (status, body) {
        (StatusCode::BAD_REQUEST, Some(b)) => ExtractionResult::failure(
            FailureKind::GatewayInput,
            format!("Server error: {code} ({})", b.error),
        ),
        (StatusCode::BAD_REQUEST, None) => {
            ExtractionResult::failure(FailureKind::GatewayInput, format!("Server error: {code}"))
        }
        // The backend's own message is passed through untouched.
        (StatusCode::INTERNAL_SERVER_ERROR, Some(b)) => {
            ExtractionResult::failure(FailureKind::Backend, b.message.unwrap_or(b.error))
        }
        _ => ExtractionResult::failure(FailureKind::Transport, format!("Server error: {code}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RequestId;
    use axum::{
        Json, Router,
        http::StatusCode as AxumStatus,
        routing::post,
    };
    use serde_json::{Value, json};
    use textsnap_core::OcrRequest;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn request() -> ExtractionRequest {
        ExtractionRequest {
            id: RequestId(1),
            body: OcrRequest::from_bytes(b"png"),
        }
    }

    #[tokio::test]
    async fn success_returns_text() {
        let app = Router::new().route(
            "/ocr",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["image"], "cG5n");
                Json(json!({ "success": "Text extracted successfully", "text": "Hello\nWorld" }))
            }),
        );
        let transport = HttpTransport::new(serve(app).await);
        assert_eq!(transport.extract(&request()).await, ExtractionResult::success("Hello\nWorld"));
    }

    #[tokio::test]
    async fn bad_request_is_gateway_input() {
        let app = Router::new().route(
            "/ocr",
            post(|| async {
                (
                    AxumStatus::BAD_REQUEST,
                    Json(json!({ "error": "No image data provided in the request body" })),
                )
            }),
        );
        let transport = HttpTransport::new(serve(app).await);
        assert_eq!(
            transport.extract(&request()).await,
            ExtractionResult::failure(
                FailureKind::GatewayInput,
                "Server error: 400 (No image data provided in the request body)"
            )
        );
    }

    #[tokio::test]
    async fn backend_message_passes_through() {
        let app = Router::new().route(
            "/ocr",
            post(|| async {
                (
                    AxumStatus::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Failed to process image with the OCR backend",
                        "message": "Request has unsupported document format"
                    })),
                )
            }),
        );
        let transport = HttpTransport::new(serve(app).await);
        assert_eq!(
            transport.extract(&request()).await,
            ExtractionResult::failure(FailureKind::Backend, "Request has unsupported document format")
        );
    }

    #[tokio::test]
    async fn other_status_is_transport_failure() {
        let app = Router::new().route("/ocr", post(|| async { AxumStatus::BAD_GATEWAY }));
        let transport = HttpTransport::new(serve(app).await);
        assert_eq!(
            transport.extract(&request()).await,
            ExtractionResult::failure(FailureKind::Transport, "Server error: 502")
        );
    }

    #[tokio::test]
    async fn garbage_success_body_is_transport_failure() {
        let app = Router::new().route("/ocr", post(|| async { "<html>ok</html>" }));
        let transport = HttpTransport::new(serve(app).await);
        assert_eq!(
            transport.extract(&request()).await,
            ExtractionResult::failure(FailureKind::Transport, messages::INVALID_GATEWAY_RESPONSE)
        );
    }

    #[tokio::test]
    async fn unreachable_gateway_is_network_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::new(format!("http://{}/", addr));
        assert_eq!(
            transport.extract(&request()).await,
            ExtractionResult::failure(FailureKind::Transport, messages::NETWORK_FAILURE)
        );
    }
}
