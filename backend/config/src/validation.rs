//! Config validation: schema checks with user-friendly error messages.

use crate::schema::TextSnapConfig;
use thiserror::Error;

/// Providers the gateway knows how to construct.
pub const KNOWN_PROVIDERS: &[&str] = &["textract", "static"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &TextSnapConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_gateway(config, &mut report);
    validate_ocr(config, &mut report);
    validate_client(config, &mut report);
    report
}

fn validate_gateway(config: &TextSnapConfig, report: &mut ValidationReport) {
    let Some(gw) = &config.gateway else { return };
    if gw.port == Some(0) {
        report.error("gateway.port", "port must be > 0");
    }
    if gw.body_limit_bytes == Some(0) {
        report.error("gateway.bodyLimitBytes", "bodyLimitBytes must be > 0");
    }
}

fn validate_ocr(config: &TextSnapConfig, report: &mut ValidationReport) {
    let Some(ocr) = &config.ocr else { return };
    let provider = ocr.effective_provider();
    if !KNOWN_PROVIDERS.contains(&provider) {
        report.error(
            "ocr.provider",
            format!("Unknown OCR provider '{provider}'. Use 'textract' or 'static'"),
        );
        return;
    }
    if provider == "textract" && ocr.endpoint.as_deref().map(str::trim).unwrap_or("").is_empty() {
        report.warn(
            "ocr.endpoint",
            "The textract provider has no endpoint; the gateway cannot start until one is set",
        );
    }
    if provider == "static" && ocr.static_lines.is_empty() {
        report.warn("ocr.staticLines", "Static provider has no lines; every image yields empty text");
    }
}

fn validate_client(config: &TextSnapConfig, report: &mut ValidationReport) {
    let Some(client) = &config.client else { return };
    if client.max_image_bytes == Some(0) {
        report.error("client.maxImageBytes", "maxImageBytes must be > 0");
    }
    if client.notification_ttl_ms == Some(0) {
        report.error("client.notificationTtlMs", "notificationTtlMs must be > 0");
    }
    if client.gateway_port == Some(0) {
        report.error("client.gatewayPort", "gatewayPort must be > 0");
    }

    // base64 inflates by 4/3; the gateway must accept the largest valid image.
    let max_image = client.effective_max_image_bytes();
    let encoded = max_image.div_ceil(3) * 4;
    let body_limit = config.gateway().effective_body_limit() as u64;
    if body_limit < encoded {
        report.warn(
            "gateway.bodyLimitBytes",
            format!(
                "bodyLimitBytes ({body_limit}) is below the encoded size of the largest accepted image ({encoded})"
            ),
        );
    }
}
