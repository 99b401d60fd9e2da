//! Config defaults: applies default values to parsed config.

use crate::schema::{ClientConfig, GatewayConfig, LoggingConfig, OcrConfig, TextSnapConfig};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// The gateway listens on, and clients dial, this port by default.
pub const DEFAULT_GATEWAY_PORT: u16 = 8000;

/// 15 MiB: a 10 MiB image grows by a third once base64-encoded.
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 15 * 1024 * 1024;

pub const DEFAULT_OCR_PROVIDER: &str = "textract";

pub const DEFAULT_GATEWAY_HOST: &str = "localhost";

/// 10 MiB upload ceiling.
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

pub const DEFAULT_NOTIFICATION_TTL_MS: u64 = 4_000;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: TextSnapConfig) -> TextSnapConfig {
    let config = apply_gateway_defaults(config);
    let config = apply_ocr_defaults(config);
    let config = apply_client_defaults(config);
    apply_logging_defaults(config)
}

fn apply_gateway_defaults(mut config: TextSnapConfig) -> TextSnapConfig {
    let gateway = config.gateway.get_or_insert_with(GatewayConfig::default);
    gateway.bind.get_or_insert_with(|| DEFAULT_BIND_ADDRESS.to_string());
    gateway.port.get_or_insert(DEFAULT_GATEWAY_PORT);
    gateway.body_limit_bytes.get_or_insert(DEFAULT_BODY_LIMIT_BYTES);
    config
}

fn apply_ocr_defaults(mut config: TextSnapConfig) -> TextSnapConfig {
    let ocr = config.ocr.get_or_insert_with(OcrConfig::default);
    ocr.provider.get_or_insert_with(|| DEFAULT_OCR_PROVIDER.to_string());
    config
}

fn apply_client_defaults(mut config: TextSnapConfig) -> TextSnapConfig {
    let client = config.client.get_or_insert_with(ClientConfig::default);
    client.gateway_host.get_or_insert_with(|| DEFAULT_GATEWAY_HOST.to_string());
    client.gateway_port.get_or_insert(DEFAULT_GATEWAY_PORT);
    client.max_image_bytes.get_or_insert(DEFAULT_MAX_IMAGE_BYTES);
    client.notification_ttl_ms.get_or_insert(DEFAULT_NOTIFICATION_TTL_MS);
    config
}

fn apply_logging_defaults(mut config: TextSnapConfig) -> TextSnapConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging.level.get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    logging.json.get_or_insert(false);
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_every_section() {
        let config = apply_all_defaults(TextSnapConfig::default());
        let gateway = config.gateway.unwrap();
        assert_eq!(gateway.port, Some(DEFAULT_GATEWAY_PORT));
        assert_eq!(gateway.body_limit_bytes, Some(DEFAULT_BODY_LIMIT_BYTES));
        assert_eq!(config.ocr.unwrap().provider.as_deref(), Some("textract"));
        assert_eq!(config.client.unwrap().max_image_bytes, Some(10_485_760));
        assert_eq!(config.logging.unwrap().json, Some(false));
    }

    #[test]
    fn test_defaults_keep_explicit_values() {
        let mut config = TextSnapConfig::default();
        config.gateway = Some(GatewayConfig {
            port: Some(9100),
            ..Default::default()
        });
        let config = apply_all_defaults(config);
        assert_eq!(config.gateway.unwrap().port, Some(9100));
    }
}
