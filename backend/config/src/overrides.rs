//! `TEXTSNAP_*` environment overrides, applied after the file is loaded.

use std::collections::HashMap;

use tracing::warn;

use crate::schema::{ClientConfig, GatewayConfig, LoggingConfig, OcrConfig, TextSnapConfig};

/// Apply overrides from the process environment.
pub fn apply_process_env_overrides(config: TextSnapConfig) -> TextSnapConfig {
    apply_env_overrides(config, &std::env::vars().collect())
}

/// Apply overrides from the given variable map.
pub fn apply_env_overrides(
    mut config: TextSnapConfig,
    env: &HashMap<String, String>,
) -> TextSnapConfig {
    let var = |name: &str| env.get(name).filter(|v| !v.is_empty()).cloned();

    if let Some(bind) = var("TEXTSNAP_BIND") {
        config.gateway.get_or_insert_with(GatewayConfig::default).bind = Some(bind);
    }
    if let Some(port) = var("TEXTSNAP_PORT") {
        match port.parse::<u16>() {
            Ok(p) => config.gateway.get_or_insert_with(GatewayConfig::default).port = Some(p),
            Err(_) => warn!(value = %port, "Ignoring unparsable TEXTSNAP_PORT"),
        }
    }

    if let Some(provider) = var("TEXTSNAP_OCR_PROVIDER") {
        config.ocr.get_or_insert_with(OcrConfig::default).provider = Some(provider);
    }
    if let Some(endpoint) = var("TEXTSNAP_OCR_ENDPOINT") {
        config.ocr.get_or_insert_with(OcrConfig::default).endpoint = Some(endpoint);
    }
    if let Some(token) = var("TEXTSNAP_OCR_TOKEN") {
        config.ocr.get_or_insert_with(OcrConfig::default).api_token = Some(token);
    }

    if let Some(url) = var("TEXTSNAP_GATEWAY_URL") {
        config.client.get_or_insert_with(ClientConfig::default).gateway_url = Some(url);
    }

    if let Some(level) = var("RUST_LOG") {
        config.logging.get_or_insert_with(LoggingConfig::default).level = Some(level);
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_overrides_win_over_file_values() {
        let mut config = TextSnapConfig::default();
        config.gateway = Some(GatewayConfig {
            port: Some(8000),
            ..Default::default()
        });
        let config = apply_env_overrides(
            config,
            &env(&[
                ("TEXTSNAP_PORT", "9001"),
                ("TEXTSNAP_OCR_PROVIDER", "static"),
                ("TEXTSNAP_GATEWAY_URL", "http://ocr.internal:8000"),
            ]),
        );
        assert_eq!(config.gateway().effective_port(), 9001);
        assert_eq!(config.ocr().effective_provider(), "static");
        assert_eq!(
            config.client().gateway_url.as_deref(),
            Some("http://ocr.internal:8000")
        );
    }

    #[test]
    fn test_bad_port_is_ignored() {
        let config = apply_env_overrides(TextSnapConfig::default(), &env(&[("TEXTSNAP_PORT", "http")]));
        assert!(config.gateway.is_none());
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let config = apply_env_overrides(TextSnapConfig::default(), &env(&[("TEXTSNAP_BIND", "")]));
        assert!(config.gateway.is_none());
    }
}
