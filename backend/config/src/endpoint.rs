//! Gateway base URL resolution for clients.
//!
//! A client running on the gateway's own machine talks to `localhost`; one
//! reached over the LAN talks to the host it was reached by. An explicit URL
//! overrides both.

use crate::schema::ClientConfig;

/// Base URL for a gateway reached through `hostname`.
pub fn resolve_gateway_url_for_host(hostname: &str, port: u16) -> String {
    let host = hostname.trim();
    if host.is_empty() || host.eq_ignore_ascii_case("localhost") {
        return format!("http://localhost:{port}");
    }
    format!("http://{host}:{port}")
}

/// Base URL the client should send `/ocr` requests to, without a trailing slash.
pub fn resolve_gateway_url(client: &ClientConfig) -> String {
    match client.gateway_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
        _ => resolve_gateway_url_for_host(client.effective_host(), client.effective_port()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localhost_resolves_locally() {
        assert_eq!(resolve_gateway_url_for_host("localhost", 8000), "http://localhost:8000");
    }

    #[test]
    fn test_lan_host_is_reused() {
        assert_eq!(
            resolve_gateway_url_for_host("192.168.1.42", 8000),
            "http://192.168.1.42:8000"
        );
    }

    #[test]
    fn test_explicit_url_wins() {
        let client = ClientConfig {
            gateway_url: Some("https://ocr.example.com/".into()),
            gateway_host: Some("10.0.0.2".into()),
            ..Default::default()
        };
        assert_eq!(resolve_gateway_url(&client), "https://ocr.example.com");
    }

    #[test]
    fn test_default_client_config() {
        assert_eq!(resolve_gateway_url(&ClientConfig::default()), "http://localhost:8000");
    }
}
