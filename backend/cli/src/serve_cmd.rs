//! `textsnap serve`: run the OCR gateway.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tracing::info;

use textsnap_config::TextSnapConfig;
use textsnap_gateway::{start_server, GatewayState};
use textsnap_ocr::backend_from_config;

pub async fn run(config: &TextSnapConfig, port: Option<u16>) -> Result<()> {
    let gateway = config.gateway();
    let port = port.unwrap_or_else(|| gateway.effective_port());
    let addr: SocketAddr = format!("{}:{}", gateway.effective_bind(), port)
        .parse()
        .with_context(|| format!("invalid bind address '{}'", gateway.effective_bind()))?;

    let backend = backend_from_config(&config.ocr())?;
    info!(
        addr = %addr,
        backend = backend.name(),
        body_limit = gateway.effective_body_limit(),
        "Starting TextSnap gateway"
    );

    start_server(addr, GatewayState::new(backend, gateway.effective_body_limit())).await
}
