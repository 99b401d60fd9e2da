//! `textsnap-config`: TextSnap runtime configuration management.
//!
//! Provides:
//! - Typed config schema (gateway, OCR backend, client, logging)
//! - YAML loading from the config directory
//! - `${ENV_VAR}` substitution
//! - `TEXTSNAP_*` environment overrides
//! - Default value application
//! - Validation with path-qualified errors and warnings
//! - Gateway base URL resolution for clients

pub mod defaults;
pub mod endpoint;
pub mod env;
pub mod io;
pub mod overrides;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use defaults::apply_all_defaults;
pub use endpoint::{resolve_gateway_url, resolve_gateway_url_for_host};
pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config};
pub use overrides::{apply_env_overrides, apply_process_env_overrides};
pub use schema::{ClientConfig, GatewayConfig, LoggingConfig, OcrConfig, TextSnapConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::Path;

/// Load, apply env substitution and overrides, apply defaults, and validate a
/// config file.
///
/// This is the main entry point for loading a config at runtime. Validation
/// warnings are logged; validation errors fail the load.
pub async fn load_and_prepare(path: &Path) -> Result<TextSnapConfig> {
    let raw_config = load_config(path).await?;

    // Serialize to Value for the env substitution pass.
    let value: Value = serde_json::to_value(&raw_config)
        .context("Failed to serialize config for processing")?;

    // Substitute ${VAR} env vars.
    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;

    let config: TextSnapConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_process_env_overrides(config);
    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if !report.is_valid() {
        bail!(
            "invalid configuration at {}: {}",
            path.display(),
            report
                .errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        );
    }

    Ok(config)
}
