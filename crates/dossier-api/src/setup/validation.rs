//! Configuration validation
//!
//! Checks that need the whole process context on top of `Config::validate`.

use anyhow::Result;
use dossier_core::Config;

pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let is_production = config.is_production();
    let env_var = std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .ok();

    if is_production && env_var.is_none() {
        tracing::warn!(
            "Production mode detected but ENVIRONMENT/APP_ENV not set - error details may leak"
        );
    }

    if is_production && config.cors_origins().iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production. \
            Set specific allowed origins via the CORS_ORIGINS environment variable."
        ));
    }

    if config.db_max_connections() == 0 {
        return Err(anyhow::anyhow!("Database max connections cannot be 0"));
    }

    if config.db_timeout_seconds() == 0 {
        return Err(anyhow::anyhow!("Database timeout cannot be 0"));
    }

    if config.session_ttl_hours() <= 0 {
        return Err(anyhow::anyhow!("SESSION_TTL_HOURS must be greater than zero"));
    }

    if config.max_inline_payload_bytes() > config.max_upload_bytes() {
        tracing::warn!(
            max_inline_payload_bytes = config.max_inline_payload_bytes(),
            max_upload_bytes = config.max_upload_bytes(),
            "Inline payload cap exceeds the upload limit - every accepted document is stored inline"
        );
    }

    tracing::info!("Configuration validation passed");
    Ok(())
}
