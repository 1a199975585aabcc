use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use secrecy::SecretString;

pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;
pub const MIN_PROBE_TIMEOUT_SECS: u64 = 1;
pub const MAX_PROBE_TIMEOUT_SECS: u64 = 60;

const DEFAULT_ALLOWED_ORIGINS: &[&str] = &["http://localhost:3000", "http://localhost:5173"];

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub probe_timeout: Duration,
    pub allowed_origins: Vec<String>,
    /// Default-scope keys that masked submissions resolve against.
    pub sandbox_private_key: Option<SecretString>,
    pub live_private_key: Option<SecretString>,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8094".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;
        let probe_timeout = probe_timeout_from(env::var("ANTOM_PROBE_TIMEOUT_SECONDS").ok().as_deref());
        let allowed_origins = parse_origins(env::var("ADMIN_ALLOWED_ORIGINS").ok().as_deref());
        let sandbox_private_key = normalize_optional(env::var("ANTOM_SANDBOX_MERCHANT_PRIVATE_KEY").ok())
            .map(SecretString::new);
        let live_private_key = normalize_optional(env::var("ANTOM_LIVE_MERCHANT_PRIVATE_KEY").ok())
            .map(SecretString::new);

        Ok(Self {
            host,
            port,
            probe_timeout,
            allowed_origins,
            sandbox_private_key,
            live_private_key,
        })
    }
}

pub fn probe_timeout_from(raw: Option<&str>) -> Duration {
    let secs = raw
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_PROBE_TIMEOUT_SECS)
        .clamp(MIN_PROBE_TIMEOUT_SECS, MAX_PROBE_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

pub fn parse_origins(raw: Option<&str>) -> Vec<String> {
    let origins: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect();
    if origins.is_empty() {
        DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect()
    } else {
        origins
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
