use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_AUTH_URL: &str = "http://localhost:5000";
const DEFAULT_TOKEN_FILE: &str = ".cvchecker/session.json";

/// Client configuration loaded from environment variables.
///
/// The analysis API and the auth API are configured independently and may
/// live on different hosts.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub auth_url: String,
    pub token_file: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_url: base_url_env("CVCHECKER_API_URL", DEFAULT_API_URL)?,
            auth_url: base_url_env("CVCHECKER_AUTH_URL", DEFAULT_AUTH_URL)?,
            token_file: std::env::var("CVCHECKER_TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_TOKEN_FILE)),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn base_url_env(key: &str, default: &str) -> Result<String> {
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    normalize_base_url(&raw).with_context(|| format!("Environment variable '{key}' is invalid"))
}

/// Validates an http(s) base URL and strips trailing slashes so that
/// `{base}/api/...` never doubles the separator.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).with_context(|| format!("'{trimmed}' is not a valid URL"))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        bail!("'{trimmed}' must use http or https");
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
