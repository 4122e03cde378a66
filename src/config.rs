// src/config.rs
use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_LEDGER_PATH: &str = "published.txt";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration, read once at startup from the environment
/// (`.env` is loaded by the binary before this runs).
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Remote index listing candidate article URLs.
    pub sitemap_url: String,
    /// Durable dedup ledger, one identifier per line.
    pub ledger_path: PathBuf,
    pub site_url: String,
    pub wp_login: String,
    pub wp_password: String,
    pub translate_url: String,
    pub translate_api_key: Option<String>,
    pub lang_from: String,
    pub lang_to: String,
    pub http_timeout: Duration,
    pub bind_addr: String,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self> {
        let timeout_secs = env_or("RELAY_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| anyhow!("RELAY_HTTP_TIMEOUT_SECS must be an integer"))?;

        Ok(Self {
            sitemap_url: required("RELAY_SITEMAP_URL")?,
            ledger_path: PathBuf::from(env_or("RELAY_LEDGER_PATH", DEFAULT_LEDGER_PATH.into())),
            site_url: required("WORDPRESS_SITE_URL")?
                .trim_end_matches('/')
                .to_string(),
            wp_login: required("WORDPRESS_LOGIN")?,
            wp_password: required("WORDPRESS_PASSWORD")?,
            translate_url: required("TRANSLATE_API_URL")?,
            translate_api_key: std::env::var("TRANSLATE_API_KEY").ok(),
            lang_from: env_or("TRANSLATE_FROM", "en".into()),
            lang_to: env_or("TRANSLATE_TO", "ru".into()),
            http_timeout: Duration::from_secs(timeout_secs),
            bind_addr: env_or("RELAY_BIND_ADDR", DEFAULT_BIND_ADDR.into()),
        })
    }
}

fn required(key: &str) -> Result<String> {
    let v = std::env::var(key).map_err(|_| anyhow!("missing {key}"))?;
    if v.trim().is_empty() {
        return Err(anyhow!("{key} is empty"));
    }
    Ok(v)
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).ok().filter(|v| !v.is_empty()).unwrap_or(default)
}
