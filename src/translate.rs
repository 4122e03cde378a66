//! translate.rs — text-to-text translation boundary.
//!
//! The language pair is fixed at construction for the process lifetime.
//! The production implementation talks to a LibreTranslate-compatible
//! endpoint; tests substitute the trait.

use anyhow::{Context, Result as AnyResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{RelayError, Result};

#[async_trait]
pub trait Translate: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String>;
}

pub struct RestTranslator {
    endpoint: String,
    api_key: Option<String>,
    from: String,
    to: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl RestTranslator {
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        from: String,
        to: String,
        client: reqwest::Client,
    ) -> Self {
        Self {
            endpoint,
            api_key,
            from,
            to,
            client,
        }
    }

    async fn request(&self, text: &str) -> AnyResult<String> {
        let body = TranslateRequest {
            q: text,
            source: &self.from,
            target: &self.to,
            format: "text",
            api_key: self.api_key.as_deref(),
        };
        let resp: TranslateResponse = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .context("translate post")?
            .error_for_status()
            .context("translate non-2xx")?
            .json()
            .await
            .context("translate response body")?;
        Ok(resp.translated_text)
    }
}

#[async_trait]
impl Translate for RestTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        // Tolerate whitespace-only input without a round trip.
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }
        self.request(text)
            .await
            .map_err(|e| RelayError::Translation(format!("{e:#}")))
    }
}
