//! fetcher.rs — retrieval and extraction of one article's fields.
//!
//! Title, summary and cover come from the page's `og:` meta tags; the body
//! is the text of the `<article>` container. Extraction is all-or-nothing:
//! a `StagedArticle` with a missing field is never produced.

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use scraper::{Html, Selector};

use crate::types::StagedArticle;
use crate::{RelayError, Result};

#[async_trait]
pub trait FetchArticle: Send + Sync {
    /// Retrieve the page at `id` and extract the four required fields.
    /// Pure with respect to the ledger and the staging buffer.
    async fn fetch(&self, id: &str) -> Result<StagedArticle>;
}

pub struct HttpArticleFetcher {
    client: reqwest::Client,
}

impl HttpArticleFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FetchArticle for HttpArticleFetcher {
    async fn fetch(&self, id: &str) -> Result<StagedArticle> {
        let resp = self
            .client
            .get(id)
            .send()
            .await
            .map_err(|e| RelayError::Fetch {
                url: id.to_string(),
                message: e.to_string(),
            })?;
        let resp = resp.error_for_status().map_err(|e| RelayError::Fetch {
            url: id.to_string(),
            message: e.to_string(),
        })?;
        let html = resp.text().await.map_err(|e| RelayError::Fetch {
            url: id.to_string(),
            message: format!("reading body: {e}"),
        })?;
        extract_article(id, &html)
    }
}

/// Extract the four required fields from an article page.
/// Kept separate from the HTTP side so it can be tested on fixtures.
pub fn extract_article(source_id: &str, html: &str) -> Result<StagedArticle> {
    let doc = Html::parse_document(html);

    let title = meta_content(&doc, sel_og_title()).ok_or(RelayError::Extraction { field: "title" })?;
    let summary =
        meta_content(&doc, sel_og_description()).ok_or(RelayError::Extraction { field: "summary" })?;
    let cover_image_url =
        meta_content(&doc, sel_og_image()).ok_or(RelayError::Extraction { field: "cover" })?;

    let body_text = doc
        .select(sel_article())
        .next()
        .map(|el| normalize_body(&el.text().collect::<Vec<_>>().join(" ")))
        .filter(|t| !t.is_empty())
        .ok_or(RelayError::Extraction { field: "body" })?;

    tracing::debug!(
        source = source_id,
        title = %title,
        body_chars = body_text.chars().count(),
        "article extracted"
    );

    Ok(StagedArticle {
        source_id: source_id.to_string(),
        title,
        summary,
        cover_image_url,
        body_text,
    })
}

fn meta_content(doc: &Html, sel: &Selector) -> Option<String> {
    doc.select(sel)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

/// Collapse runs of whitespace, keeping plain text suitable as post content.
fn normalize_body(s: &str) -> String {
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    let decoded = html_escape::decode_html_entities(s);
    re_ws.replace_all(decoded.trim(), " ").to_string()
}

fn sel_og_title() -> &'static Selector {
    static SEL: OnceCell<Selector> = OnceCell::new();
    SEL.get_or_init(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap())
}

fn sel_og_description() -> &'static Selector {
    static SEL: OnceCell<Selector> = OnceCell::new();
    SEL.get_or_init(|| Selector::parse(r#"meta[property="og:description"]"#).unwrap())
}

fn sel_og_image() -> &'static Selector {
    static SEL: OnceCell<Selector> = OnceCell::new();
    SEL.get_or_init(|| Selector::parse(r#"meta[property="og:image"]"#).unwrap())
}

fn sel_article() -> &'static Selector {
    static SEL: OnceCell<Selector> = OnceCell::new();
    SEL.get_or_init(|| Selector::parse("article").unwrap())
}
