//! catalog.rs — discovery of the next unseen candidate.
//!
//! The remote index is a sitemap-style XML document; every `<loc>` element
//! holds one absolute article URL. Document order is preserved, not sorted,
//! so "first survivor" means first in index order (typically newest-first).

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::ledger::Ledger;
use crate::types::SourceId;
use crate::{RelayError, Result};

/// Seam for the remote index so tests can inject index contents.
#[async_trait]
pub trait SourceIndex: Send + Sync {
    /// All identifiers listed by the index, in document order.
    async fn fetch_index(&self) -> Result<Vec<SourceId>>;
}

/// HTTP-backed index: GET the sitemap and collect its `<loc>` entries.
pub struct SitemapIndex {
    url: String,
    client: reqwest::Client,
}

impl SitemapIndex {
    pub fn new(url: String, client: reqwest::Client) -> Self {
        Self { url, client }
    }
}

#[async_trait]
impl SourceIndex for SitemapIndex {
    async fn fetch_index(&self) -> Result<Vec<SourceId>> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| RelayError::CatalogFetch(format!("GET {}: {e}", self.url)))?;
        let resp = resp
            .error_for_status()
            .map_err(|e| RelayError::CatalogFetch(format!("GET {}: {e}", self.url)))?;
        let body = resp
            .text()
            .await
            .map_err(|e| RelayError::CatalogFetch(format!("reading index body: {e}")))?;
        parse_locs(&body)
    }
}

/// Collect the text of every `<loc>` element, in document order.
/// Works for plain url sets and sitemap indexes alike.
pub fn parse_locs(xml: &str) -> Result<Vec<SourceId>> {
    let mut reader = Reader::from_str(xml);
    let mut in_loc = false;
    let mut out = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"loc" => in_loc = true,
            Ok(Event::End(e)) if e.local_name().as_ref() == b"loc" => in_loc = false,
            Ok(Event::Text(t)) if in_loc => {
                let text = t
                    .unescape()
                    .map_err(|e| RelayError::CatalogFetch(format!("bad loc text: {e}")))?;
                let text = text.trim();
                if !text.is_empty() {
                    out.push(text.to_string());
                }
            }
            // some indexes wrap the URL in CDATA
            Ok(Event::CData(t)) if in_loc => {
                let text = String::from_utf8_lossy(&t);
                let text = text.trim();
                if !text.is_empty() {
                    out.push(text.to_string());
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(RelayError::CatalogFetch(format!("parsing index xml: {e}"))),
        }
    }
    Ok(out)
}

/// Produces the next candidate not yet present in the ledger.
pub struct SourceCatalog {
    index: Box<dyn SourceIndex>,
}

impl SourceCatalog {
    pub fn new(index: Box<dyn SourceIndex>) -> Self {
        Self { index }
    }

    /// First identifier in index order that is not in the ledger.
    /// Does not mutate the ledger.
    pub async fn next_candidate(&self, ledger: &Ledger) -> Result<SourceId> {
        let discovered = self.index.fetch_index().await?;
        let total = discovered.len();
        let candidate = discovered.into_iter().find(|id| !ledger.contains(id));
        match candidate {
            Some(id) => {
                tracing::debug!(total, candidate = %id, "candidate selected");
                Ok(id)
            }
            None => {
                tracing::info!(total, "all discovered identifiers already published");
                Err(RelayError::NoCandidate)
            }
        }
    }
}
