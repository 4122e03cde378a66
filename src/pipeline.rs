//! pipeline.rs — the fetch→stage and stage→commit state machine.
//!
//! One logical pipeline per process. The commit protocol is strictly
//! ordered: take, translate, upload image, create post, record in the
//! ledger. The ledger is written last because a missing ledger entry is
//! the cheapest failure for an operator to repair by hand; a duplicate
//! post would have to be deleted. No step is rolled back and nothing is
//! retried automatically; every failure ends the command and hands
//! control back to the operator.

use metrics::{counter, gauge};

use crate::catalog::SourceCatalog;
use crate::fetcher::FetchArticle;
use crate::ledger::Ledger;
use crate::publisher::Publish;
use crate::staging::StagingBuffer;
use crate::translate::Translate;
use crate::types::{FetchOutcome, PublishedPost, StagedArticle};
use crate::{RelayError, Result};

pub struct PipelineController {
    catalog: SourceCatalog,
    fetcher: Box<dyn FetchArticle>,
    translator: Box<dyn Translate>,
    publisher: Box<dyn Publish>,
    ledger: Ledger,
    staging: StagingBuffer,
}

impl PipelineController {
    pub fn new(
        catalog: SourceCatalog,
        fetcher: Box<dyn FetchArticle>,
        translator: Box<dyn Translate>,
        publisher: Box<dyn Publish>,
        ledger: Ledger,
    ) -> Self {
        gauge!("relay_ledger_entries").set(ledger.len() as f64);
        Self {
            catalog,
            fetcher,
            translator,
            publisher,
            ledger,
            staging: StagingBuffer::new(),
        }
    }

    /// Select the next unseen candidate, fetch it, and stage it. A failure
    /// in catalog or fetcher leaves the buffer exactly as it was.
    pub async fn fetch_next(&mut self) -> Result<FetchOutcome> {
        let outcome = self.fetch_next_inner().await;
        match &outcome {
            Ok(o) => {
                counter!("relay_fetch_total").increment(1);
                tracing::info!(staged = %o.staged, discarded = ?o.discarded, "candidate staged");
            }
            Err(e) => {
                counter!("relay_fetch_failures_total").increment(1);
                tracing::warn!(error = %e, "fetch-next failed");
            }
        }
        outcome
    }

    async fn fetch_next_inner(&mut self) -> Result<FetchOutcome> {
        let id = self.catalog.next_candidate(&self.ledger).await?;
        let article = self.fetcher.fetch(&id).await?;
        let title = article.title.clone();
        let discarded = self.staging.stage(article);
        Ok(FetchOutcome {
            staged: id,
            title,
            discarded,
        })
    }

    /// Run the ordered commit protocol on the staged article.
    ///
    /// Once `take` has executed the article is gone from the buffer whatever
    /// happens next; a failed commit is recovered by re-running fetch-next,
    /// which is safe because the ledger was never updated.
    pub async fn commit(&mut self) -> Result<PublishedPost> {
        let outcome = self.commit_inner().await;
        match &outcome {
            Ok(p) => {
                counter!("relay_commit_total").increment(1);
                gauge!("relay_ledger_entries").set(self.ledger.len() as f64);
                tracing::info!(post_id = p.post_id, media_id = p.media_id, "commit succeeded");
            }
            Err(e) => {
                counter!("relay_commit_failures_total").increment(1);
                match e.recovery() {
                    crate::Recovery::NeedsLedgerEntry | crate::Recovery::NeedsManualCleanup => {
                        tracing::error!(error = %e, recovery = ?e.recovery(), "commit failed");
                    }
                    _ => tracing::warn!(error = %e, "commit failed"),
                }
            }
        }
        outcome
    }

    async fn commit_inner(&mut self) -> Result<PublishedPost> {
        // Step 1: the buffer is empty from here on, success or failure.
        let article = self.staging.take()?;

        // Step 2: translation. Failure here loses the staged article but
        // nothing durable changed on either side.
        let title = self.translator.translate(&article.title).await?;
        let summary = self.translator.translate(&article.summary).await?;
        let body = self.translator.translate(&article.body_text).await?;

        // Step 3: media upload.
        let media_id = self
            .publisher
            .upload_image(&article.cover_image_url, &title, &summary)
            .await?;

        // Step 4: post creation. If this fails the uploaded media asset is
        // orphaned at the destination; flag it so the operator can clean up
        // or finish the post by hand.
        let post_id = match self.publisher.create_post(&title, &body, media_id).await {
            Ok(id) => id,
            Err(RelayError::PostCreation { message, .. }) => {
                return Err(RelayError::PostCreation {
                    orphaned_media: Some(media_id),
                    message,
                })
            }
            Err(other) => return Err(other),
        };

        // Step 5: ledger last. If this fails the destination post is live
        // while the identifier is unrecorded; the next fetch-next can
        // re-surface it, so the operator must append the entry by hand.
        if let Err(e) = self.ledger.record(&article.source_id) {
            return Err(RelayError::LedgerWrite {
                after_publish: true,
                post_id: Some(post_id),
                message: format!("{e:#}"),
            });
        }

        Ok(PublishedPost {
            post_id,
            media_id,
            edit_url: self.publisher.edit_url(post_id),
        })
    }

    /// Non-destructive view of the staged article, for status queries.
    pub fn staged(&self) -> Option<&StagedArticle> {
        self.staging.peek()
    }

    pub fn ledger_len(&self) -> usize {
        self.ledger.len()
    }
}
