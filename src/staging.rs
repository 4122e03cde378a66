//! staging.rs — single-slot buffer for the fetched-but-uncommitted article.
//!
//! Zero or one `StagedArticle`. A second `stage` replaces the first (the
//! newest candidate supersedes an uncommitted one) and the evicted
//! identifier is returned so the caller can report it. Not synchronized;
//! the command router serializes access.

use crate::types::{SourceId, StagedArticle};
use crate::{RelayError, Result};

#[derive(Debug, Default)]
pub struct StagingBuffer {
    slot: Option<StagedArticle>,
}

impl StagingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an article, returning the identifier of the one it replaced.
    pub fn stage(&mut self, article: StagedArticle) -> Option<SourceId> {
        let discarded = self.slot.replace(article).map(|prev| prev.source_id);
        if let Some(id) = &discarded {
            tracing::warn!(discarded = %id, "staged article replaced before commit");
        }
        discarded
    }

    /// Remove and return the staged article. The only way the buffer is
    /// emptied on the commit path.
    pub fn take(&mut self) -> Result<StagedArticle> {
        self.slot.take().ok_or(RelayError::NothingStaged)
    }

    pub fn peek(&self) -> Option<&StagedArticle> {
        self.slot.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: &str) -> StagedArticle {
        StagedArticle {
            source_id: id.to_string(),
            title: "T".into(),
            summary: "S".into(),
            cover_image_url: "C".into(),
            body_text: "B".into(),
        }
    }

    #[test]
    fn take_on_empty_buffer_fails() {
        let mut buf = StagingBuffer::new();
        assert!(matches!(buf.take(), Err(RelayError::NothingStaged)));
    }

    #[test]
    fn stage_take_round_trip_empties_the_slot() {
        let mut buf = StagingBuffer::new();
        assert!(buf.stage(article("a")).is_none());
        assert_eq!(buf.take().unwrap().source_id, "a");
        assert!(buf.peek().is_none());
    }

    #[test]
    fn restage_replaces_and_reports_the_discarded_id() {
        let mut buf = StagingBuffer::new();
        buf.stage(article("a"));
        let discarded = buf.stage(article("b"));
        assert_eq!(discarded.as_deref(), Some("a"));
        // only the most recently staged article is visible
        assert_eq!(buf.peek().unwrap().source_id, "b");
    }
}
