//! Error types for the relay pipeline.
//!
//! Every remote step of the commit protocol fails with its own kind so the
//! operator can tell what state the system is in afterwards. Collaborator
//! impls use `anyhow` internally and convert to these kinds at the boundary.

use thiserror::Error;

/// What the operator should do after a failed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Recovery {
    /// The command changed nothing; re-issue it whenever.
    NothingHappened,
    /// The staged article was consumed but nothing durable changed;
    /// re-run fetch-next and commit again.
    SafeToRetry,
    /// A destination-side asset was created without a post referencing it.
    NeedsManualCleanup,
    /// The destination post exists but the ledger was not updated;
    /// the identifier must be appended by hand or the next commit can
    /// publish a duplicate.
    NeedsLedgerEntry,
}

#[derive(Debug, Error)]
pub enum RelayError {
    /// The remote index could not be retrieved or parsed.
    #[error("catalog fetch failed: {0}")]
    CatalogFetch(String),

    /// Every identifier in the index is already in the ledger.
    #[error("no unseen candidate in the source index")]
    NoCandidate,

    /// Transport/HTTP failure while retrieving an article page.
    #[error("article fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    /// A required field was missing from the article page.
    #[error("extraction failed: missing {field}")]
    Extraction { field: &'static str },

    /// Commit was requested with an empty staging buffer.
    #[error("nothing staged")]
    NothingStaged,

    /// The translation backend rejected or failed a request.
    #[error("translation failed: {0}")]
    Translation(String),

    /// The media upload step failed; nothing durable changed.
    #[error("image upload failed: {0}")]
    ImageUpload(String),

    /// Post creation failed. When `orphaned_media` is set, the upload
    /// step had already succeeded and that asset is now unreferenced.
    #[error("post creation failed: {message}")]
    PostCreation {
        orphaned_media: Option<u64>,
        message: String,
    },

    /// The ledger append failed. With `after_publish` the destination
    /// post is live and `post_id` identifies it.
    #[error("ledger write failed: {message}")]
    LedgerWrite {
        after_publish: bool,
        post_id: Option<u64>,
        message: String,
    },
}

impl RelayError {
    pub fn recovery(&self) -> Recovery {
        match self {
            Self::CatalogFetch(_)
            | Self::NoCandidate
            | Self::Fetch { .. }
            | Self::Extraction { .. }
            | Self::NothingStaged => Recovery::NothingHappened,
            Self::Translation(_) | Self::ImageUpload(_) => Recovery::SafeToRetry,
            Self::PostCreation {
                orphaned_media: Some(_),
                ..
            } => Recovery::NeedsManualCleanup,
            Self::PostCreation { .. } => Recovery::SafeToRetry,
            Self::LedgerWrite {
                after_publish: true,
                ..
            } => Recovery::NeedsLedgerEntry,
            Self::LedgerWrite { .. } => Recovery::SafeToRetry,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RelayError>;
