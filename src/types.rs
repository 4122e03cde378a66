// src/types.rs

/// Opaque identifier of one source article (its URL). Exact string equality.
pub type SourceId = String;

/// One article's extracted fields, held between fetch and commit.
/// All fields are non-empty once staged; staging is all-or-nothing.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct StagedArticle {
    pub source_id: SourceId,
    pub title: String,
    pub summary: String,
    pub cover_image_url: String,
    pub body_text: String,
}

/// Result of a successful commit, reported back to the operator.
/// The destination CMS is the system of record; nothing here is persisted.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PublishedPost {
    pub post_id: u64,
    pub media_id: u64,
    pub edit_url: String,
}

/// Result of a fetch-next command.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FetchOutcome {
    pub staged: SourceId,
    pub title: String,
    /// Identifier of a previously staged article that was replaced, if any.
    pub discarded: Option<SourceId>,
}
