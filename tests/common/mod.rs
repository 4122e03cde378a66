// tests/common/mod.rs — mock collaborators for pipeline tests.
// Each integration test binary pulls in what it needs.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use article_relay::catalog::{SourceCatalog, SourceIndex};
use article_relay::fetcher::FetchArticle;
use article_relay::ledger::Ledger;
use article_relay::pipeline::PipelineController;
use article_relay::publisher::Publish;
use article_relay::translate::Translate;
use article_relay::{RelayError, StagedArticle};

pub const MEDIA_ID: u64 = 7;
pub const POST_ID: u64 = 42;

/// An article whose fields are derived from its identifier.
pub fn article(id: &str) -> StagedArticle {
    StagedArticle {
        source_id: id.to_string(),
        title: "T".into(),
        summary: "S".into(),
        cover_image_url: "C".into(),
        body_text: "B".into(),
    }
}

/// Index that always returns the same identifiers.
pub struct StaticIndex(pub Vec<String>);

#[async_trait]
impl SourceIndex for StaticIndex {
    async fn fetch_index(&self) -> Result<Vec<String>, RelayError> {
        Ok(self.0.clone())
    }
}

/// Index that returns a different listing on each call, then repeats the
/// last one. Lets tests model an index that gained a newer entry between
/// two fetch-next commands.
pub struct SequenceIndex {
    listings: Mutex<VecDeque<Vec<String>>>,
    last: Mutex<Vec<String>>,
}

impl SequenceIndex {
    pub fn new(listings: Vec<Vec<&str>>) -> Self {
        let listings: VecDeque<Vec<String>> = listings
            .into_iter()
            .map(|l| l.into_iter().map(str::to_string).collect())
            .collect();
        Self {
            listings: Mutex::new(listings),
            last: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SourceIndex for SequenceIndex {
    async fn fetch_index(&self) -> Result<Vec<String>, RelayError> {
        let mut listings = self.listings.lock().unwrap();
        if let Some(next) = listings.pop_front() {
            *self.last.lock().unwrap() = next.clone();
            Ok(next)
        } else {
            Ok(self.last.lock().unwrap().clone())
        }
    }
}

pub struct BrokenIndex;

#[async_trait]
impl SourceIndex for BrokenIndex {
    async fn fetch_index(&self) -> Result<Vec<String>, RelayError> {
        Err(RelayError::CatalogFetch("connection refused".into()))
    }
}

/// Fetcher that derives articles from identifiers; ids listed in
/// `missing_cover` fail extraction instead.
pub struct MockFetcher {
    pub missing_cover: Vec<String>,
}

impl MockFetcher {
    pub fn ok() -> Self {
        Self {
            missing_cover: Vec::new(),
        }
    }
}

#[async_trait]
impl FetchArticle for MockFetcher {
    async fn fetch(&self, id: &str) -> Result<StagedArticle, RelayError> {
        if self.missing_cover.iter().any(|m| m == id) {
            return Err(RelayError::Extraction { field: "cover" });
        }
        Ok(article(id))
    }
}

/// Translator that prefixes the target language, so tests can assert the
/// publisher received translated text.
pub struct PrefixTranslator;

#[async_trait]
impl Translate for PrefixTranslator {
    async fn translate(&self, text: &str) -> Result<String, RelayError> {
        Ok(format!("ru:{text}"))
    }
}

pub struct FailingTranslator;

#[async_trait]
impl Translate for FailingTranslator {
    async fn translate(&self, _text: &str) -> Result<String, RelayError> {
        Err(RelayError::Translation("backend unavailable".into()))
    }
}

/// Publisher double with switchable failure points and a shared call log
/// the test keeps a handle to after the pipeline takes ownership.
pub struct MockPublisher {
    pub fail_upload: bool,
    pub fail_post: bool,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockPublisher {
    pub fn ok() -> Self {
        Self {
            fail_upload: false,
            fail_post: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_post() -> Self {
        Self {
            fail_post: true,
            ..Self::ok()
        }
    }

    pub fn log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Publish for MockPublisher {
    async fn upload_image(
        &self,
        image_url: &str,
        title: &str,
        description: &str,
    ) -> Result<u64, RelayError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("upload:{image_url}:{title}:{description}"));
        if self.fail_upload {
            return Err(RelayError::ImageUpload("media endpoint down".into()));
        }
        Ok(MEDIA_ID)
    }

    async fn create_post(
        &self,
        title: &str,
        content: &str,
        featured_media: u64,
    ) -> Result<u64, RelayError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("post:{title}:{content}:{featured_media}"));
        if self.fail_post {
            return Err(RelayError::PostCreation {
                orphaned_media: None,
                message: "expected 201, got 500".into(),
            });
        }
        Ok(POST_ID)
    }

    fn edit_url(&self, post_id: u64) -> String {
        format!("https://dest.test/wp-admin/post.php?post={post_id}&action=edit")
    }
}

/// A pipeline over mocks plus the temp dir its ledger lives in; `seed`
/// identifiers are recorded as already published before the run.
pub fn pipeline_with(
    index: Box<dyn SourceIndex>,
    fetcher: Box<dyn FetchArticle>,
    translator: Box<dyn Translate>,
    publisher: Box<dyn Publish>,
    seed: &[&str],
) -> (PipelineController, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let mut ledger = Ledger::open(dir.path().join("published.txt")).unwrap();
    for id in seed {
        ledger.record(id).unwrap();
    }
    let pipeline = PipelineController::new(
        SourceCatalog::new(index),
        fetcher,
        translator,
        publisher,
        ledger,
    );
    (pipeline, dir)
}

/// Read the on-disk ledger back, for asserting what actually got durable.
pub fn ledger_lines(dir: &tempfile::TempDir) -> Vec<String> {
    match std::fs::read_to_string(dir.path().join("published.txt")) {
        Ok(content) => content.lines().map(str::to_string).collect(),
        Err(_) => Vec::new(),
    }
}
