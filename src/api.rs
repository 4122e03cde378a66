//! api.rs — command surface.
//!
//! Two named commands ("fetch next candidate", "commit staged candidate")
//! plus status and health. Commands are serialized through a mutex around
//! the pipeline; a command arriving while another is in flight gets a 409
//! busy reply rather than interleaving against the shared buffer.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tokio::sync::Mutex;

use crate::error::{Recovery, RelayError};
use crate::pipeline::PipelineController;
use crate::types::{FetchOutcome, PublishedPost};

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Mutex<PipelineController>>,
}

impl AppState {
    pub fn new(pipeline: PipelineController) -> Self {
        Self {
            pipeline: Arc::new(Mutex::new(pipeline)),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/commands/fetch-next", post(fetch_next))
        .route("/commands/commit", post(commit))
        .route("/status", get(status))
        .with_state(state)
}

#[derive(serde::Serialize)]
struct ErrorReply {
    error: String,
    state: Recovery,
}

#[derive(serde::Serialize)]
struct BusyReply {
    error: &'static str,
}

type CommandResult<T> = Result<Json<T>, (StatusCode, Json<ErrorReply>)>;

fn reply_error<T>(err: RelayError) -> CommandResult<T> {
    let status = match &err {
        RelayError::NoCandidate => StatusCode::NOT_FOUND,
        RelayError::NothingStaged => StatusCode::CONFLICT,
        RelayError::Extraction { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        RelayError::CatalogFetch(_)
        | RelayError::Fetch { .. }
        | RelayError::Translation(_)
        | RelayError::ImageUpload(_)
        | RelayError::PostCreation { .. } => StatusCode::BAD_GATEWAY,
        RelayError::LedgerWrite { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    Err((
        status,
        Json(ErrorReply {
            state: err.recovery(),
            error: err.to_string(),
        }),
    ))
}

fn busy<T>() -> Result<T, (StatusCode, Json<BusyReply>)> {
    Err((
        StatusCode::CONFLICT,
        Json(BusyReply {
            error: "another command is in flight",
        }),
    ))
}

async fn fetch_next(
    State(state): State<AppState>,
) -> Result<CommandResult<FetchOutcome>, (StatusCode, Json<BusyReply>)> {
    let Ok(mut pipeline) = state.pipeline.try_lock() else {
        return busy();
    };
    match pipeline.fetch_next().await {
        Ok(outcome) => Ok(Ok(Json(outcome))),
        Err(e) => Ok(reply_error(e)),
    }
}

async fn commit(
    State(state): State<AppState>,
) -> Result<CommandResult<PublishedPost>, (StatusCode, Json<BusyReply>)> {
    let Ok(mut pipeline) = state.pipeline.try_lock() else {
        return busy();
    };
    match pipeline.commit().await {
        Ok(post) => Ok(Ok(Json(post))),
        Err(e) => Ok(reply_error(e)),
    }
}

#[derive(serde::Serialize)]
struct StagedInfo {
    source_id: String,
    title: String,
}

#[derive(serde::Serialize)]
struct StatusReply {
    staged: Option<StagedInfo>,
    ledger_entries: usize,
}

async fn status(State(state): State<AppState>) -> Json<StatusReply> {
    let pipeline = state.pipeline.lock().await;
    let staged = pipeline.staged().map(|a| StagedInfo {
        source_id: a.source_id.clone(),
        title: a.title.clone(),
    });
    Json(StatusReply {
        staged,
        ledger_entries: pipeline.ledger_len(),
    })
}
