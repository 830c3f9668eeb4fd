use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;
use examupdt_core::content::{ContactMessage, ExamResult, Note, Post};
use examupdt_core::views::DashboardStats;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::AppState;
use crate::errors::ApiError;
use crate::routes::extractors::Authenticated;

#[instrument(skip_all)]
async fn dashboard<S: AppState>(
    State(state): State<S>,
    _auth: Authenticated,
) -> Result<Json<Value>, ApiError> {
    let post_repo = state.repository::<Post>();
    let result_repo = state.repository::<ExamResult>();
    let note_repo = state.repository::<Note>();
    let message_repo = state.repository::<ContactMessage>();
    let (posts, results, notes, messages) = tokio::try_join!(
        post_repo.get_all(),
        result_repo.get_all(),
        note_repo.get_all(),
        message_repo.get_all(),
    )?;
    debug!(
        posts = posts.len(),
        results = results.len(),
        notes = notes.len(),
        messages = messages.len(),
        "Loaded dashboard sources"
    );

    let stats = DashboardStats::compute(&posts, &results, &notes, &messages, Utc::now());
    Ok(Json(json!({ "success": true, "analytics": stats })))
}

pub fn router<S: AppState>() -> Router<S> {
    Router::new().route("/analytics", get(dashboard::<S>))
}
