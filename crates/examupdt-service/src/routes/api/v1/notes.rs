use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use examupdt_core::content::Note;
use examupdt_core::listing::is_unconstrained;
use examupdt_core::views::NoteView;
use serde_json::Value;
use tracing::instrument;

use super::ListParams;
use crate::AppState;
use crate::errors::ApiError;

#[instrument(skip_all)]
async fn list_notes<S: AppState>(
    State(state): State<S>,
    params: Result<Query<BTreeMap<String, String>>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(mut params) = params?;
    let semester = params.remove("semester").unwrap_or_default();
    let params = ListParams::parse::<Note>(params)?;

    let mut notes = state.repository::<Note>().get_all().await?;
    if !is_unconstrained(&semester) {
        let needle = semester.to_lowercase();
        notes.retain(|note| note.subject.to_lowercase().contains(&needle));
    }

    Ok(params.respond("notes", notes, |note| NoteView::from(&note)))
}

pub fn router<S: AppState>() -> Router<S> {
    Router::new().route("/notes", get(list_notes::<S>))
}
