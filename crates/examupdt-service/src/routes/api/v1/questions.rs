use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    routing::get,
};
use examupdt_core::content::Question;
use serde_json::{Value, json};
use tracing::instrument;

use super::ListParams;
use crate::AppState;
use crate::errors::ApiError;

#[instrument(skip_all)]
async fn list_questions<S: AppState>(
    State(state): State<S>,
    params: Result<Query<BTreeMap<String, String>>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params?;
    let params = ListParams::parse::<Question>(params)?;
    let questions = state.repository::<Question>().get_all().await?;
    Ok(params.respond("questions", questions, |question| question))
}

#[instrument(skip_all, fields(id = %id))]
async fn get_question<S: AppState>(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let question = state
        .repository::<Question>()
        .increment(&id, "views")
        .await?;
    Ok(Json(json!({ "success": true, "question": question })))
}

pub fn router<S: AppState>() -> Router<S> {
    Router::new()
        .route("/questions", get(list_questions::<S>))
        .route("/questions/{id}", get(get_question::<S>))
}
