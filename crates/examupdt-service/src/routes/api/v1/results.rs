use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use examupdt_core::content::ExamResult;
use examupdt_core::format::parse_exam_filter;
use examupdt_core::views::ResultView;
use serde_json::Value;
use tracing::{debug, instrument};

use super::ListParams;
use crate::AppState;
use crate::errors::ApiError;

/// Keeps results whose semester contains `semester`, ignoring case.
fn in_semester(results: Vec<ExamResult>, semester: &str) -> Vec<ExamResult> {
    if semester.is_empty() {
        return results;
    }
    let needle = semester.to_lowercase();
    results
        .into_iter()
        .filter(|result| result.semester.to_lowercase().contains(&needle))
        .collect()
}

#[instrument(skip_all)]
async fn list_results<S: AppState>(
    State(state): State<S>,
    params: Result<Query<BTreeMap<String, String>>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(mut params) = params?;
    let exam = params.remove("exam").unwrap_or_default();

    let mut semester = String::new();
    if let Some((exam_type, sem)) = parse_exam_filter(&exam) {
        debug!(exam_type, semester = sem, "Filtering results by exam");
        params.insert("exam_type".to_string(), exam_type.to_string());
        semester = sem.to_string();
    }
    let params = ListParams::parse::<ExamResult>(params)?;

    let results = state.repository::<ExamResult>().get_all().await?;
    let results = in_semester(results, &semester);

    Ok(params.respond("results", results, |result| ResultView::from(&result)))
}

pub fn router<S: AppState>() -> Router<S> {
    Router::new().route("/results", get(list_results::<S>))
}
