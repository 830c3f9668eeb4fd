use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use chrono::Utc;
use examupdt_core::content::{Internship, Job, ListingStatus};
use examupdt_core::views::ListingView;
use examupdt_core::{Record, SortPreset};
use serde_json::{Value, json};
use tracing::{debug, instrument};

use super::ListParams;
use crate::AppState;
use crate::errors::ApiError;

fn active() -> [(String, Value); 1] {
    [(
        "status".to_string(),
        Value::from(ListingStatus::Active.as_str()),
    )]
}

async fn active_records<S: AppState, E: Record>(state: &S) -> Result<Vec<E>, ApiError> {
    let mut records = state.repository::<E>().find_where(&active()).await?;
    let (key, direction) = SortPreset::Newest.resolve::<E>();
    examupdt_core::listing::apply_sort(&mut records, Some(key), direction);
    Ok(records)
}

#[instrument(skip_all)]
async fn list_jobs<S: AppState>(State(state): State<S>) -> Result<Json<Value>, ApiError> {
    let jobs: Vec<Job> = active_records(&state).await?;
    Ok(Json(json!({ "success": true, "total": jobs.len(), "jobs": jobs })))
}

#[instrument(skip_all)]
async fn list_internships<S: AppState>(State(state): State<S>) -> Result<Json<Value>, ApiError> {
    let internships: Vec<Internship> = active_records(&state).await?;
    Ok(Json(json!({
        "success": true,
        "total": internships.len(),
        "internships": internships,
    })))
}

/// Jobs and internships on one board. Both collections load concurrently.
#[instrument(skip_all)]
async fn list_combined<S: AppState>(
    State(state): State<S>,
    params: Result<Query<BTreeMap<String, String>>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params?;
    let params = ListParams::parse::<ListingView>(params)?;

    let (jobs, internships) = tokio::try_join!(
        active_records::<S, Job>(&state),
        active_records::<S, Internship>(&state),
    )?;
    debug!(
        jobs = jobs.len(),
        internships = internships.len(),
        "Loaded listings"
    );

    let listings = ListingView::merge(&jobs, &internships, Utc::now());
    Ok(params.respond("listings", listings, |listing| listing))
}

pub fn router<S: AppState>() -> Router<S> {
    Router::new()
        .route("/jobs", get(list_jobs::<S>))
        .route("/internships", get(list_internships::<S>))
        .route("/listings", get(list_combined::<S>))
}
