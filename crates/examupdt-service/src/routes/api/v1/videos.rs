use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use chrono::Utc;
use examupdt_core::content::YouTubeVideo;
use examupdt_core::views::VideoView;
use serde_json::Value;
use tracing::instrument;

use super::ListParams;
use crate::AppState;
use crate::errors::ApiError;

#[instrument(skip_all)]
async fn list_videos<S: AppState>(
    State(state): State<S>,
    params: Result<Query<BTreeMap<String, String>>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params?;
    let params = ListParams::parse::<YouTubeVideo>(params)?;
    let videos = state.repository::<YouTubeVideo>().get_all().await?;

    let now = Utc::now();
    Ok(params.respond("videos", videos, |video| VideoView::new(&video, now)))
}

pub fn router<S: AppState>() -> Router<S> {
    Router::new().route("/videos", get(list_videos::<S>))
}
