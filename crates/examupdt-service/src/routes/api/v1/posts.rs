use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    routing::get,
};
use examupdt_core::content::{Post, PostStatus};
use examupdt_core::{Error, Record};
use serde_json::{Value, json};
use tracing::{debug, instrument};

use super::ListParams;
use crate::AppState;
use crate::errors::ApiError;
use crate::routes::extractors::MaybeAuthenticated;

#[instrument(skip_all)]
async fn list_posts<S: AppState>(
    State(state): State<S>,
    params: Result<Query<BTreeMap<String, String>>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(mut params) = params?;
    // Drafts never leave the admin surface.
    params.remove("status");
    let params = ListParams::parse::<Post>(params)?;

    let published = [(
        "status".to_string(),
        Value::from(PostStatus::Published.as_str()),
    )];
    let posts = state.repository::<Post>().find_where(&published).await?;
    debug!(count = posts.len(), "Loaded published posts");

    Ok(params.respond(Post::COLLECTION, posts, |post| post))
}

#[instrument(skip_all, fields(id = %id))]
async fn get_post<S: AppState>(
    State(state): State<S>,
    Path(id): Path<String>,
    MaybeAuthenticated(session): MaybeAuthenticated,
) -> Result<Json<Value>, ApiError> {
    let repository = state.repository::<Post>();
    let post = repository.get_by_id(&id).await?;
    if !post.is_public() && session.is_none() {
        return Err(Error::NotFound {
            kind: Post::KIND,
            id,
        }
        .into());
    }

    let post = repository.increment(&id, "views").await?;

    Ok(Json(json!({ "success": true, "post": post })))
}

pub fn router<S: AppState>() -> Router<S> {
    Router::new()
        .route("/posts", get(list_posts::<S>))
        .route("/posts/{id}", get(get_post::<S>))
}
