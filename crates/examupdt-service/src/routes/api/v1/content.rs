//! Admin CRUD over every content collection, addressed by slug.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    routing::{get, post},
};
use examupdt_core::content::{
    ContentKind, ExamResult, Internship, Job, Note, Post, Question, YouTubeVideo,
};
use examupdt_core::selection::delete_all;
use examupdt_core::Error;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use super::ListParams;
use crate::AppState;
use crate::errors::ApiError;
use crate::routes::extractors::Authenticated;

/// Runs `$body` with `$entity` bound to the record type behind `$kind`.
macro_rules! with_entity {
    ($kind:expr, $entity:ident => $body:expr) => {
        match $kind {
            ContentKind::Posts => {
                type $entity = Post;
                $body
            }
            ContentKind::Results => {
                type $entity = ExamResult;
                $body
            }
            ContentKind::Notes => {
                type $entity = Note;
                $body
            }
            ContentKind::Questions => {
                type $entity = Question;
                $body
            }
            ContentKind::Jobs => {
                type $entity = Job;
                $body
            }
            ContentKind::Internships => {
                type $entity = Internship;
                $body
            }
            ContentKind::Videos => {
                type $entity = YouTubeVideo;
                $body
            }
            ContentKind::Messages => Err(ApiError::UnknownCollection(
                ContentKind::Messages.slug().to_string(),
            )),
        }
    };
}

/// Contact messages have their own routes and are not editable here.
fn admin_kind(collection: &str) -> Result<ContentKind, ApiError> {
    match collection.parse::<ContentKind>() {
        Ok(ContentKind::Messages) | Err(_) => {
            Err(ApiError::UnknownCollection(collection.to_string()))
        }
        Ok(kind) => Ok(kind),
    }
}

#[derive(Debug, Deserialize)]
struct BulkDeleteRequest {
    #[serde(default)]
    ids: Vec<String>,
}

#[instrument(skip_all, fields(collection = %collection))]
async fn list_records<S: AppState>(
    State(state): State<S>,
    _auth: Authenticated,
    Path(collection): Path<String>,
    params: Result<Query<BTreeMap<String, String>>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let kind = admin_kind(&collection)?;
    let Query(params) = params?;

    with_entity!(kind, E => {
        let params = ListParams::parse::<E>(params)?;
        let records = state.repository::<E>().get_all().await?;
        Ok(params.respond(kind.slug(), records, |record| record))
    })
}

#[instrument(skip_all, fields(collection = %collection))]
async fn create_record<S: AppState>(
    State(state): State<S>,
    _auth: Authenticated,
    Path(collection): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let kind = admin_kind(&collection)?;
    let Json(payload) = payload?;

    with_entity!(kind, E => {
        let record = state.repository::<E>().create(payload).await?;
        Ok((
            StatusCode::CREATED,
            Json(json!({ "success": true, "record": record })),
        ))
    })
}

#[instrument(skip_all, fields(collection = %collection, id = %id))]
async fn get_record<S: AppState>(
    State(state): State<S>,
    _auth: Authenticated,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let kind = admin_kind(&collection)?;

    with_entity!(kind, E => {
        let record = state.repository::<E>().get_by_id(&id).await?;
        Ok(Json(json!({ "success": true, "record": record })))
    })
}

#[instrument(skip_all, fields(collection = %collection, id = %id))]
async fn update_record<S: AppState>(
    State(state): State<S>,
    _auth: Authenticated,
    Path((collection, id)): Path<(String, String)>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let kind = admin_kind(&collection)?;
    let Json(payload) = payload?;

    with_entity!(kind, E => {
        let record = state.repository::<E>().update(&id, payload).await?;
        Ok(Json(json!({ "success": true, "record": record })))
    })
}

#[instrument(skip_all, fields(collection = %collection, id = %id))]
async fn delete_record<S: AppState>(
    State(state): State<S>,
    _auth: Authenticated,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let kind = admin_kind(&collection)?;

    with_entity!(kind, E => {
        state.repository::<E>().delete(&id).await?;
        Ok(Json(json!({ "success": true, "id": id })))
    })
}

/// Deletes every listed id concurrently. Partial failure still answers 200;
/// `success` is false and `failed` names the ids that remain.
#[instrument(skip_all, fields(collection = %collection))]
async fn bulk_delete<S: AppState>(
    State(state): State<S>,
    _auth: Authenticated,
    Path(collection): Path<String>,
    payload: Result<Json<BulkDeleteRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let kind = admin_kind(&collection)?;
    let Json(payload) = payload?;
    if payload.ids.is_empty() {
        return Err(Error::Validation("No items selected".to_string()).into());
    }

    let report = with_entity!(kind, E => {
        Ok::<_, ApiError>(delete_all(&state.repository::<E>(), payload.ids).await)
    })?;

    let failed: Vec<Value> = report
        .failed
        .iter()
        .map(|(id, err)| json!({ "id": id, "error": err.notice() }))
        .collect();

    if report.is_complete() {
        info!(deleted = report.deleted.len(), "Bulk delete finished");
        return Ok(Json(json!({
            "success": true,
            "deleted": report.deleted,
            "failed": failed,
        })));
    }

    warn!(
        deleted = report.deleted.len(),
        failed = failed.len(),
        "Bulk delete incomplete"
    );
    let deleted = report.deleted.clone();
    let error = report
        .into_result()
        .err()
        .map(|err| err.notice())
        .unwrap_or_default();
    Ok(Json(json!({
        "success": false,
        "deleted": deleted,
        "failed": failed,
        "error": error,
    })))
}

pub fn router<S: AppState>() -> Router<S> {
    Router::new()
        .route(
            "/admin/{collection}",
            get(list_records::<S>).post(create_record::<S>),
        )
        .route("/admin/{collection}/bulk-delete", post(bulk_delete::<S>))
        .route(
            "/admin/{collection}/{id}",
            get(get_record::<S>)
                .put(update_record::<S>)
                .delete(delete_record::<S>),
        )
}
