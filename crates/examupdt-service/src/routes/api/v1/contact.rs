use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    routing::{delete, get, put},
};
use chrono::Utc;
use examupdt_core::Error;
use examupdt_core::content::{ContactMessage, MessageStatus};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use super::ListParams;
use crate::AppState;
use crate::errors::ApiError;
use crate::routes::extractors::Authenticated;

/// Fields a visitor may not set on their own message.
const ADMIN_ONLY_FIELDS: [&str; 4] = ["status", "reply", "replied_at", "repliedAt"];

#[derive(Debug, Deserialize)]
struct ReplyRequest {
    #[serde(default)]
    reply: String,
}

#[instrument(skip_all)]
async fn send_message<S: AppState>(
    State(state): State<S>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(mut payload) = payload?;
    if let Value::Object(fields) = &mut payload {
        for field in ADMIN_ONLY_FIELDS {
            fields.remove(field);
        }
        fields.insert(
            "status".to_string(),
            Value::from(MessageStatus::Unread.as_str()),
        );
    }

    let message = state.repository::<ContactMessage>().create(payload).await?;
    info!(id = %message.id, "Received contact message");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "id": message.id })),
    ))
}

#[instrument(skip_all)]
async fn list_messages<S: AppState>(
    State(state): State<S>,
    _auth: Authenticated,
    params: Result<Query<BTreeMap<String, String>>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params?;
    let params = ListParams::parse::<ContactMessage>(params)?;
    let messages = state.repository::<ContactMessage>().get_all().await?;
    Ok(params.respond("messages", messages, |message| message))
}

#[instrument(skip_all, fields(id = %id))]
async fn mark_read<S: AppState>(
    State(state): State<S>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let message = state
        .repository::<ContactMessage>()
        .update(&id, json!({ "status": MessageStatus::Read.as_str() }))
        .await?;
    Ok(Json(json!({ "success": true, "message": message })))
}

#[instrument(skip_all, fields(id = %id))]
async fn reply<S: AppState>(
    State(state): State<S>,
    _auth: Authenticated,
    Path(id): Path<String>,
    payload: Result<Json<ReplyRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload?;
    let text = payload.reply.trim();
    if text.is_empty() {
        return Err(Error::missing_fields(&["reply"]).into());
    }

    let message = state
        .repository::<ContactMessage>()
        .update(
            &id,
            json!({
                "reply": text,
                "replied_at": Utc::now(),
                "status": MessageStatus::Read.as_str(),
            }),
        )
        .await?;
    info!("Replied to contact message");
    Ok(Json(json!({ "success": true, "message": message })))
}

#[instrument(skip_all, fields(id = %id))]
async fn delete_message<S: AppState>(
    State(state): State<S>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.repository::<ContactMessage>().delete(&id).await?;
    Ok(Json(json!({ "success": true, "id": id })))
}

pub fn router<S: AppState>() -> Router<S> {
    Router::new()
        .route("/contact", get(list_messages::<S>).post(send_message::<S>))
        .route("/contact/{id}", delete(delete_message::<S>))
        .route("/contact/{id}/read", put(mark_read::<S>))
        .route("/contact/{id}/reply", put(reply::<S>))
}
