use axum::{Json, Router, routing::get};
use chrono::Utc;
use serde_json::{Value, json};

use crate::AppState;

pub mod api;
pub mod extractors;

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

pub fn create_router<S: AppState>() -> Router<S> {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api::create_api_router())
}
