use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use examupdt_core::Error;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Content(#[from] Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),
}

impl ApiError {
    pub fn unauthorized() -> Self {
        ApiError::Content(Error::Auth("missing or invalid bearer token".to_string()))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Content(Error::Validation(msg)) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Content(Error::Auth(ref reason)) => {
                warn!(reason = %reason, "Rejected unauthenticated request");
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            }
            ApiError::Content(Error::NotFound { kind, .. }) => {
                (StatusCode::NOT_FOUND, format!("{} not found", capitalize(kind)))
            }
            ApiError::Content(Error::Transient(ref err)) => {
                error!(error = %err, "Store error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Content(ref err @ Error::BulkPartialFailure { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::UnknownCollection(ref name) => {
                (StatusCode::NOT_FOUND, format!("Unknown collection: {name}"))
            }
        };

        let body = Json(json!({
            "success": false,
            "error": error_message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::from(Error::Validation("x".into())), StatusCode::BAD_REQUEST),
            (ApiError::unauthorized(), StatusCode::UNAUTHORIZED),
            (
                ApiError::from(Error::NotFound {
                    kind: "post",
                    id: "1".into(),
                }),
                StatusCode::NOT_FOUND,
            ),
            (ApiError::from(Error::transient("disk full")), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::UnknownCollection("x".into()), StatusCode::NOT_FOUND),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_store_faults_answer_a_generic_message() {
        let response = ApiError::from(Error::transient("database is locked")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "success": false, "error": "Internal server error" }));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("post"), "Post");
        assert_eq!(capitalize(""), "");
    }
}
