use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use examupdt_core::{AuthUser, Error, IdentityProvider};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::AppState;
use crate::errors::ApiError;
use crate::routes::extractors::Authenticated;

#[derive(Debug, Deserialize)]
struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    success: bool,
    user: AuthUser,
    token: String,
}

#[derive(Debug, Serialize)]
struct SessionResponse {
    success: bool,
    user: AuthUser,
}

#[derive(Debug, Serialize)]
struct LogoutResponse {
    success: bool,
}

#[instrument(skip_all)]
async fn login<S: AppState>(
    State(state): State<S>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(payload) = payload?;
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(Error::missing_fields(&["email", "password"]).into());
    }

    let session = state
        .identity()
        .sign_in(&payload.email, &payload.password)
        .await?;
    info!(user_id = %session.user.id, "Issued session");

    Ok(Json(LoginResponse {
        success: true,
        user: session.user,
        token: session.token,
    }))
}

#[instrument(skip_all)]
async fn logout<S: AppState>(
    State(state): State<S>,
    Authenticated(session): Authenticated,
) -> Result<Json<LogoutResponse>, ApiError> {
    state.identity().sign_out(&session.token).await?;
    info!(user_id = %session.user.id, "Session ended");
    Ok(Json(LogoutResponse { success: true }))
}

async fn current_session(Authenticated(session): Authenticated) -> Json<SessionResponse> {
    Json(SessionResponse {
        success: true,
        user: session.user,
    })
}

pub fn router<S: AppState>() -> Router<S> {
    Router::new()
        .route("/auth/login", post(login::<S>))
        .route("/auth/logout", post(logout::<S>))
        .route("/auth/session", get(current_session))
}
