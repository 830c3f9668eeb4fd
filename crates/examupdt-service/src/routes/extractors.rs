use axum::{extract::FromRequestParts, http::request::Parts};
use examupdt_core::{Access, Session};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::debug;

use crate::AppState;
use crate::errors::ApiError;

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .typed_get::<Authorization<Bearer>>()
        .map(|header| header.token().to_string())
}

/// A request carrying a live admin session. Rejects with 401 otherwise.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Session);

/// The session when one is presented and valid; never rejects.
#[derive(Debug, Clone)]
pub struct MaybeAuthenticated(pub Option<Session>);

impl<S: AppState> FromRequestParts<S> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts);
        match state.gate().check_access(token.as_deref()).await {
            Access::Granted(session) => Ok(Self(session)),
            Access::Unauthenticated => Err(ApiError::unauthorized()),
        }
    }
}

impl<S: AppState> FromRequestParts<S> for MaybeAuthenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(Self(None));
        };
        match state.gate().check_access(Some(&token)).await {
            Access::Granted(session) => Ok(Self(Some(session))),
            Access::Unauthenticated => {
                debug!("Ignoring invalid bearer token on public route");
                Ok(Self(None))
            }
        }
    }
}
