//! Subcommand implementations.

pub mod auth;
pub mod browse;
pub mod contact;
pub mod list;
pub mod records;
pub mod stats;

use anyhow::{Context, Result, bail};
use examupdt_core::{Access, Error, Session, SessionGate};
use serde_json::Value;
use tracing::warn;

use crate::client::{ApiClient, HttpIdentityProvider};
use crate::{output, session};

/// A client carrying a session the service still honours.
///
/// A stored token the service no longer accepts is discarded.
pub async fn admin_client(service_url: &str) -> Result<(ApiClient, Session)> {
    let stored = session::load()
        .context("Failed to load session")?
        .context("No active session. Run 'examupdt login' first.")?;
    if stored.service_url != service_url {
        bail!(
            "Stored session is for {}. Run 'examupdt login' against {service_url} first.",
            stored.service_url
        );
    }

    let client = ApiClient::new(service_url)?;
    let gate = SessionGate::new(HttpIdentityProvider::new(client.clone()));
    match gate.check_access(Some(&stored.token)).await {
        Access::Granted(session) => Ok((client.with_token(&session.token), session)),
        Access::Unauthenticated => {
            session::clear()?;
            bail!("Session expired or revoked. Run 'examupdt login' again.")
        }
    }
}

/// The response body of a list read, or `None` after telling the user the
/// list could not be loaded. Reads never abort the command.
pub fn loaded(fetched: Result<Value, Error>) -> Option<Value> {
    match fetched {
        Ok(body) => Some(body),
        Err(err) => {
            warn!(error = %err, "List failed to load");
            output::notice(&err.notice());
            None
        }
    }
}

/// Rows under `key`, empty when the body has none.
pub fn rows(body: &Value, key: &str) -> Vec<Value> {
    match body[key].as_array() {
        Some(rows) => rows.clone(),
        None => {
            warn!(key, "Response has no rows");
            Vec::new()
        }
    }
}

/// Splits `key=value` arguments.
pub fn parse_pairs(pairs: &[String]) -> Result<Vec<(String, String)>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(key, value)| (key.trim().to_string(), value.to_string()))
                .filter(|(key, _)| !key.is_empty())
                .with_context(|| format!("expected key=value, got {pair:?}"))
        })
        .collect()
}
