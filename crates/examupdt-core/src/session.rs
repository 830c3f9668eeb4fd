use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: AuthUser,
    pub token: String,
}

/// Password sign-in and bearer-token sessions.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, Error>;

    async fn sign_out(&self, token: &str) -> Result<(), Error>;

    /// `Ok(None)` for unknown or expired tokens.
    async fn get_session(&self, token: &str) -> Result<Option<AuthUser>, Error>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted(Session),
    Unauthenticated,
}

impl Access {
    pub fn is_granted(&self) -> bool {
        matches!(self, Access::Granted(_))
    }

    pub fn into_session(self) -> Result<Session, Error> {
        match self {
            Access::Granted(session) => Ok(session),
            Access::Unauthenticated => Err(Error::Auth("no valid session".to_string())),
        }
    }
}

/// Guards admin operations behind a live session.
///
/// Every failure mode resolves to [`Access::Unauthenticated`].
#[derive(Debug, Clone)]
pub struct SessionGate<P> {
    provider: P,
    timeout: Duration,
}

impl<P: IdentityProvider> SessionGate<P> {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(provider: P) -> Self {
        Self {
            provider,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn check_access(&self, token: Option<&str>) -> Access {
        let Some(token) = token.map(str::trim).filter(|token| !token.is_empty()) else {
            debug!("No session token presented");
            return Access::Unauthenticated;
        };

        match tokio::time::timeout(self.timeout, self.provider.get_session(token)).await {
            Ok(Ok(Some(user))) => Access::Granted(Session {
                user,
                token: token.to_string(),
            }),
            Ok(Ok(None)) => {
                debug!("Session token is unknown or expired");
                Access::Unauthenticated
            }
            Ok(Err(err)) => {
                warn!(error = %err, "Session lookup failed");
                Access::Unauthenticated
            }
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "Session lookup timed out");
                Access::Unauthenticated
            }
        }
    }
}
