use std::{env, time::Duration};

use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    database_url: String,
    listen_addr: String,
    request_timeout: Duration,
    session_ttl: chrono::Duration,
    allowed_origins: Vec<String>,
    admin: Option<AdminBootstrap>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

const DEFAULT_DATABASE_URL: &str = "examupdt.db";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60 * 24 * 7;
const MAX_SESSION_TTL_SECS: u64 = 60 * 60 * 24 * 365;

fn parse_secs(
    name: &'static str,
    value: Option<String>,
    default: u64,
) -> Result<Duration, ConfigError> {
    match value {
        None => Ok(Duration::from_secs(default)),
        Some(raw) => raw.trim().parse::<u64>().map(Duration::from_secs).map_err(|_| {
            ConfigError::Invalid(format!("{name} must be a whole number of seconds, got {raw:?}"))
        }),
    }
}

impl AppConfig {
    /// Reads the process environment, after loading `.env` when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let listen_addr = lookup("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.into());

        let request_timeout = parse_secs(
            "REQUEST_TIMEOUT_SECS",
            lookup("REQUEST_TIMEOUT_SECS"),
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;
        let session_ttl = parse_secs(
            "SESSION_TTL_SECS",
            lookup("SESSION_TTL_SECS"),
            DEFAULT_SESSION_TTL_SECS,
        )?;
        if session_ttl.is_zero() {
            return Err(ConfigError::Invalid("SESSION_TTL_SECS must be positive".into()));
        }
        if session_ttl.as_secs() > MAX_SESSION_TTL_SECS {
            return Err(ConfigError::Invalid(format!(
                "SESSION_TTL_SECS must be at most {MAX_SESSION_TTL_SECS}"
            )));
        }
        let session_ttl = chrono::Duration::from_std(session_ttl)
            .map_err(|err| ConfigError::Invalid(format!("SESSION_TTL_SECS: {err}")))?;

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec!["*".to_string()]);

        let admin = match (lookup("ADMIN_EMAIL"), lookup("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminBootstrap {
                email,
                password,
                name: lookup("ADMIN_NAME"),
            }),
            (Some(_), None) => return Err(ConfigError::Missing("ADMIN_PASSWORD")),
            (None, Some(_)) => return Err(ConfigError::Missing("ADMIN_EMAIL")),
            (None, None) => None,
        };

        Ok(Self {
            database_url,
            listen_addr,
            request_timeout,
            session_ttl,
            allowed_origins,
            admin,
        })
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        self.session_ttl
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }

    pub fn admin(&self) -> Option<&AdminBootstrap> {
        self.admin.as_ref()
    }
}
