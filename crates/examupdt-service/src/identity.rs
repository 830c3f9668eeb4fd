use std::sync::{Arc, Mutex, MutexGuard};

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use examupdt_core::{AuthUser, Error, IdentityProvider, Session};
use tracing::{debug, error, info, warn};

use crate::models::{AdminUserRow, NewAdminUser, NewSession, SessionRow};
use crate::schema::{admin_users, sessions};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Admin accounts and bearer sessions kept next to the content.
#[derive(Clone)]
pub struct SqliteIdentityProvider {
    db: Arc<Mutex<SqliteConnection>>,
    session_ttl: Duration,
}

fn db_fault(err: impl std::fmt::Display) -> Error {
    error!(error = %err, "Identity store failure");
    Error::transient(err)
}

fn to_user(row: AdminUserRow) -> AuthUser {
    AuthUser {
        id: row.id,
        email: row.email,
        name: row.name,
    }
}

fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(db_fault)
}

fn verify_password(password: &str, expected_hash: &str) -> bool {
    match PasswordHash::new(expected_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(err) => {
            warn!(error = %err, "Stored password hash is unreadable");
            false
        }
    }
}

impl SqliteIdentityProvider {
    pub const DEFAULT_SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

    pub fn new(db: Arc<Mutex<SqliteConnection>>) -> Self {
        Self {
            db,
            session_ttl: Duration::seconds(Self::DEFAULT_SESSION_TTL_SECS),
        }
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    fn conn(&self) -> Result<MutexGuard<'_, SqliteConnection>, Error> {
        self.db
            .lock()
            .map_err(|_| db_fault("database connection lock poisoned"))
    }

    /// Creates the admin account unless one with this email already exists.
    pub async fn ensure_admin(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<AuthUser, Error> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(Error::missing_fields(&["email", "password"]));
        }

        let existing = {
            let mut conn = self.conn()?;
            admin_users::table
                .filter(admin_users::email.eq(&email))
                .select(AdminUserRow::as_select())
                .first(&mut *conn)
                .optional()
                .map_err(db_fault)?
        };
        if let Some(existing) = existing {
            debug!(email = %email, "Admin account already exists");
            return Ok(to_user(existing));
        }

        let password = password.to_owned();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(db_fault)??;

        let id = uuid::Uuid::new_v4().to_string();
        {
            let mut conn = self.conn()?;
            diesel::insert_into(admin_users::table)
                .values(&NewAdminUser {
                    id: &id,
                    email: &email,
                    name,
                    password_hash: &password_hash,
                    created_at: Utc::now().naive_utc(),
                })
                .execute(&mut *conn)
                .map_err(db_fault)?;
        }

        info!(email = %email, "Created admin account");
        Ok(AuthUser {
            id,
            email,
            name: name.map(str::to_string),
        })
    }
}

#[async_trait]
impl IdentityProvider for SqliteIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, Error> {
        let email = email.trim().to_lowercase();
        let user = {
            let mut conn = self.conn()?;
            admin_users::table
                .filter(admin_users::email.eq(&email))
                .select(AdminUserRow::as_select())
                .first(&mut *conn)
                .optional()
                .map_err(db_fault)?
        };

        let Some(user) = user else {
            debug!(email = %email, "Sign-in for unknown account");
            return Err(Error::Auth(INVALID_CREDENTIALS.to_string()));
        };

        let password = password.to_owned();
        let expected_hash = user.password_hash.clone();
        let verified =
            tokio::task::spawn_blocking(move || verify_password(&password, &expected_hash))
                .await
                .map_err(db_fault)?;
        if !verified {
            warn!(email = %email, "Sign-in with wrong password");
            return Err(Error::Auth(INVALID_CREDENTIALS.to_string()));
        }

        let token = uuid::Uuid::new_v4().simple().to_string();
        let now = Utc::now().naive_utc();
        {
            let mut conn = self.conn()?;
            diesel::insert_into(sessions::table)
                .values(&NewSession {
                    token: &token,
                    user_id: &user.id,
                    created_at: now,
                    expires_at: now + self.session_ttl,
                })
                .execute(&mut *conn)
                .map_err(db_fault)?;
        }

        info!(user_id = %user.id, "Admin signed in");
        Ok(Session {
            user: to_user(user),
            token,
        })
    }

    async fn sign_out(&self, token: &str) -> Result<(), Error> {
        let mut conn = self.conn()?;
        let removed = diesel::delete(sessions::table.find(token))
            .execute(&mut *conn)
            .map_err(db_fault)?;
        debug!(removed, "Signed out");
        Ok(())
    }

    async fn get_session(&self, token: &str) -> Result<Option<AuthUser>, Error> {
        let mut conn = self.conn()?;
        let found = sessions::table
            .inner_join(admin_users::table)
            .filter(sessions::token.eq(token))
            .select((SessionRow::as_select(), AdminUserRow::as_select()))
            .first::<(SessionRow, AdminUserRow)>(&mut *conn)
            .optional()
            .map_err(db_fault)?;

        let Some((session, user)) = found else {
            return Ok(None);
        };

        if session.expires_at <= Utc::now().naive_utc() {
            debug!(user_id = %user.id, "Session expired");
            diesel::delete(sessions::table.find(&session.token))
                .execute(&mut *conn)
                .map_err(db_fault)?;
            return Ok(None);
        }

        Ok(Some(to_user(user)))
    }
}
