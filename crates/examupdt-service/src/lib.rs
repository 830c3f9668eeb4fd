use axum::Router;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use examupdt_core::{IdentityProvider, Record, SessionGate};
use std::sync::{Arc, Mutex};

pub mod config;
pub mod errors;
pub mod identity;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod schema;
pub mod store;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
pub mod validation;

use identity::SqliteIdentityProvider;
use repositories::EntityRepository;
use store::{RecordStore, SqliteRecordStore};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Brings the schema up to date; returns how many migrations ran.
pub fn run_migrations(
    conn: &mut SqliteConnection,
) -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
    Ok(conn.run_pending_migrations(MIGRATIONS)?.len())
}

/// Everything a handler needs, injected once at startup.
pub trait AppState: Clone + Send + Sync + 'static {
    type Store: RecordStore;
    type Identity: IdentityProvider + Clone + 'static;

    fn store(&self) -> &Self::Store;

    fn gate(&self) -> &SessionGate<Self::Identity>;

    fn identity(&self) -> &Self::Identity {
        self.gate().provider()
    }

    fn repository<E: Record>(&self) -> EntityRepository<E, Self::Store> {
        EntityRepository::new(self.store().clone())
    }
}

#[derive(Clone)]
pub struct ServiceState<S, I> {
    store: S,
    gate: SessionGate<I>,
}

impl<S: RecordStore, I: IdentityProvider + Clone + 'static> ServiceState<S, I> {
    pub fn new(store: S, identity: I) -> Self {
        Self {
            store,
            gate: SessionGate::new(identity),
        }
    }
}

impl<S: RecordStore, I: IdentityProvider + Clone + 'static> AppState for ServiceState<S, I> {
    type Store = S;
    type Identity = I;

    fn store(&self) -> &S {
        &self.store
    }

    fn gate(&self) -> &SessionGate<I> {
        &self.gate
    }
}

/// Content and identity sharing one SQLite connection.
pub type DefaultAppState = ServiceState<SqliteRecordStore, SqliteIdentityProvider>;

impl DefaultAppState {
    pub fn from_connection(db: Arc<Mutex<SqliteConnection>>) -> Self {
        Self::new(
            SqliteRecordStore::new(db.clone()),
            SqliteIdentityProvider::new(db),
        )
    }

    pub fn with_session_ttl(db: Arc<Mutex<SqliteConnection>>, ttl: chrono::Duration) -> Self {
        Self::new(
            SqliteRecordStore::new(db.clone()),
            SqliteIdentityProvider::new(db).with_session_ttl(ttl),
        )
    }
}

pub fn create_app<S: AppState>(state: S) -> Router {
    routes::create_router().with_state(state)
}
