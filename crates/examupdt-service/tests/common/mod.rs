#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use diesel::sqlite::SqliteConnection;
use examupdt_service::identity::SqliteIdentityProvider;
use examupdt_service::store::{MemoryRecordStore, RecordStore, StoreError, StoredRecord};
use examupdt_service::test_helpers::establish_test_connection;
use examupdt_service::{DefaultAppState, ServiceState, create_app};
use serde_json::{Map, Value, json};

pub const ADMIN_EMAIL: &str = "admin@examupdt.in";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";

pub fn test_db() -> Arc<Mutex<SqliteConnection>> {
    Arc::new(Mutex::new(establish_test_connection()))
}

pub fn create_test_server() -> (TestServer, Arc<Mutex<SqliteConnection>>) {
    let db = test_db();
    let state = DefaultAppState::from_connection(db.clone());
    let server = TestServer::new(create_app(state)).unwrap();
    (server, db)
}

pub async fn seed_admin(db: Arc<Mutex<SqliteConnection>>) {
    SqliteIdentityProvider::new(db)
        .ensure_admin(ADMIN_EMAIL, ADMIN_PASSWORD, Some("Admin"))
        .await
        .unwrap();
}

/// Signs in as the seeded admin and returns the bearer token.
pub async fn login(server: &TestServer) -> String {
    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["token"].as_str().unwrap().to_string()
}

/// A server with a seeded admin, plus that admin's bearer token.
pub async fn create_admin_server() -> (TestServer, Arc<Mutex<SqliteConnection>>, String) {
    let (server, db) = create_test_server();
    seed_admin(db.clone()).await;
    let token = login(&server).await;
    (server, db, token)
}

/// Creates a record through the admin API and returns its id.
pub async fn create_record(
    server: &TestServer,
    token: &str,
    collection: &str,
    body: Value,
) -> String {
    let response = server
        .post(&format!("/api/v1/admin/{collection}"))
        .authorization_bearer(token)
        .json(&body)
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let body: Value = response.json();
    body["record"]["id"].as_str().unwrap().to_string()
}

/// In-memory store whose deletes fail for a fixed set of ids.
#[derive(Clone)]
pub struct FaultyStore {
    inner: MemoryRecordStore,
    failing: Arc<Mutex<HashSet<String>>>,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryRecordStore::new(),
            failing: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn fail_deletes_of(&self, id: &str) {
        self.failing.lock().unwrap().insert(id.to_string());
    }
}

#[async_trait]
impl RecordStore for FaultyStore {
    async fn select(
        &self,
        collection: &str,
        filters: &[(String, Value)],
    ) -> Result<Vec<StoredRecord>, StoreError> {
        self.inner.select(collection, filters).await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredRecord>, StoreError> {
        self.inner.get(collection, id).await
    }

    async fn insert(
        &self,
        collection: &str,
        body: Map<String, Value>,
    ) -> Result<StoredRecord, StoreError> {
        self.inner.insert(collection, body).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<Option<StoredRecord>, StoreError> {
        self.inner.update(collection, id, patch).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        if self.failing.lock().unwrap().contains(id) {
            return Err(StoreError::Unavailable("simulated outage".to_string()));
        }
        self.inner.delete(collection, id).await
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
    ) -> Result<Option<StoredRecord>, StoreError> {
        self.inner.increment(collection, id, field).await
    }
}

/// A server over a [`FaultyStore`], with a seeded admin and its token.
pub async fn create_faulty_server() -> (TestServer, FaultyStore, String) {
    let db = test_db();
    seed_admin(db.clone()).await;

    let store = FaultyStore::new();
    let state = ServiceState::new(store.clone(), SqliteIdentityProvider::new(db));
    let server = TestServer::new(create_app(state)).unwrap();
    let token = login(&server).await;
    (server, store, token)
}
