//! Document storage for content collections.
//!
//! Records are schemaless JSON objects grouped by collection name. The store
//! assigns ids and stamps `updated_at`; typing happens one layer up in the
//! repositories.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

mod memory;
mod sqlite;

pub use memory::MemoryRecordStore;
pub use sqlite::SqliteRecordStore;

/// Keys owned by the store and never taken from a caller's body.
pub const RESERVED_KEYS: [&str; 2] = ["id", "updated_at"];

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Database connection lock poisoned")]
    Poisoned,

    #[error("Malformed record body: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Record body must be a JSON object")]
    NotAnObject,

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: String,
    pub body: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl StoredRecord {
    /// The full document as clients see it, with `id` and `updated_at`
    /// folded back in.
    pub fn into_document(self) -> Value {
        let mut body = self.body;
        body.insert("id".to_string(), Value::String(self.id));
        if let Some(updated_at) = self.updated_at {
            body.insert(
                "updated_at".to_string(),
                Value::String(updated_at.to_rfc3339()),
            );
        }
        Value::Object(body)
    }

    pub fn matches(&self, filters: &[(String, Value)]) -> bool {
        filters
            .iter()
            .all(|(key, expected)| self.body.get(key) == Some(expected))
    }
}

#[async_trait]
pub trait RecordStore: Clone + Send + Sync + 'static {
    /// Records in insertion order whose top-level fields equal every filter.
    async fn select(
        &self,
        collection: &str,
        filters: &[(String, Value)],
    ) -> Result<Vec<StoredRecord>, StoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredRecord>, StoreError>;

    async fn insert(
        &self,
        collection: &str,
        body: Map<String, Value>,
    ) -> Result<StoredRecord, StoreError>;

    /// Shallow merge of `patch` into the stored body. `Ok(None)` when the id
    /// is unknown.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<Option<StoredRecord>, StoreError>;

    /// `Ok(false)` when nothing was deleted.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    /// Adds one to the numeric `field` while holding the store's write lock
    /// and returns the record after the bump. Does not stamp `updated_at`.
    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
    ) -> Result<Option<StoredRecord>, StoreError>;
}

pub(crate) fn strip_reserved(mut body: Map<String, Value>) -> Map<String, Value> {
    for key in RESERVED_KEYS {
        body.remove(key);
    }
    body
}

pub(crate) fn merge_patch(body: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, value) in strip_reserved(patch) {
        body.insert(key, value);
    }
}

/// A missing or non-numeric counter counts from zero.
pub(crate) fn bump_counter(body: &mut Map<String, Value>, field: &str) {
    let next = body.get(field).and_then(Value::as_i64).unwrap_or(0) + 1;
    body.insert(field.to_string(), Value::from(next));
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
