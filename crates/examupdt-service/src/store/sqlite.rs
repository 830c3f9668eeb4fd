use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde_json::{Map, Value};
use tracing::debug;

use super::{
    RecordStore, StoreError, StoredRecord, bump_counter, merge_patch, new_id, strip_reserved,
};
use crate::models::{NewRecordRow, RecordRow};
use crate::schema::records;

#[derive(Clone)]
pub struct SqliteRecordStore {
    db: Arc<Mutex<SqliteConnection>>,
}

impl SqliteRecordStore {
    pub fn new(db: Arc<Mutex<SqliteConnection>>) -> Self {
        Self { db }
    }

    fn conn(&self) -> Result<MutexGuard<'_, SqliteConnection>, StoreError> {
        self.db.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn decode(row: RecordRow) -> Result<StoredRecord, StoreError> {
    let body = match serde_json::from_str::<Value>(&row.body)? {
        Value::Object(map) => map,
        _ => return Err(StoreError::NotAnObject),
    };

    Ok(StoredRecord {
        id: row.id,
        body,
        created_at: row.created_at.and_utc(),
        updated_at: row.updated_at.map(|at| at.and_utc()),
    })
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn select(
        &self,
        collection: &str,
        filters: &[(String, Value)],
    ) -> Result<Vec<StoredRecord>, StoreError> {
        let rows = {
            let mut conn = self.conn()?;
            records::table
                .filter(records::collection.eq(collection))
                .order((records::created_at.asc(), records::id.asc()))
                .select(RecordRow::as_select())
                .load(&mut *conn)?
        };

        let mut selected = Vec::with_capacity(rows.len());
        for row in rows {
            let record = decode(row)?;
            if record.matches(filters) {
                selected.push(record);
            }
        }
        debug!(collection, count = selected.len(), "Selected records");
        Ok(selected)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredRecord>, StoreError> {
        let row = {
            let mut conn = self.conn()?;
            records::table
                .find((collection, id))
                .select(RecordRow::as_select())
                .first(&mut *conn)
                .optional()?
        };
        row.map(decode).transpose()
    }

    async fn insert(
        &self,
        collection: &str,
        body: Map<String, Value>,
    ) -> Result<StoredRecord, StoreError> {
        let id = new_id();
        let body = strip_reserved(body);
        let text = serde_json::to_string(&body)?;
        let created_at = Utc::now().naive_utc();

        {
            let mut conn = self.conn()?;
            diesel::insert_into(records::table)
                .values(&NewRecordRow {
                    collection,
                    id: &id,
                    body: &text,
                    created_at,
                })
                .execute(&mut *conn)?;
        }

        Ok(StoredRecord {
            id,
            body,
            created_at: created_at.and_utc(),
            updated_at: None,
        })
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<Option<StoredRecord>, StoreError> {
        let mut conn = self.conn()?;
        conn.transaction::<_, StoreError, _>(|conn| {
            let Some(row) = records::table
                .find((collection, id))
                .select(RecordRow::as_select())
                .first(conn)
                .optional()?
            else {
                return Ok(None);
            };

            let mut record = decode(row)?;
            merge_patch(&mut record.body, patch);
            let text = serde_json::to_string(&record.body)?;
            let updated_at = Utc::now().naive_utc();

            diesel::update(records::table.find((collection, id)))
                .set((
                    records::body.eq(&text),
                    records::updated_at.eq(Some(updated_at)),
                ))
                .execute(conn)?;

            record.updated_at = Some(updated_at.and_utc());
            Ok(Some(record))
        })
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(records::table.find((collection, id))).execute(&mut *conn)?;
        Ok(deleted > 0)
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
    ) -> Result<Option<StoredRecord>, StoreError> {
        let mut conn = self.conn()?;
        conn.transaction::<_, StoreError, _>(|conn| {
            let Some(row) = records::table
                .find((collection, id))
                .select(RecordRow::as_select())
                .first(conn)
                .optional()?
            else {
                return Ok(None);
            };

            let mut record = decode(row)?;
            bump_counter(&mut record.body, field);
            diesel::update(records::table.find((collection, id)))
                .set(records::body.eq(serde_json::to_string(&record.body)?))
                .execute(conn)?;
            Ok(Some(record))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::establish_test_connection;
    use serde_json::json;

    fn store() -> SqliteRecordStore {
        SqliteRecordStore::new(Arc::new(Mutex::new(establish_test_connection())))
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_get_reads_it_back() {
        let store = store();
        let inserted = store
            .insert("posts", object(json!({ "title": "Hello", "id": "ignored" })))
            .await
            .unwrap();

        assert_ne!(inserted.id, "ignored");
        assert!(!inserted.body.contains_key("id"));

        let fetched = store.get("posts", &inserted.id).await.unwrap().unwrap();
        assert_eq!(fetched.body, inserted.body);
        assert_eq!(fetched.updated_at, None);
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = store();
        let post = store.insert("posts", object(json!({ "title": "p" }))).await.unwrap();
        store.insert("notes", object(json!({ "title": "n" }))).await.unwrap();

        assert_eq!(store.select("posts", &[]).await.unwrap().len(), 1);
        assert!(store.get("notes", &post.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_select_applies_equality_filters() {
        let store = store();
        store
            .insert("jobs", object(json!({ "status": "Active" })))
            .await
            .unwrap();
        store
            .insert("jobs", object(json!({ "status": "Closed" })))
            .await
            .unwrap();

        let active = store
            .select("jobs", &[("status".to_string(), json!("Active"))])
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
    }

    #[tokio::test]
    async fn test_update_merges_and_stamps() {
        let store = store();
        let record = store
            .insert("posts", object(json!({ "title": "Old", "views": 1 })))
            .await
            .unwrap();

        let updated = store
            .update("posts", &record.id, object(json!({ "title": "New" })))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.body.get("title"), Some(&json!("New")));
        assert_eq!(updated.body.get("views"), Some(&json!(1)));
        assert!(updated.updated_at.is_some());

        let missing = store
            .update("posts", "nope", object(json!({ "title": "x" })))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_increment_persists_without_stamping() {
        let store = store();
        let record = store
            .insert("questions", object(json!({ "title": "BST", "views": 2 })))
            .await
            .unwrap();

        let bumped = store
            .increment("questions", &record.id, "views")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bumped.body["views"], json!(3));

        let fetched = store.get("questions", &record.id).await.unwrap().unwrap();
        assert_eq!(fetched.body["views"], json!(3));
        assert_eq!(fetched.updated_at, None);
    }

    #[tokio::test]
    async fn test_delete_reports_whether_anything_was_removed() {
        let store = store();
        let record = store.insert("posts", Map::new()).await.unwrap();

        assert!(store.delete("posts", &record.id).await.unwrap());
        assert!(!store.delete("posts", &record.id).await.unwrap());
    }
}
