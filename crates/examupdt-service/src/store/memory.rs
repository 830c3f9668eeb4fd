use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};

use super::{
    RecordStore, StoreError, StoredRecord, bump_counter, merge_patch, new_id, strip_reserved,
};

/// Process-local store with the same semantics as the SQLite one.
#[derive(Clone, Default)]
pub struct MemoryRecordStore {
    collections: Arc<RwLock<HashMap<String, Vec<StoredRecord>>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn select(
        &self,
        collection: &str,
        filters: &[(String, Value)],
    ) -> Result<Vec<StoredRecord>, StoreError> {
        let collections = self.collections.read().map_err(|_| StoreError::Poisoned)?;
        Ok(collections
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| record.matches(filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredRecord>, StoreError> {
        let collections = self.collections.read().map_err(|_| StoreError::Poisoned)?;
        Ok(collections
            .get(collection)
            .and_then(|records| records.iter().find(|record| record.id == id))
            .cloned())
    }

    async fn insert(
        &self,
        collection: &str,
        body: Map<String, Value>,
    ) -> Result<StoredRecord, StoreError> {
        let record = StoredRecord {
            id: new_id(),
            body: strip_reserved(body),
            created_at: Utc::now(),
            updated_at: None,
        };

        let mut collections = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<Option<StoredRecord>, StoreError> {
        let mut collections = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        let Some(record) = collections
            .get_mut(collection)
            .and_then(|records| records.iter_mut().find(|record| record.id == id))
        else {
            return Ok(None);
        };

        merge_patch(&mut record.body, patch);
        record.updated_at = Some(Utc::now());
        Ok(Some(record.clone()))
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        let Some(records) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = records.len();
        records.retain(|record| record.id != id);
        Ok(records.len() < before)
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
    ) -> Result<Option<StoredRecord>, StoreError> {
        let mut collections = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        let record = collections
            .get_mut(collection)
            .and_then(|records| records.iter_mut().find(|record| record.id == id));
        Ok(record.map(|record| {
            bump_counter(&mut record.body, field);
            record.clone()
        }))
    }
}
