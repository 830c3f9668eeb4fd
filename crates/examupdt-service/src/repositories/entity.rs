use std::marker::PhantomData;

use async_trait::async_trait;
use examupdt_core::selection::Deleter;
use examupdt_core::{Error, Record};
use serde_json::{Map, Value};
use tracing::{debug, error, info};

use crate::store::{RecordStore, StoreError, StoredRecord};
use crate::validation::validate_links;

/// Typed CRUD over one collection of a [`RecordStore`].
pub struct EntityRepository<E, S> {
    store: S,
    _entity: PhantomData<fn() -> E>,
}

impl<E, S: Clone> Clone for EntityRepository<E, S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _entity: PhantomData,
        }
    }
}

fn fault(err: StoreError) -> Error {
    error!(error = %err, "Record store failure");
    Error::transient(err)
}

/// `postedDate` -> `posted_date`. Snake-case keys pass through unchanged.
pub fn snake_case_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn into_object(value: Value) -> Result<Map<String, Value>, Error> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::Validation(format!(
            "expected a JSON object, got {}",
            match other {
                Value::Array(_) => "an array",
                Value::String(_) => "a string",
                Value::Number(_) => "a number",
                Value::Bool(_) => "a boolean",
                _ => "null",
            }
        ))),
    }
}

impl<E: Record, S: RecordStore> EntityRepository<E, S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    fn decode(record: StoredRecord) -> Result<E, Error> {
        let id = record.id.clone();
        serde_json::from_value(record.into_document()).map_err(|err| {
            error!(
                collection = E::COLLECTION,
                id = %id,
                error = %err,
                "Stored record does not decode"
            );
            Error::transient(err)
        })
    }

    /// Canonical body for `input`: defaults applied, aliases resolved,
    /// required fields checked.
    fn canonical(input: Value) -> Result<(E, Map<String, Value>), Error> {
        let entity: E = serde_json::from_value(input)
            .map_err(|err| Error::Validation(err.to_string()))?;
        entity.validate()?;

        let mut body = into_object(serde_json::to_value(&entity).map_err(Error::transient)?)?;
        validate_links(&mut body)
            .map_err(|(field, err)| Error::Validation(format!("{field}: {err}")))?;
        Ok((entity, body))
    }

    pub async fn get_all(&self) -> Result<Vec<E>, Error> {
        self.find_where(&[]).await
    }

    pub async fn find_where(&self, filters: &[(String, Value)]) -> Result<Vec<E>, Error> {
        let records = self
            .store
            .select(E::COLLECTION, filters)
            .await
            .map_err(fault)?;
        records.into_iter().map(Self::decode).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> Result<E, Error> {
        match self.store.get(E::COLLECTION, id).await.map_err(fault)? {
            Some(record) => Self::decode(record),
            None => Err(Error::NotFound {
                kind: E::KIND,
                id: id.to_string(),
            }),
        }
    }

    pub async fn create(&self, input: Value) -> Result<E, Error> {
        let mut input = into_object(input)?;
        input.remove("id");
        input.remove("updated_at");

        let (_, body) = Self::canonical(Value::Object(input))?;
        let record = self
            .store
            .insert(E::COLLECTION, body)
            .await
            .map_err(fault)?;

        info!(collection = E::COLLECTION, id = %record.id, "Created record");
        Self::decode(record)
    }

    /// Applies a partial update; fields not named in `patch` keep their
    /// stored values. Concurrent updates are last-write-wins.
    pub async fn update(&self, id: &str, patch: Value) -> Result<E, Error> {
        let patch: Map<String, Value> = into_object(patch)?
            .into_iter()
            .map(|(key, value)| (snake_case_key(&key), value))
            .filter(|(key, _)| key != "id" && key != "updated_at")
            .collect();

        let current = self.get_by_id(id).await?;
        let mut merged = into_object(serde_json::to_value(&current).map_err(Error::transient)?)?;
        let stored_keys: Vec<String> = merged.keys().cloned().collect();
        merged.extend(patch.iter().map(|(key, value)| (key.clone(), value.clone())));

        let (_, mut canonical) = Self::canonical(Value::Object(merged))?;
        // Cleared optional fields vanish from the canonical body; write them
        // through as null so the stored value goes too.
        for key in stored_keys {
            if patch.contains_key(&key) && !canonical.contains_key(&key) {
                canonical.insert(key, Value::Null);
            }
        }
        let changes: Map<String, Value> = canonical
            .into_iter()
            .filter(|(key, _)| patch.contains_key(key))
            .collect();
        debug!(collection = E::COLLECTION, id, fields = changes.len(), "Updating record");

        match self
            .store
            .update(E::COLLECTION, id, changes)
            .await
            .map_err(fault)?
        {
            Some(record) => {
                info!(collection = E::COLLECTION, id, "Updated record");
                Self::decode(record)
            }
            None => Err(Error::NotFound {
                kind: E::KIND,
                id: id.to_string(),
            }),
        }
    }

    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        if self.store.delete(E::COLLECTION, id).await.map_err(fault)? {
            info!(collection = E::COLLECTION, id, "Deleted record");
            Ok(())
        } else {
            Err(Error::NotFound {
                kind: E::KIND,
                id: id.to_string(),
            })
        }
    }

    /// Adds one to a numeric counter such as `views` and returns the record
    /// with the bumped value.
    pub async fn increment(&self, id: &str, counter: &str) -> Result<E, Error> {
        match self
            .store
            .increment(E::COLLECTION, id, counter)
            .await
            .map_err(fault)?
        {
            Some(record) => Self::decode(record),
            None => Err(Error::NotFound {
                kind: E::KIND,
                id: id.to_string(),
            }),
        }
    }
}

#[async_trait]
impl<E: Record, S: RecordStore> Deleter for EntityRepository<E, S> {
    async fn delete(&self, id: &str) -> Result<(), Error> {
        EntityRepository::delete(self, id).await
    }
}
