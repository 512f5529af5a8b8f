use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use super::{Collection, DocumentStore, StoreError, WriteBatch, WriteOp, merge_fields};

type Collections = HashMap<Collection, BTreeMap<String, JsonValue>>;

/// In-memory document store.
///
/// Intended for tests/dev. A batch is applied to a copy of the data which
/// replaces the live data only once every operation succeeded.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<Collections>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn apply(data: &mut Collections, op: WriteOp) -> Result<(), StoreError> {
        match op {
            WriteOp::Create { collection, id, data: doc } => {
                let docs = data.entry(collection).or_default();
                if docs.contains_key(&id) {
                    return Err(StoreError::AlreadyExists { collection, id });
                }
                docs.insert(id, doc);
            }
            WriteOp::Set { collection, id, data: doc } => {
                data.entry(collection).or_default().insert(id, doc);
            }
            WriteOp::Merge { collection, id, fields } => {
                let Some(doc) = data.get_mut(&collection).and_then(|docs| docs.get_mut(&id)) else {
                    return Err(StoreError::NotFound { collection, id });
                };
                merge_fields(doc, &fields)?;
            }
            WriteOp::Delete { collection, id } => {
                if let Some(docs) = data.get_mut(&collection) {
                    docs.remove(&id);
                }
            }
            WriteOp::Clear(collection) => {
                data.remove(&collection);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn list(&self, collection: Collection) -> Result<Vec<JsonValue>, StoreError> {
        let data = self
            .collections
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        Ok(data
            .get(&collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<JsonValue>, StoreError> {
        let data = self
            .collections
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        Ok(data.get(&collection).and_then(|docs| docs.get(id)).cloned())
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut data = self
            .collections
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        let mut next = data.clone();
        for op in batch.into_ops() {
            Self::apply(&mut next, op)?;
        }
        *data = next;
        Ok(())
    }
}
