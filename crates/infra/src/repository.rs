//! Typed access to the document store.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use repairdesk_core::Entity;
use repairdesk_inventory::{Part, PartCategory, Supplier};
use repairdesk_parties::{Customer, Technician};
use repairdesk_repairs::RepairJob;

use crate::store::{Collection, DocumentStore, StoreError, WriteBatch};

/// A record persisted as one JSON document.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;

    fn document_id(&self) -> &str;
}

macro_rules! impl_document {
    ($t:ty, $collection:expr) => {
        impl Document for $t {
            const COLLECTION: Collection = $collection;

            fn document_id(&self) -> &str {
                Entity::id(self).as_str()
            }
        }
    };
}

impl_document!(Customer, Collection::Customers);
impl_document!(Technician, Collection::Technicians);
impl_document!(Part, Collection::Parts);
impl_document!(PartCategory, Collection::Categories);
impl_document!(Supplier, Collection::Suppliers);
impl_document!(RepairJob, Collection::RepairJobs);

pub fn encode<D: Document>(doc: &D) -> Result<JsonValue, StoreError> {
    Ok(serde_json::to_value(doc)?)
}

pub fn decode<D: Document>(value: JsonValue) -> Result<D, StoreError> {
    serde_json::from_value(value)
        .map_err(|e| StoreError::Serialization(format!("invalid {} document: {e}", D::COLLECTION)))
}

/// Queue an upsert of `doc` on `batch`.
pub fn stage_set<D: Document>(batch: &mut WriteBatch, doc: &D) -> Result<(), StoreError> {
    batch.set(D::COLLECTION, doc.document_id(), encode(doc)?);
    Ok(())
}

#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn DocumentStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub async fn list<D: Document>(&self) -> Result<Vec<D>, StoreError> {
        self.store
            .list(D::COLLECTION)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    pub async fn get<D: Document>(&self, id: &str) -> Result<Option<D>, StoreError> {
        self.store
            .get(D::COLLECTION, id)
            .await?
            .map(decode)
            .transpose()
    }

    /// Insert a new document; fails if the id is already taken.
    pub async fn create<D: Document>(&self, doc: &D) -> Result<(), StoreError> {
        let mut batch = WriteBatch::new();
        batch.create(D::COLLECTION, doc.document_id(), encode(doc)?);
        self.store.commit(batch).await
    }

    pub async fn save<D: Document>(&self, doc: &D) -> Result<(), StoreError> {
        let mut batch = WriteBatch::new();
        stage_set(&mut batch, doc)?;
        self.store.commit(batch).await
    }

    /// Remove a document. Removing an absent document succeeds.
    pub async fn delete<D: Document>(&self, id: &str) -> Result<(), StoreError> {
        let mut batch = WriteBatch::new();
        batch.delete(D::COLLECTION, id);
        self.store.commit(batch).await
    }

    pub async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        self.store.commit(batch).await
    }
}
