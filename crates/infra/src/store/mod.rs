//! Document-store boundary.
//!
//! Records are JSON documents grouped in named collections and addressed by a
//! string id. Reads go through [`DocumentStore::list`] / [`DocumentStore::get`];
//! every write goes through [`DocumentStore::commit`] as a [`WriteBatch`] that
//! is applied atomically (all operations or none).

pub mod in_memory;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

pub use in_memory::InMemoryDocumentStore;
pub use sqlite::SqliteDocumentStore;

/// Named document collections.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Customers,
    Technicians,
    Parts,
    Categories,
    Suppliers,
    RepairJobs,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Customers,
        Collection::Technicians,
        Collection::Parts,
        Collection::Categories,
        Collection::Suppliers,
        Collection::RepairJobs,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Customers => "customers",
            Collection::Technicians => "technicians",
            Collection::Parts => "parts",
            Collection::Categories => "categories",
            Collection::Suppliers => "suppliers",
            Collection::RepairJobs => "repairJobs",
        }
    }
}

impl core::fmt::Display for Collection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One operation inside a [`WriteBatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Insert a new document. Fails with [`StoreError::AlreadyExists`] if the id is taken.
    Create { collection: Collection, id: String, data: JsonValue },
    /// Insert or replace.
    Set { collection: Collection, id: String, data: JsonValue },
    /// Overwrite the given top-level fields of an existing document.
    /// Fails with [`StoreError::NotFound`] if the document is missing.
    Merge { collection: Collection, id: String, fields: Map<String, JsonValue> },
    /// Remove a document. Removing an absent document succeeds.
    Delete { collection: Collection, id: String },
    /// Remove every document of a collection.
    Clear(Collection),
}

/// Ordered list of writes committed as a unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, collection: Collection, id: impl Into<String>, data: JsonValue) -> &mut Self {
        self.ops.push(WriteOp::Create { collection, id: id.into(), data });
        self
    }

    pub fn set(&mut self, collection: Collection, id: impl Into<String>, data: JsonValue) -> &mut Self {
        self.ops.push(WriteOp::Set { collection, id: id.into(), data });
        self
    }

    pub fn merge(
        &mut self,
        collection: Collection,
        id: impl Into<String>,
        fields: Map<String, JsonValue>,
    ) -> &mut Self {
        self.ops.push(WriteOp::Merge { collection, id: id.into(), fields });
        self
    }

    pub fn delete(&mut self, collection: Collection, id: impl Into<String>) -> &mut Self {
        self.ops.push(WriteOp::Delete { collection, id: id.into() });
        self
    }

    pub fn clear(&mut self, collection: Collection) -> &mut Self {
        self.ops.push(WriteOp::Clear(collection));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

/// Storage-level failure.
///
/// These are infrastructure errors, as opposed to the domain errors raised by
/// validation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document {collection}/{id} not found")]
    NotFound { collection: Collection, id: String },

    #[error("document {collection}/{id} already exists")]
    AlreadyExists { collection: Collection, id: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Document database port.
///
/// Implementations must apply a [`WriteBatch`] atomically: if any operation
/// fails, none of the batch is visible afterwards.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents of a collection, ordered by id.
    async fn list(&self, collection: Collection) -> Result<Vec<JsonValue>, StoreError>;

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<JsonValue>, StoreError>;

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn list(&self, collection: Collection) -> Result<Vec<JsonValue>, StoreError> {
        (**self).list(collection).await
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<JsonValue>, StoreError> {
        (**self).get(collection, id).await
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        (**self).commit(batch).await
    }
}

/// Which backend to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    /// SQLite database at the given `sqlite:` URL.
    Sqlite { url: String },
}

/// The configured document store.
#[derive(Clone)]
pub enum Datastore {
    InMemory(Arc<InMemoryDocumentStore>),
    Sqlite(Arc<SqliteDocumentStore>),
}

impl Datastore {
    pub async fn open(backend: &StoreBackend) -> Result<Self, StoreError> {
        match backend {
            StoreBackend::Memory => {
                tracing::info!(backend = "memory", "opening document store");
                Ok(Datastore::InMemory(Arc::new(InMemoryDocumentStore::new())))
            }
            StoreBackend::Sqlite { url } => {
                tracing::info!(backend = "sqlite", %url, "opening document store");
                let store = SqliteDocumentStore::connect(url).await?;
                Ok(Datastore::Sqlite(Arc::new(store)))
            }
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Datastore::InMemory(_) => "memory",
            Datastore::Sqlite(_) => "sqlite",
        }
    }

    /// Type-erased handle for the service layer.
    pub fn as_store(&self) -> Arc<dyn DocumentStore> {
        match self {
            Datastore::InMemory(s) => s.clone(),
            Datastore::Sqlite(s) => s.clone(),
        }
    }
}

/// Overwrite `fields` on a JSON object document.
pub(crate) fn merge_fields(
    document: &mut JsonValue,
    fields: &Map<String, JsonValue>,
) -> Result<(), StoreError> {
    let object = document
        .as_object_mut()
        .ok_or_else(|| StoreError::Serialization("document is not a JSON object".to_string()))?;
    for (key, value) in fields {
        object.insert(key.clone(), value.clone());
    }
    Ok(())
}
