//! Part stock access for reconciliation.
//!
//! [`StockLedger`] is what the reconciler needs from the part store: a
//! snapshot of current stock and an atomic multi-part stock write.
//! [`PartCache`] implements it over the document store and keeps an
//! in-memory mirror of the parts collection.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, json};
use tokio::sync::RwLock;

use repairdesk_core::PartId;
use repairdesk_inventory::{Part, StockChange};

use crate::repository::{Document, decode};
use crate::store::{DocumentStore, StoreError, WriteBatch};

#[async_trait]
pub trait StockLedger: Send + Sync {
    /// Current parts keyed by id.
    async fn stock_snapshot(&self) -> Result<HashMap<PartId, Part>, StoreError>;

    /// Write every change in one atomic batch.
    async fn commit_stock(&self, changes: &[StockChange]) -> Result<(), StoreError>;
}

/// Lazily loaded mirror of the parts collection.
///
/// Every part write made through the workshop must be reflected here with
/// [`PartCache::put`] / [`PartCache::remove`], or the cache dropped with
/// [`PartCache::invalidate`].
pub struct PartCache {
    store: Arc<dyn DocumentStore>,
    parts: RwLock<Option<HashMap<PartId, Part>>>,
}

impl PartCache {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store, parts: RwLock::new(None) }
    }

    async fn load(&self) -> Result<HashMap<PartId, Part>, StoreError> {
        let docs = self.store.list(Part::COLLECTION).await?;
        let mut parts = HashMap::with_capacity(docs.len());
        for doc in docs {
            let part: Part = decode(doc)?;
            parts.insert(part.id.clone(), part);
        }
        tracing::debug!(parts = parts.len(), "part cache loaded");
        Ok(parts)
    }

    pub async fn snapshot(&self) -> Result<HashMap<PartId, Part>, StoreError> {
        if let Some(parts) = self.parts.read().await.as_ref() {
            return Ok(parts.clone());
        }

        let mut guard = self.parts.write().await;
        if guard.is_none() {
            *guard = Some(self.load().await?);
        }
        Ok(guard.clone().unwrap_or_default())
    }

    /// Record a part that was just written to the store.
    pub async fn put(&self, part: Part) {
        if let Some(parts) = self.parts.write().await.as_mut() {
            parts.insert(part.id.clone(), part);
        }
    }

    pub async fn remove(&self, part_id: &PartId) {
        if let Some(parts) = self.parts.write().await.as_mut() {
            parts.remove(part_id);
        }
    }

    /// Forget everything; the next snapshot reloads from the store.
    pub async fn invalidate(&self) {
        *self.parts.write().await = None;
    }
}

#[async_trait]
impl StockLedger for PartCache {
    async fn stock_snapshot(&self) -> Result<HashMap<PartId, Part>, StoreError> {
        self.snapshot().await
    }

    async fn commit_stock(&self, changes: &[StockChange]) -> Result<(), StoreError> {
        if changes.is_empty() {
            return Ok(());
        }

        let mut batch = WriteBatch::new();
        for change in changes {
            let mut fields = Map::new();
            fields.insert("stock".to_string(), json!(change.stock));
            batch.merge(Part::COLLECTION, change.part_id.as_str(), fields);
        }

        if let Err(err) = self.store.commit(batch).await {
            // The store may have been changed behind our back; reload next time.
            self.invalidate().await;
            return Err(err);
        }

        if let Some(parts) = self.parts.write().await.as_mut() {
            for change in changes {
                if let Some(part) = parts.get_mut(&change.part_id) {
                    part.stock = change.stock;
                }
            }
        }
        Ok(())
    }
}
