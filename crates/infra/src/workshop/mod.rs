//! Workshop application service.
//!
//! [`RepairShop`] owns the repository and the part cache and is the only
//! writer of shop data. Writes that can move stock (job mutations, part
//! edits, restores) are serialized through one async mutex, so no two
//! reconciliations ever overlap.
//!
//! - `parties.rs`: customers and technicians
//! - `inventory.rs`: parts, categories and suppliers
//! - `jobs.rs`: repair jobs, dashboard and monitor board
//! - `backup.rs`: export, import and sample data

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use repairdesk_core::DomainError;
use repairdesk_inventory::StockError;

use crate::clock::Clock;
use crate::ledger::PartCache;
use crate::reconciler::ReconcileError;
use crate::repository::{Document, Repository};
use crate::store::{DocumentStore, StoreError};

mod backup;
mod inventory;
mod jobs;
mod parties;

pub use backup::RestoreSummary;

/// Service-level failure.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    InsufficientStock(#[from] StockError),

    #[error("{kind} {id} is still used by {parts} part(s)")]
    InUse { kind: &'static str, id: String, parts: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ReconcileError> for ServiceError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::Stock(e) => ServiceError::InsufficientStock(e),
            ReconcileError::Store(e) => ServiceError::Store(e),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub struct RepairShop {
    repo: Repository,
    parts: PartCache,
    clock: Arc<dyn Clock>,
    low_stock_threshold: i64,
    write_lock: Mutex<()>,
}

impl RepairShop {
    pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>, low_stock_threshold: i64) -> Self {
        Self {
            repo: Repository::new(store.clone()),
            parts: PartCache::new(store),
            clock,
            low_stock_threshold,
            write_lock: Mutex::new(()),
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    pub fn part_cache(&self) -> &PartCache {
        &self.parts
    }

    pub fn low_stock_threshold(&self) -> i64 {
        self.low_stock_threshold
    }

    /// Load a document or fail with `NotFound` naming it as `what <id>`.
    async fn require<D: Document>(&self, what: &str, id: &str) -> ServiceResult<D> {
        self.repo
            .get::<D>(id)
            .await?
            .ok_or_else(|| ServiceError::Domain(DomainError::not_found(format!("{what} {id}"))))
    }
}
