//! Infrastructure layer: document storage, stock reconciliation and the
//! workshop application service.

pub mod backup;
pub mod clock;
pub mod config;
pub mod ledger;
pub mod reconciler;
pub mod repository;
pub mod seed;
pub mod store;
pub mod workshop;


pub use backup::Backup;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use ledger::{PartCache, StockLedger};
pub use reconciler::{ReconcileError, ReconcileOutcome, reconcile_stock};
pub use repository::{Document, Repository};
pub use store::{Collection, Datastore, DocumentStore, StoreBackend, StoreError, WriteBatch, WriteOp};
pub use workshop::{RepairShop, RestoreSummary, ServiceError, ServiceResult};
