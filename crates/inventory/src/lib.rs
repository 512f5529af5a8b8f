//! Inventory domain module.
//!
//! This crate contains business rules for parts, their categories and
//! suppliers, and the stock bookkeeping driven by repair jobs. It is pure
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod catalog;
pub mod part;
pub mod stock;

pub use catalog::{CatalogEntry, PartCategory, Supplier};
pub use part::{AdjustmentKind, NewPart, Part, StockAdjustment};
pub use stock::{
    PartAllocation, StockChange, StockConsumer, StockDeltas, StockError, StockPlan,
    StockTransition,
};
