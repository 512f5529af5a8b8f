//! `repairdesk-core`: domain building blocks shared by every crate.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{require_text, DomainError, DomainResult};
pub use id::{CategoryId, CustomerId, PartId, RepairJobId, SupplierId, TechnicianId};
pub use value_object::{Money, ValueObject};
