//! Repairs domain module.
//!
//! Repair jobs and their status lifecycle, plus the read-side views the shop
//! floor works from (monitor board, dashboard summary, technician workload).
//! Pure domain logic: "today" is always passed in, never read from a clock.

pub mod board;
pub mod code;
pub mod filter;
pub mod job;
pub mod status;
pub mod summary;

pub use board::{AgeBadge, BOARD_COLUMNS, BoardCard, BoardColumn, MonitorBoard, days_since};
pub use code::RepairCode;
pub use filter::JobFilter;
pub use job::{NewRepairJob, RepairJob, RepairJobPatch, merge_allocations, price_allocations};
pub use status::{DeviceType, RepairStatus};
pub use summary::{DashboardSummary, StatusCount, technician_workload};
