//! Parties domain module (customers bringing devices in, technicians fixing them).
//!
//! Pure domain logic: validation and normalization of party records.

pub mod customer;
pub mod technician;

pub use customer::{ContactInfo, Customer, CustomerDetails};
pub use technician::{Technician, TechnicianDetails};
