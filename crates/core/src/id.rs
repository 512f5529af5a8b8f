//! Strongly-typed document identifiers used across the domain.
//!
//! Identifiers are opaque strings: generated ones are UUIDv7 text, but records
//! restored from a backup keep whatever id they were saved with (e.g. `P001`).

use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a customer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CustomerId(String);

/// Identifier of a technician.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TechnicianId(String);

/// Identifier of an inventory part.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PartId(String);

/// Identifier of a part category.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CategoryId(String);

/// Identifier of a part supplier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SupplierId(String);

/// Identifier of a repair job (not the human-readable repair code).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RepairJobId(String);

macro_rules! impl_document_id {
    ($t:ident, $name:literal) => {
        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
            /// for determinism.
            pub fn new() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::invalid_id(format!("{}: empty", $name)));
                }
                Ok(Self(trimmed.to_string()))
            }
        }

        impl<'de> Deserialize<'de> for $t {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

impl_document_id!(CustomerId, "CustomerId");
impl_document_id!(TechnicianId, "TechnicianId");
impl_document_id!(PartId, "PartId");
impl_document_id!(CategoryId, "CategoryId");
impl_document_id!(SupplierId, "SupplierId");
impl_document_id!(RepairJobId, "RepairJobId");

/// Serde helper for optional references (`technicianId`, `categoryId`, ...).
///
/// Absent, `null` and blank strings all mean "unassigned".
pub mod optional_ref {
    use core::fmt::Display;
    use core::str::FromStr;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: Display,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            Some(s) if !s.trim().is_empty() => {
                s.parse().map(Some).map_err(serde::de::Error::custom)
            }
            _ => Ok(None),
        }
    }

    /// Patch form: an absent field means "leave unchanged" (`None`), while
    /// `null` or a blank string means "clear the reference" (`Some(None)`).
    /// Pair with `#[serde(default)]`.
    pub fn patch<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: Display,
    {
        deserialize(deserializer).map(Some)
    }
}
