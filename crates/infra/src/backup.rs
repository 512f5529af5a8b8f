//! Whole-shop backup documents.
//!
//! A backup is one JSON object holding every collection plus the export time:
//!
//! ```json
//! { "customers": [...], "technicians": [...], "parts": [...],
//!   "categories": [...], "suppliers": [...], "repairJobs": [...],
//!   "exportedAt": "2023-10-10T12:00:00Z" }
//! ```
//!
//! `categories` and `suppliers` may be absent in older files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use repairdesk_core::{DomainError, DomainResult, require_text};
use repairdesk_inventory::{CatalogEntry, Part, PartCategory, Supplier};
use repairdesk_parties::{Customer, Technician};
use repairdesk_repairs::RepairJob;

use crate::repository::{Document, stage_set};
use crate::store::{Collection, StoreError, WriteBatch};

/// Keys a backup file must contain.
pub const REQUIRED_KEYS: [&str; 4] = ["customers", "technicians", "parts", "repairJobs"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub customers: Vec<Customer>,
    pub technicians: Vec<Technician>,
    pub parts: Vec<Part>,
    #[serde(default)]
    pub categories: Vec<PartCategory>,
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
    pub repair_jobs: Vec<RepairJob>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
}

impl Backup {
    /// Parse an uploaded backup file.
    pub fn from_json(value: JsonValue) -> DomainResult<Self> {
        let Some(object) = value.as_object() else {
            return Err(DomainError::validation("invalid backup format: expected a JSON object"));
        };

        for key in REQUIRED_KEYS {
            if !object.get(key).is_some_and(JsonValue::is_array) {
                return Err(DomainError::validation(format!(
                    "invalid backup format: '{key}' must be a list"
                )));
            }
        }

        let backup: Backup = serde_json::from_value(value)
            .map_err(|e| DomainError::validation(format!("invalid backup format: {e}")))?;
        backup.validate()?;
        Ok(backup)
    }

    /// Every document must satisfy the same rules as one entered by hand.
    pub fn validate(&self) -> DomainResult<()> {
        self.check_records()
            .map_err(|e| DomainError::validation(format!("invalid backup format: {e}")))
    }

    fn check_records(&self) -> DomainResult<()> {
        self.customers.iter().try_for_each(Customer::validate)?;
        self.technicians.iter().try_for_each(Technician::validate)?;
        self.parts.iter().try_for_each(Part::validate)?;
        for entry in &self.categories {
            require_text(PartCategory::KIND, entry.name())?;
        }
        for entry in &self.suppliers {
            require_text(Supplier::KIND, entry.name())?;
        }
        self.repair_jobs.iter().try_for_each(RepairJob::validate)
    }

    /// Suggested download name, e.g. `repairsys-backup-2023-10-10T12-00-00.json`.
    pub fn file_name(exported_at: DateTime<Utc>) -> String {
        format!("repairsys-backup-{}.json", exported_at.format("%Y-%m-%dT%H-%M-%S"))
    }

    /// One batch that clears every collection and writes this backup's
    /// documents in their place.
    pub fn restore_batch(&self) -> Result<WriteBatch, StoreError> {
        let mut batch = WriteBatch::new();
        for collection in Collection::ALL {
            batch.clear(collection);
        }

        stage_all(&mut batch, &self.customers)?;
        stage_all(&mut batch, &self.technicians)?;
        stage_all(&mut batch, &self.categories)?;
        stage_all(&mut batch, &self.suppliers)?;
        stage_all(&mut batch, &self.parts)?;
        stage_all(&mut batch, &self.repair_jobs)?;
        Ok(batch)
    }

    pub fn document_count(&self) -> usize {
        self.customers.len()
            + self.technicians.len()
            + self.parts.len()
            + self.categories.len()
            + self.suppliers.len()
            + self.repair_jobs.len()
    }
}

fn stage_all<D: Document>(batch: &mut WriteBatch, docs: &[D]) -> Result<(), StoreError> {
    docs.iter().try_for_each(|doc| stage_set(batch, doc))
}
