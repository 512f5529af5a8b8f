use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use repairdesk_core::id::optional_ref;
use repairdesk_core::{
    CustomerId, DomainError, DomainResult, Entity, Money, PartId, RepairJobId, TechnicianId,
    require_text,
};
use repairdesk_inventory::{Part, PartAllocation, StockConsumer};

use crate::code::RepairCode;
use crate::status::{DeviceType, RepairStatus};

/// A device in for repair, from intake to hand-back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairJob {
    pub id: RepairJobId,
    pub repair_code: RepairCode,
    pub customer_id: CustomerId,
    #[serde(
        default,
        deserialize_with = "optional_ref::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub technician_id: Option<TechnicianId>,
    #[serde(default)]
    pub device_type: DeviceType,
    pub device_model: String,
    pub issue_description: String,
    pub status: RepairStatus,
    pub received_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<NaiveDate>,
    #[serde(default)]
    pub labor_cost: Money,
    #[serde(default)]
    pub parts_cost: Money,
    #[serde(default)]
    pub assigned_parts: Vec<PartAllocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Intake form for a new job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRepairJob {
    pub customer_id: CustomerId,
    #[serde(default, deserialize_with = "optional_ref::deserialize")]
    pub technician_id: Option<TechnicianId>,
    #[serde(default)]
    pub device_type: DeviceType,
    pub device_model: String,
    pub issue_description: String,
    #[serde(default)]
    pub labor_cost: Money,
    #[serde(default)]
    pub assigned_parts: Vec<PartAllocation>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Defaults to [`RepairStatus::Received`].
    #[serde(default)]
    pub status: Option<RepairStatus>,
    /// Defaults to the intake day.
    #[serde(default)]
    pub received_date: Option<NaiveDate>,
}

/// Edit of an existing job. Absent fields are left unchanged. The customer and
/// the repair code cannot be changed after intake.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairJobPatch {
    #[serde(default, deserialize_with = "optional_ref::patch")]
    pub technician_id: Option<Option<TechnicianId>>,
    pub device_type: Option<DeviceType>,
    pub device_model: Option<String>,
    pub issue_description: Option<String>,
    pub labor_cost: Option<Money>,
    pub assigned_parts: Option<Vec<PartAllocation>>,
    pub notes: Option<String>,
    pub status: Option<RepairStatus>,
}

impl RepairJobPatch {
    pub fn status(status: RepairStatus) -> Self {
        Self { status: Some(status), ..Self::default() }
    }

    pub fn assigned_parts(parts: Vec<PartAllocation>) -> Self {
        Self { assigned_parts: Some(parts), ..Self::default() }
    }

    /// Whether applying this patch can change the parts cost.
    pub fn touches_parts(&self) -> bool {
        self.assigned_parts.is_some()
    }
}

/// Merge allocations of the same part into one line, keeping first-seen order.
pub fn merge_allocations(allocations: Vec<PartAllocation>) -> Vec<PartAllocation> {
    let mut merged: Vec<PartAllocation> = Vec::with_capacity(allocations.len());
    for a in allocations {
        match merged.iter_mut().find(|m| m.part_id == a.part_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(a.quantity),
            None => merged.push(a),
        }
    }
    merged
}

/// Parts cost at catalogue prices. Parts no longer in the catalogue cost nothing.
pub fn price_allocations(allocations: &[PartAllocation], catalogue: &HashMap<PartId, Part>) -> Money {
    allocations
        .iter()
        .filter_map(|a| catalogue.get(&a.part_id).map(|p| p.price.times(a.quantity)))
        .sum()
}

fn clean_notes(notes: Option<String>) -> Option<String> {
    notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

impl RepairJob {
    /// Open a job from an intake form. `parts_cost` is priced by the caller
    /// (see [`price_allocations`]).
    pub fn open(
        id: RepairJobId,
        repair_code: RepairCode,
        draft: NewRepairJob,
        parts_cost: Money,
        today: NaiveDate,
    ) -> DomainResult<Self> {
        let mut job = Self {
            id,
            repair_code,
            customer_id: draft.customer_id,
            technician_id: draft.technician_id,
            device_type: draft.device_type,
            device_model: draft.device_model.trim().to_string(),
            issue_description: draft.issue_description.trim().to_string(),
            status: RepairStatus::Received,
            received_date: draft.received_date.unwrap_or(today),
            completed_date: None,
            labor_cost: draft.labor_cost,
            parts_cost,
            assigned_parts: merge_allocations(draft.assigned_parts),
            notes: clean_notes(draft.notes),
        };
        job.set_status(draft.status.unwrap_or(RepairStatus::Received), today);
        job.validate()?;
        Ok(job)
    }

    /// Return the job as it would look after `patch`. The parts cost is left
    /// as-is; reprice with [`RepairJob::with_parts_cost`] when
    /// [`RepairJobPatch::touches_parts`].
    pub fn patched(&self, patch: RepairJobPatch, today: NaiveDate) -> DomainResult<Self> {
        let mut job = self.clone();

        if let Some(technician_id) = patch.technician_id {
            job.technician_id = technician_id;
        }
        if let Some(device_type) = patch.device_type {
            job.device_type = device_type;
        }
        if let Some(model) = patch.device_model {
            job.device_model = model.trim().to_string();
        }
        if let Some(issue) = patch.issue_description {
            job.issue_description = issue.trim().to_string();
        }
        if let Some(labor) = patch.labor_cost {
            job.labor_cost = labor;
        }
        if let Some(parts) = patch.assigned_parts {
            job.assigned_parts = merge_allocations(parts);
        }
        if let Some(notes) = patch.notes {
            job.notes = clean_notes(Some(notes));
        }
        if let Some(status) = patch.status {
            job.set_status(status, today);
        }

        job.validate()?;
        Ok(job)
    }

    pub fn with_parts_cost(mut self, parts_cost: Money) -> Self {
        self.parts_cost = parts_cost;
        self
    }

    /// Move to `status`. Finishing stamps the completion day once; going back
    /// to the bench clears it.
    pub fn set_status(&mut self, status: RepairStatus, today: NaiveDate) {
        self.status = status;
        if status.is_stock_affecting() {
            self.completed_date.get_or_insert(today);
        } else if status.is_active() {
            self.completed_date = None;
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        require_text("device model", &self.device_model)?;
        require_text("issue description", &self.issue_description)?;
        if let Some(a) = self.assigned_parts.iter().find(|a| a.quantity == 0) {
            return Err(DomainError::validation(format!(
                "quantity for part {} must be greater than zero",
                a.part_id
            )));
        }
        Ok(())
    }

    pub fn total_cost(&self) -> Money {
        self.labor_cost + self.parts_cost
    }
}

impl Entity for RepairJob {
    type Id = RepairJobId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl StockConsumer for RepairJob {
    fn allocations(&self) -> &[PartAllocation] {
        &self.assigned_parts
    }

    fn consumes_stock(&self) -> bool {
        self.status.is_stock_affecting()
    }
}
