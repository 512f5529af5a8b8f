//! Stock bookkeeping for parts consumed by jobs.
//!
//! A *stock consumer* (a repair job, in practice) holds a list of part
//! allocations and may or may not currently consume them. When a consumer is
//! created, changed or removed, the net effect on each part is the sum of
//! restoring whatever the old state consumed and consuming whatever the new
//! state needs:
//!
//! ```text
//! delta[p] = +Σ old allocations of p   (if old consumes stock)
//!            -Σ new allocations of p   (if new consumes stock)
//! ```
//!
//! [`StockDeltas`] computes that mapping and [`StockPlan`] validates it
//! against a snapshot of current stock levels. Applying the plan is left to
//! the caller's storage layer.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use repairdesk_core::PartId;

use crate::part::Part;

/// `quantity` units of a part assigned to a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartAllocation {
    pub part_id: PartId,
    pub quantity: u32,
}

impl PartAllocation {
    pub fn new(part_id: PartId, quantity: u32) -> Self {
        Self { part_id, quantity }
    }
}

/// Something that holds part allocations and may consume them from stock.
pub trait StockConsumer {
    fn allocations(&self) -> &[PartAllocation];

    /// Whether the allocations are currently deducted from stock.
    fn consumes_stock(&self) -> bool;
}

/// Lifecycle change of one consumer. "Neither before nor after" is not a
/// transition, so it cannot be expressed.
#[derive(Debug)]
pub enum StockTransition<'a, C> {
    Created(&'a C),
    Updated { before: &'a C, after: &'a C },
    Deleted(&'a C),
}

impl<C> Clone for StockTransition<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for StockTransition<'_, C> {}

impl<'a, C> StockTransition<'a, C> {
    pub fn before(&self) -> Option<&'a C> {
        match *self {
            StockTransition::Created(_) => None,
            StockTransition::Updated { before, .. } => Some(before),
            StockTransition::Deleted(before) => Some(before),
        }
    }

    pub fn after(&self) -> Option<&'a C> {
        match *self {
            StockTransition::Created(after) => Some(after),
            StockTransition::Updated { after, .. } => Some(after),
            StockTransition::Deleted(_) => None,
        }
    }
}

/// Net stock change per part for one transition. Parts whose changes cancel
/// out are not listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockDeltas(BTreeMap<PartId, i64>);

impl StockDeltas {
    pub fn for_transition<C: StockConsumer>(transition: &StockTransition<'_, C>) -> Self {
        let mut deltas: BTreeMap<PartId, i64> = BTreeMap::new();

        if let Some(before) = transition.before().filter(|c| c.consumes_stock()) {
            for a in before.allocations() {
                *deltas.entry(a.part_id.clone()).or_insert(0) += i64::from(a.quantity);
            }
        }

        if let Some(after) = transition.after().filter(|c| c.consumes_stock()) {
            for a in after.allocations() {
                *deltas.entry(a.part_id.clone()).or_insert(0) -= i64::from(a.quantity);
            }
        }

        deltas.retain(|_, delta| *delta != 0);
        Self(deltas)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Net change for `part_id` (zero when untouched).
    pub fn get(&self, part_id: &PartId) -> i64 {
        self.0.get(part_id).copied().unwrap_or(0)
    }

    /// Deltas in part id order.
    pub fn iter(&self) -> impl Iterator<Item = (&PartId, i64)> {
        self.0.iter().map(|(id, d)| (id, *d))
    }
}

/// New stock level for one part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockChange {
    pub part_id: PartId,
    pub previous: i64,
    pub stock: i64,
}

impl StockChange {
    pub fn delta(&self) -> i64 {
        self.stock - self.previous
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockError {
    #[error(
        "insufficient stock for {part_name} ({part_id}): {current} in stock, short by {shortfall}"
    )]
    InsufficientStock {
        part_id: PartId,
        part_name: String,
        current: i64,
        shortfall: i64,
    },

    #[error("stock of {part_name} ({part_id}) would leave the valid range: {current} changed by {delta}")]
    OutOfRange {
        part_id: PartId,
        part_name: String,
        current: i64,
        delta: i64,
    },
}

/// Validated set of stock changes, ready to be written as one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockPlan {
    changes: Vec<StockChange>,
    missing: Vec<PartId>,
}

impl StockPlan {
    /// Check every delta against `snapshot` without touching it.
    ///
    /// Parts absent from the snapshot are recorded in [`StockPlan::missing`]
    /// and otherwise ignored. The first part that would go negative aborts
    /// the whole plan.
    pub fn validate(deltas: &StockDeltas, snapshot: &HashMap<PartId, Part>) -> Result<Self, StockError> {
        let mut plan = StockPlan::default();

        for (part_id, delta) in deltas.iter() {
            let Some(part) = snapshot.get(part_id) else {
                plan.missing.push(part_id.clone());
                continue;
            };

            let Some(candidate) = part.stock.checked_add(delta) else {
                return Err(StockError::OutOfRange {
                    part_id: part_id.clone(),
                    part_name: part.name.clone(),
                    current: part.stock,
                    delta,
                });
            };
            if candidate < 0 {
                return Err(StockError::InsufficientStock {
                    part_id: part_id.clone(),
                    part_name: part.name.clone(),
                    current: part.stock,
                    shortfall: -candidate,
                });
            }

            plan.changes.push(StockChange {
                part_id: part_id.clone(),
                previous: part.stock,
                stock: candidate,
            });
        }

        Ok(plan)
    }

    pub fn changes(&self) -> &[StockChange] {
        &self.changes
    }

    /// Referenced parts that no longer exist.
    pub fn missing(&self) -> &[PartId] {
        &self.missing
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn into_changes(self) -> Vec<StockChange> {
        self.changes
    }
}
