//! Inventory reconciliation for job lifecycle changes.
//!
//! Given the before/after state of one stock consumer, compute the net stock
//! change per part, validate it against a single snapshot of current stock
//! and write all of it in one batch. Either every affected part is updated
//! or none is.

use thiserror::Error;
use tracing::instrument;

use repairdesk_core::PartId;
use repairdesk_inventory::{StockChange, StockConsumer, StockDeltas, StockError, StockPlan, StockTransition};

use crate::ledger::StockLedger;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Stock(#[from] StockError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a reconciliation wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub changes: Vec<StockChange>,
    /// Referenced parts that no longer exist and were skipped.
    pub missing: Vec<PartId>,
}

impl ReconcileOutcome {
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }
}

#[instrument(skip_all, err)]
pub async fn reconcile_stock<C>(
    ledger: &dyn StockLedger,
    transition: StockTransition<'_, C>,
) -> Result<ReconcileOutcome, ReconcileError>
where
    C: StockConsumer + Sync,
{
    let deltas = StockDeltas::for_transition(&transition);
    if deltas.is_empty() {
        return Ok(ReconcileOutcome::default());
    }

    let snapshot = ledger.stock_snapshot().await?;
    let plan = StockPlan::validate(&deltas, &snapshot).inspect_err(|err| {
        tracing::info!(error = %err, "stock reconciliation rejected");
    })?;

    for part_id in plan.missing() {
        tracing::warn!(part_id = %part_id, "assigned part not found in inventory; skipping stock update");
    }

    let missing = plan.missing().to_vec();
    let changes = plan.into_changes();
    if !changes.is_empty() {
        ledger.commit_stock(&changes).await?;
        tracing::info!(parts = changes.len(), "stock reconciled");
    }

    Ok(ReconcileOutcome { changes, missing })
}
