use serde::Serialize;

use crate::backup::Backup;
use crate::seed::sample_data;

use super::{RepairShop, ServiceResult};

/// Document counts written by a restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreSummary {
    pub customers: usize,
    pub technicians: usize,
    pub parts: usize,
    pub categories: usize,
    pub suppliers: usize,
    pub repair_jobs: usize,
}

impl RestoreSummary {
    fn of(backup: &Backup) -> Self {
        Self {
            customers: backup.customers.len(),
            technicians: backup.technicians.len(),
            parts: backup.parts.len(),
            categories: backup.categories.len(),
            suppliers: backup.suppliers.len(),
            repair_jobs: backup.repair_jobs.len(),
        }
    }
}

impl RepairShop {
    pub async fn export_backup(&self) -> ServiceResult<Backup> {
        let _guard = self.write_lock.lock().await;
        let backup = Backup {
            customers: self.repo.list().await?,
            technicians: self.repo.list().await?,
            parts: self.repo.list().await?,
            categories: self.repo.list().await?,
            suppliers: self.repo.list().await?,
            repair_jobs: self.repo.list().await?,
            exported_at: Some(self.clock.now()),
        };
        tracing::info!(documents = backup.document_count(), "backup exported");
        Ok(backup)
    }

    /// Replace all shop data with `backup` in one atomic write. Stock levels
    /// are taken as they are in the backup; jobs are not reconciled.
    pub async fn import_backup(&self, backup: Backup) -> ServiceResult<RestoreSummary> {
        backup.validate()?;
        let batch = backup.restore_batch()?;

        let _guard = self.write_lock.lock().await;
        self.repo.commit(batch).await?;
        self.parts.invalidate().await;

        let summary = RestoreSummary::of(&backup);
        tracing::info!(documents = backup.document_count(), "backup restored");
        Ok(summary)
    }

    pub async fn seed_sample_data(&self) -> ServiceResult<RestoreSummary> {
        self.import_backup(sample_data()?).await
    }
}
