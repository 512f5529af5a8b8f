use repairdesk_core::{CustomerId, RepairJobId, TechnicianId};
use repairdesk_inventory::{Part, StockTransition};
use repairdesk_parties::{Customer, Technician};
use repairdesk_repairs::{
    DashboardSummary, JobFilter, MonitorBoard, NewRepairJob, RepairCode, RepairJob, RepairJobPatch,
    RepairStatus, price_allocations,
};

use super::{RepairShop, ServiceResult};
use crate::reconciler::reconcile_stock;

impl RepairShop {
    pub async fn list_jobs(&self, filter: &JobFilter) -> ServiceResult<Vec<RepairJob>> {
        let jobs: Vec<RepairJob> = self.repo.list().await?;
        Ok(jobs.into_iter().filter(|j| filter.matches(j)).collect())
    }

    pub async fn get_job(&self, id: &RepairJobId) -> ServiceResult<RepairJob> {
        self.require("repair job", id.as_str()).await
    }

    /// Open a job. The job is stored first and then reconciled; if the
    /// reconciliation fails the job is removed again.
    pub async fn create_job(&self, draft: NewRepairJob) -> ServiceResult<RepairJob> {
        let _guard = self.write_lock.lock().await;

        self.require_customer(&draft.customer_id).await?;
        if let Some(technician_id) = &draft.technician_id {
            self.require_technician(technician_id).await?;
        }

        let existing: Vec<RepairJob> = self.repo.list().await?;
        let code = RepairCode::next_after(existing.iter().map(|j| &j.repair_code));

        let catalogue = self.parts.snapshot().await?;
        let parts_cost = price_allocations(&draft.assigned_parts, &catalogue);
        let job = RepairJob::open(RepairJobId::new(), code, draft, parts_cost, self.clock.today())?;

        self.repo.create(&job).await?;

        if let Err(err) = reconcile_stock(&self.parts, StockTransition::Created(&job)).await {
            tracing::warn!(job_id = %job.id, repair_code = %job.repair_code, error = %err, "reconciliation failed; removing new job");
            if let Err(cleanup) = self.repo.delete::<RepairJob>(job.id.as_str()).await {
                tracing::error!(job_id = %job.id, error = %cleanup, "failed to remove job after failed reconciliation");
            }
            return Err(err.into());
        }

        tracing::info!(job_id = %job.id, repair_code = %job.repair_code, status = %job.status, "repair job opened");
        Ok(job)
    }

    /// Apply an edit. Stock is reconciled before the job is written, so a
    /// rejected edit leaves both untouched.
    pub async fn update_job(&self, id: &RepairJobId, patch: RepairJobPatch) -> ServiceResult<RepairJob> {
        let _guard = self.write_lock.lock().await;

        let current: RepairJob = self.require("repair job", id.as_str()).await?;
        if let Some(Some(technician_id)) = &patch.technician_id {
            self.require_technician(technician_id).await?;
        }

        let reprice = patch.touches_parts();
        let mut updated = current.patched(patch, self.clock.today())?;
        if reprice {
            let catalogue = self.parts.snapshot().await?;
            let parts_cost = price_allocations(&updated.assigned_parts, &catalogue);
            updated = updated.with_parts_cost(parts_cost);
        }

        reconcile_stock(&self.parts, StockTransition::Updated { before: &current, after: &updated }).await?;

        if let Err(err) = self.repo.save(&updated).await {
            self.revert_stock(StockTransition::Updated { before: &updated, after: &current }).await;
            return Err(err.into());
        }

        if updated.status != current.status {
            tracing::info!(job_id = %id, from = %current.status, to = %updated.status, "repair status changed");
        }
        Ok(updated)
    }

    pub async fn change_status(&self, id: &RepairJobId, status: RepairStatus) -> ServiceResult<RepairJob> {
        self.update_job(id, RepairJobPatch::status(status)).await
    }

    /// Remove a job, giving back whatever it consumed.
    pub async fn delete_job(&self, id: &RepairJobId) -> ServiceResult<()> {
        let _guard = self.write_lock.lock().await;

        let current: RepairJob = self.require("repair job", id.as_str()).await?;
        reconcile_stock(&self.parts, StockTransition::Deleted(&current)).await?;

        if let Err(err) = self.repo.delete::<RepairJob>(id.as_str()).await {
            self.revert_stock(StockTransition::Created(&current)).await;
            return Err(err.into());
        }

        tracing::info!(job_id = %id, repair_code = %current.repair_code, "repair job deleted");
        Ok(())
    }

    pub async fn dashboard(&self) -> ServiceResult<DashboardSummary> {
        let jobs: Vec<RepairJob> = self.repo.list().await?;
        let parts: Vec<Part> = self.repo.list().await?;
        Ok(DashboardSummary::compute(&jobs, &parts, self.low_stock_threshold))
    }

    pub async fn monitor_board(&self) -> ServiceResult<MonitorBoard> {
        let jobs: Vec<RepairJob> = self.repo.list().await?;
        let customers: Vec<Customer> = self.repo.list().await?;
        let technicians: Vec<Technician> = self.repo.list().await?;
        Ok(MonitorBoard::build(&jobs, &customers, &technicians, self.clock.today()))
    }

    async fn require_customer(&self, id: &CustomerId) -> ServiceResult<Customer> {
        self.require("customer", id.as_str()).await
    }

    async fn require_technician(&self, id: &TechnicianId) -> ServiceResult<Technician> {
        self.require("technician", id.as_str()).await
    }

    /// Undo an applied reconciliation after the job write failed.
    async fn revert_stock(&self, transition: StockTransition<'_, RepairJob>) {
        if let Err(err) = reconcile_stock(&self.parts, transition).await {
            tracing::error!(error = %err, "failed to revert stock after job write failure");
        }
    }
}

#[cfg(test)]
mod tests {
    use repairdesk_core::{DomainError, Money, PartId};
    use repairdesk_inventory::{PartAllocation, StockError};
    use repairdesk_repairs::{AgeBadge, DeviceType};

    use super::*;
    use crate::workshop::ServiceError;
    use crate::workshop::testing::{customer, day, new_part, shop, technician};

    struct Fixture {
        shop: RepairShop,
        customer: CustomerId,
        screen: PartId,
        battery: PartId,
    }

    async fn fixture() -> Fixture {
        let shop = shop();
        let customer = shop.create_customer(customer("Somchai")).await.unwrap().id;
        let screen = shop.create_part(new_part("iPhone 13 Screen", 5, 2500)).await.unwrap().id;
        let battery = shop.create_part(new_part("Samsung S22 Battery", 10, 1800)).await.unwrap().id;
        Fixture { shop, customer, screen, battery }
    }

    impl Fixture {
        fn draft(&self, status: Option<RepairStatus>, parts: &[(&PartId, u32)]) -> NewRepairJob {
            NewRepairJob {
                customer_id: self.customer.clone(),
                technician_id: None,
                device_type: DeviceType::Mobile,
                device_model: "iPhone 13 Pro".to_string(),
                issue_description: "Cracked screen".to_string(),
                labor_cost: Money::new(800),
                assigned_parts: parts.iter().map(|(p, q)| PartAllocation::new((*p).clone(), *q)).collect(),
                notes: None,
                status,
                received_date: None,
            }
        }

        async fn stock(&self, id: &PartId) -> i64 {
            self.shop.get_part(id).await.unwrap().stock
        }

        async fn job_count(&self) -> usize {
            self.shop.list_jobs(&JobFilter::default()).await.unwrap().len()
        }
    }

    #[tokio::test]
    async fn open_jobs_never_change_stock() {
        let f = fixture().await;
        let job = f.shop.create_job(f.draft(None, &[(&f.screen, 2)])).await.unwrap();
        assert_eq!(job.status, RepairStatus::Received);
        assert_eq!(job.received_date, day(10));
        assert_eq!(job.parts_cost, Money::new(5000));
        assert_eq!(f.stock(&f.screen).await, 5);

        f.shop
            .update_job(&job.id, RepairJobPatch::assigned_parts(vec![PartAllocation::new(f.screen.clone(), 4)]))
            .await
            .unwrap();
        f.shop.change_status(&job.id, RepairStatus::AwaitingParts).await.unwrap();
        assert_eq!(f.stock(&f.screen).await, 5);
    }

    #[tokio::test]
    async fn completing_deducts_and_cancelling_restores() {
        let f = fixture().await;
        let job = f.shop.create_job(f.draft(None, &[(&f.screen, 2)])).await.unwrap();

        let done = f.shop.change_status(&job.id, RepairStatus::Completed).await.unwrap();
        assert_eq!(done.completed_date, Some(day(10)));
        assert_eq!(f.stock(&f.screen).await, 3);

        f.shop.change_status(&job.id, RepairStatus::Returned).await.unwrap();
        assert_eq!(f.stock(&f.screen).await, 3);

        f.shop.change_status(&job.id, RepairStatus::Cancelled).await.unwrap();
        assert_eq!(f.stock(&f.screen).await, 5);
    }

    #[tokio::test]
    async fn completing_beyond_stock_is_rejected_and_nothing_changes() {
        let f = fixture().await;
        let job = f
            .shop
            .create_job(f.draft(None, &[(&f.screen, 6), (&f.battery, 1)]))
            .await
            .unwrap();

        let err = f.shop.change_status(&job.id, RepairStatus::Completed).await.unwrap_err();
        match err {
            ServiceError::InsufficientStock(StockError::InsufficientStock { part_id, current, shortfall, .. }) => {
                assert_eq!(part_id, f.screen);
                assert_eq!(current, 5);
                assert_eq!(shortfall, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert_eq!(f.stock(&f.screen).await, 5);
        assert_eq!(f.stock(&f.battery).await, 10);
        assert_eq!(f.shop.get_job(&job.id).await.unwrap().status, RepairStatus::Received);
    }

    #[tokio::test]
    async fn second_completion_fails_and_leaves_no_job_behind() {
        let f = fixture().await;
        f.shop
            .create_job(f.draft(Some(RepairStatus::Completed), &[(&f.screen, 5)]))
            .await
            .unwrap();
        assert_eq!(f.stock(&f.screen).await, 0);

        let err = f
            .shop
            .create_job(f.draft(Some(RepairStatus::Completed), &[(&f.screen, 1)]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::InsufficientStock(StockError::InsufficientStock { current: 0, shortfall: 1, .. })
        ));
        assert_eq!(f.stock(&f.screen).await, 0);
        assert_eq!(f.job_count().await, 1);
    }

    #[tokio::test]
    async fn deleting_completed_job_restores_every_part() {
        let f = fixture().await;
        let job = f
            .shop
            .create_job(f.draft(Some(RepairStatus::Completed), &[(&f.screen, 2), (&f.battery, 1)]))
            .await
            .unwrap();
        assert_eq!(f.stock(&f.screen).await, 3);
        assert_eq!(f.stock(&f.battery).await, 9);

        f.shop.delete_job(&job.id).await.unwrap();
        assert_eq!(f.stock(&f.screen).await, 5);
        assert_eq!(f.stock(&f.battery).await, 10);
        assert_eq!(f.job_count().await, 0);
    }

    #[tokio::test]
    async fn restock_past_the_stock_limit_is_refused() {
        let f = fixture().await;
        let job = f.shop.create_job(f.draft(Some(RepairStatus::Completed), &[(&f.screen, 1)])).await.unwrap();
        f.shop.update_part(&f.screen, new_part("iPhone 13 Screen", i64::MAX, 2500)).await.unwrap();

        let err = f.shop.delete_job(&job.id).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::InsufficientStock(StockError::OutOfRange { current: i64::MAX, delta: 1, .. })
        ));
        let err = f.shop.change_status(&job.id, RepairStatus::Cancelled).await.unwrap_err();
        assert!(matches!(err, ServiceError::InsufficientStock(StockError::OutOfRange { .. })));

        assert_eq!(f.stock(&f.screen).await, i64::MAX);
        assert_eq!(f.shop.get_job(&job.id).await.unwrap().status, RepairStatus::Completed);
    }

    #[tokio::test]
    async fn editing_completed_job_parts_nets_the_difference() {
        let f = fixture().await;
        let job = f
            .shop
            .create_job(f.draft(Some(RepairStatus::Completed), &[(&f.screen, 3)]))
            .await
            .unwrap();
        assert_eq!(f.stock(&f.screen).await, 2);

        let edited = f
            .shop
            .update_job(&job.id, RepairJobPatch::assigned_parts(vec![PartAllocation::new(f.screen.clone(), 1)]))
            .await
            .unwrap();
        assert_eq!(f.stock(&f.screen).await, 4);
        assert_eq!(edited.parts_cost, Money::new(2500));
    }

    #[tokio::test]
    async fn repair_codes_stay_unique_after_deletions() {
        let f = fixture().await;
        let first = f.shop.create_job(f.draft(None, &[])).await.unwrap();
        let second = f.shop.create_job(f.draft(None, &[])).await.unwrap();
        assert_eq!(first.repair_code.as_str(), "RP-000001");
        assert_eq!(second.repair_code.as_str(), "RP-000002");

        f.shop.delete_job(&first.id).await.unwrap();
        let third = f.shop.create_job(f.draft(None, &[])).await.unwrap();
        assert_eq!(third.repair_code.as_str(), "RP-000003");
    }

    #[tokio::test]
    async fn job_references_must_exist() {
        let f = fixture().await;

        let mut draft = f.draft(None, &[]);
        draft.customer_id = "C404".parse().unwrap();
        let err = f.shop.create_job(draft).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::NotFound(_))));

        let mut draft = f.draft(None, &[]);
        draft.technician_id = Some("T404".parse().unwrap());
        assert!(f.shop.create_job(draft).await.is_err());
        assert_eq!(f.job_count().await, 0);

        let tech = f.shop.create_technician(technician("Wichai")).await.unwrap();
        let job = f.shop.create_job(f.draft(None, &[])).await.unwrap();
        let patch = RepairJobPatch { technician_id: Some(Some(tech.id.clone())), ..RepairJobPatch::default() };
        let assigned = f.shop.update_job(&job.id, patch).await.unwrap();
        assert_eq!(assigned.technician_id, Some(tech.id));
    }

    #[tokio::test]
    async fn workload_dashboard_and_board() {
        let f = fixture().await;
        let tech = f.shop.create_technician(technician("Wichai")).await.unwrap();

        let mut draft = f.draft(Some(RepairStatus::InProgress), &[]);
        draft.technician_id = Some(tech.id.clone());
        draft.received_date = Some(day(1));
        f.shop.create_job(draft).await.unwrap();
        f.shop
            .create_job(f.draft(Some(RepairStatus::Completed), &[(&f.screen, 1)]))
            .await
            .unwrap();

        assert_eq!(f.shop.technician_workload(&tech.id).await.unwrap(), 1);

        let summary = f.shop.dashboard().await.unwrap();
        assert_eq!(summary.active_jobs, 1);
        assert_eq!(summary.total_revenue, Money::new(800 + 2500));
        assert_eq!(summary.labor_revenue, Money::new(800));
        assert_eq!(summary.low_stock_parts, 1);

        let board = f.shop.monitor_board().await.unwrap();
        let bench = board.column(RepairStatus::InProgress).unwrap();
        assert_eq!(bench.cards.len(), 1);
        assert_eq!(bench.cards[0].days_in_shop, 9);
        assert_eq!(bench.cards[0].badge, AgeBadge::Overdue);
        assert_eq!(bench.cards[0].technician_name.as_deref(), Some("Wichai"));
        assert_eq!(bench.cards[0].customer_name.as_deref(), Some("Somchai"));
    }

    #[tokio::test]
    async fn filter_by_status_and_text() {
        let f = fixture().await;
        f.shop.create_job(f.draft(None, &[])).await.unwrap();
        let mut other = f.draft(Some(RepairStatus::InProgress), &[]);
        other.device_model = "Dell XPS 15".to_string();
        f.shop.create_job(other).await.unwrap();

        let in_progress = JobFilter { status: Some(RepairStatus::InProgress), ..JobFilter::default() };
        assert_eq!(f.shop.list_jobs(&in_progress).await.unwrap().len(), 1);

        let dell = JobFilter { text: Some("xps".to_string()), ..JobFilter::default() };
        assert_eq!(f.shop.list_jobs(&dell).await.unwrap()[0].device_model, "Dell XPS 15");
    }
}
