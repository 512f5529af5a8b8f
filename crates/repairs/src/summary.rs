use serde::Serialize;

use repairdesk_core::{Money, TechnicianId};
use repairdesk_inventory::Part;

use crate::job::RepairJob;
use crate::status::RepairStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: RepairStatus,
    pub count: usize,
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub active_jobs: usize,
    pub awaiting_parts: usize,
    pub low_stock_parts: usize,
    /// Labor plus parts over finished (completed or returned) jobs.
    pub total_revenue: Money,
    pub labor_revenue: Money,
    pub status_counts: Vec<StatusCount>,
}

impl DashboardSummary {
    pub fn compute(jobs: &[RepairJob], parts: &[Part], low_stock_threshold: i64) -> Self {
        let count = |status: RepairStatus| jobs.iter().filter(|j| j.status == status).count();
        let finished = || jobs.iter().filter(|j| j.status.is_stock_affecting());

        Self {
            active_jobs: jobs.iter().filter(|j| j.status.is_active()).count(),
            awaiting_parts: count(RepairStatus::AwaitingParts),
            low_stock_parts: parts.iter().filter(|p| p.is_low_stock(low_stock_threshold)).count(),
            total_revenue: finished().map(RepairJob::total_cost).sum(),
            labor_revenue: finished().map(|j| j.labor_cost).sum(),
            status_counts: RepairStatus::ALL
                .into_iter()
                .map(|status| StatusCount { status, count: count(status) })
                .collect(),
        }
    }

    pub fn count_for(&self, status: RepairStatus) -> usize {
        self.status_counts.iter().find(|c| c.status == status).map_or(0, |c| c.count)
    }
}

/// Jobs currently on a technician's bench (in progress or waiting for parts).
pub fn technician_workload(jobs: &[RepairJob], technician_id: &TechnicianId) -> usize {
    jobs.iter()
        .filter(|j| j.technician_id.as_ref() == Some(technician_id))
        .filter(|j| matches!(j.status, RepairStatus::InProgress | RepairStatus::AwaitingParts))
        .count()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use repairdesk_inventory::NewPart;

    use super::*;
    use crate::code::RepairCode;
    use crate::job::NewRepairJob;
    use crate::status::DeviceType;

    fn job(seq: u32, status: RepairStatus, labor: u64, parts: u64, tech: Option<&str>) -> RepairJob {
        RepairJob::open(
            format!("R{seq}").parse().unwrap(),
            RepairCode::from_sequence(seq),
            NewRepairJob {
                customer_id: "C001".parse().unwrap(),
                technician_id: tech.map(|t| t.parse().unwrap()),
                device_type: DeviceType::Mobile,
                device_model: "Galaxy S22".to_string(),
                issue_description: "Battery".to_string(),
                labor_cost: Money::new(labor),
                assigned_parts: vec![],
                notes: None,
                status: Some(status),
                received_date: None,
            },
            Money::new(parts),
            NaiveDate::from_ymd_opt(2023, 10, 1).unwrap(),
        )
        .unwrap()
    }

    fn part(id: &str, stock: i64) -> Part {
        Part::create(
            id.parse().unwrap(),
            NewPart {
                name: id.to_string(),
                stock,
                price: Money::new(1),
                category_id: None,
                supplier_id: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn summary_counts_and_revenue() {
        let jobs = vec![
            job(1, RepairStatus::Completed, 800, 2500, None),
            job(2, RepairStatus::InProgress, 1500, 3500, None),
            job(3, RepairStatus::AwaitingParts, 0, 0, None),
            job(4, RepairStatus::Returned, 1000, 3400, None),
            job(5, RepairStatus::Cancelled, 300, 0, None),
        ];
        let parts = vec![part("P1", 4), part("P2", 5), part("P3", 0)];

        let s = DashboardSummary::compute(&jobs, &parts, 5);
        assert_eq!(s.active_jobs, 2);
        assert_eq!(s.awaiting_parts, 1);
        assert_eq!(s.low_stock_parts, 2);
        assert_eq!(s.total_revenue, Money::new(7700));
        assert_eq!(s.labor_revenue, Money::new(1800));
        assert_eq!(s.count_for(RepairStatus::Cancelled), 1);
        assert_eq!(s.status_counts.len(), RepairStatus::ALL.len());
    }

    #[test]
    fn workload_counts_bench_jobs_for_one_technician() {
        let jobs = vec![
            job(1, RepairStatus::InProgress, 0, 0, Some("T1")),
            job(2, RepairStatus::AwaitingParts, 0, 0, Some("T1")),
            job(3, RepairStatus::Received, 0, 0, Some("T1")),
            job(4, RepairStatus::InProgress, 0, 0, Some("T2")),
        ];
        assert_eq!(technician_workload(&jobs, &"T1".parse().unwrap()), 2);
        assert_eq!(technician_workload(&jobs, &"T3".parse().unwrap()), 0);
    }
}
