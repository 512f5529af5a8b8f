//! Shop-floor monitor: active jobs grouped by stage with how long they have
//! been waiting.

use chrono::NaiveDate;
use serde::Serialize;

use repairdesk_core::RepairJobId;
use repairdesk_parties::{Customer, Technician};

use crate::code::RepairCode;
use crate::job::RepairJob;
use crate::status::{DeviceType, RepairStatus};

/// Columns shown on the board, in display order.
pub const BOARD_COLUMNS: [RepairStatus; 3] = [
    RepairStatus::Received,
    RepairStatus::AwaitingParts,
    RepairStatus::InProgress,
];

/// How long a device has been in the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeBadge {
    /// Under 4 days.
    Fresh,
    /// 4 to 7 days.
    Aging,
    /// More than a week.
    Overdue,
}

impl AgeBadge {
    pub fn for_days(days: i64) -> Self {
        match days {
            d if d < 4 => AgeBadge::Fresh,
            4..=7 => AgeBadge::Aging,
            _ => AgeBadge::Overdue,
        }
    }
}

/// Whole days between intake and `today`.
pub fn days_since(received: NaiveDate, today: NaiveDate) -> i64 {
    (today - received).num_days().abs()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardCard {
    pub job_id: RepairJobId,
    pub repair_code: RepairCode,
    /// `None` when the customer record no longer exists.
    pub customer_name: Option<String>,
    /// `None` when unassigned.
    pub technician_name: Option<String>,
    pub device_type: DeviceType,
    pub device_model: String,
    pub issue_description: String,
    pub days_in_shop: i64,
    pub badge: AgeBadge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardColumn {
    pub status: RepairStatus,
    pub cards: Vec<BoardCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorBoard {
    pub columns: Vec<BoardColumn>,
}

impl MonitorBoard {
    pub fn build(
        jobs: &[RepairJob],
        customers: &[Customer],
        technicians: &[Technician],
        today: NaiveDate,
    ) -> Self {
        let customer_name = |job: &RepairJob| {
            customers.iter().find(|c| c.id == job.customer_id).map(|c| c.name.clone())
        };
        let technician_name = |job: &RepairJob| {
            let id = job.technician_id.as_ref()?;
            technicians.iter().find(|t| &t.id == id).map(|t| t.name.clone())
        };

        let columns = BOARD_COLUMNS
            .into_iter()
            .map(|status| {
                let mut in_column: Vec<&RepairJob> = jobs.iter().filter(|j| j.status == status).collect();
                in_column.sort_by(|a, b| {
                    a.received_date.cmp(&b.received_date).then_with(|| a.repair_code.cmp(&b.repair_code))
                });

                let cards = in_column
                    .into_iter()
                    .map(|job| {
                        let days = days_since(job.received_date, today);
                        BoardCard {
                            job_id: job.id.clone(),
                            repair_code: job.repair_code.clone(),
                            customer_name: customer_name(job),
                            technician_name: technician_name(job),
                            device_type: job.device_type,
                            device_model: job.device_model.clone(),
                            issue_description: job.issue_description.clone(),
                            days_in_shop: days,
                            badge: AgeBadge::for_days(days),
                        }
                    })
                    .collect();

                BoardColumn { status, cards }
            })
            .collect();

        Self { columns }
    }

    pub fn column(&self, status: RepairStatus) -> Option<&BoardColumn> {
        self.columns.iter().find(|c| c.status == status)
    }
}

#[cfg(test)]
mod tests {
    use repairdesk_core::Money;
    use repairdesk_parties::{CustomerDetails, TechnicianDetails};

    use super::*;
    use crate::job::NewRepairJob;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 10, d).unwrap()
    }

    fn job(seq: u32, status: RepairStatus, received: u32, tech: Option<&str>) -> RepairJob {
        RepairJob::open(
            format!("R{seq}").parse().unwrap(),
            RepairCode::from_sequence(seq),
            NewRepairJob {
                customer_id: "C001".parse().unwrap(),
                technician_id: tech.map(|t| t.parse().unwrap()),
                device_type: DeviceType::Tablet,
                device_model: "iPad Air".to_string(),
                issue_description: "Charging port".to_string(),
                labor_cost: Money::ZERO,
                assigned_parts: vec![],
                notes: None,
                status: Some(status),
                received_date: Some(day(received)),
            },
            Money::ZERO,
            day(received),
        )
        .unwrap()
    }

    #[test]
    fn badges_follow_day_thresholds() {
        assert_eq!(AgeBadge::for_days(0), AgeBadge::Fresh);
        assert_eq!(AgeBadge::for_days(3), AgeBadge::Fresh);
        assert_eq!(AgeBadge::for_days(4), AgeBadge::Aging);
        assert_eq!(AgeBadge::for_days(7), AgeBadge::Aging);
        assert_eq!(AgeBadge::for_days(8), AgeBadge::Overdue);
    }

    #[test]
    fn board_groups_active_jobs_only_oldest_first() {
        let customers = vec![
            Customer::register(
                "C001".parse().unwrap(),
                CustomerDetails { name: "Somchai".to_string(), phone: "081".to_string(), contact: Default::default() },
            )
            .unwrap(),
        ];
        let technicians = vec![
            Technician::hire(
                "T001".parse().unwrap(),
                TechnicianDetails { name: "Wichai".to_string(), specialty: String::new() },
            )
            .unwrap(),
        ];
        let jobs = vec![
            job(1, RepairStatus::InProgress, 5, Some("T001")),
            job(2, RepairStatus::InProgress, 1, Some("T404")),
            job(3, RepairStatus::Completed, 1, None),
            job(4, RepairStatus::Received, 10, None),
        ];

        let board = MonitorBoard::build(&jobs, &customers, &technicians, day(10));
        assert_eq!(board.columns.len(), 3);

        let bench = board.column(RepairStatus::InProgress).unwrap();
        let codes: Vec<_> = bench.cards.iter().map(|c| c.repair_code.sequence()).collect();
        assert_eq!(codes, vec![Some(2), Some(1)]);
        assert_eq!(bench.cards[0].badge, AgeBadge::Overdue);
        assert_eq!(bench.cards[0].technician_name, None);
        assert_eq!(bench.cards[1].technician_name.as_deref(), Some("Wichai"));
        assert_eq!(bench.cards[1].days_in_shop, 5);
        assert_eq!(bench.cards[1].badge, AgeBadge::Aging);

        let intake = board.column(RepairStatus::Received).unwrap();
        assert_eq!(intake.cards[0].customer_name.as_deref(), Some("Somchai"));
        assert_eq!(intake.cards[0].badge, AgeBadge::Fresh);

        assert!(board.column(RepairStatus::AwaitingParts).unwrap().cards.is_empty());
        assert!(board.column(RepairStatus::Completed).is_none());
    }
}
