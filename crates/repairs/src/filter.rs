use serde::Deserialize;

use repairdesk_core::{CustomerId, TechnicianId};

use crate::job::RepairJob;
use crate::status::RepairStatus;

/// Job list filter. Every set criterion must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JobFilter {
    pub status: Option<RepairStatus>,
    pub technician_id: Option<TechnicianId>,
    pub customer_id: Option<CustomerId>,
    /// Case-insensitive search over repair code, device model and issue.
    pub text: Option<String>,
}

impl JobFilter {
    pub fn matches(&self, job: &RepairJob) -> bool {
        if self.status.is_some_and(|s| s != job.status) {
            return false;
        }
        if self.technician_id.as_ref().is_some_and(|t| job.technician_id.as_ref() != Some(t)) {
            return false;
        }
        if self.customer_id.as_ref().is_some_and(|c| &job.customer_id != c) {
            return false;
        }

        match self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            None => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                [job.repair_code.as_str(), job.device_model.as_str(), job.issue_description.as_str()]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
        }
    }

    pub fn apply<'a>(&self, jobs: &'a [RepairJob]) -> Vec<&'a RepairJob> {
        jobs.iter().filter(|j| self.matches(j)).collect()
    }
}
