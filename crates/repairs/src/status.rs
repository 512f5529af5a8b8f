use core::str::FromStr;

use serde::{Deserialize, Serialize};

use repairdesk_core::DomainError;

/// Repair job lifecycle.
///
/// ```text
/// RECEIVED → AWAITING_PARTS → IN_PROGRESS → COMPLETED → RETURNED
///        \______________________________________/
///                        ↓
///                    CANCELLED
/// ```
///
/// Any status may be set from any other; the stock rules only look at the
/// before/after pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepairStatus {
    Received,
    AwaitingParts,
    InProgress,
    Completed,
    Returned,
    Cancelled,
}

impl RepairStatus {
    pub const ALL: [RepairStatus; 6] = [
        RepairStatus::Received,
        RepairStatus::AwaitingParts,
        RepairStatus::InProgress,
        RepairStatus::Completed,
        RepairStatus::Returned,
        RepairStatus::Cancelled,
    ];

    /// Statuses whose assigned parts count as consumed from inventory.
    pub fn is_stock_affecting(self) -> bool {
        matches!(self, RepairStatus::Completed | RepairStatus::Returned)
    }

    /// Device is still in the shop and being worked on.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            RepairStatus::Received | RepairStatus::AwaitingParts | RepairStatus::InProgress
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RepairStatus::Received => "RECEIVED",
            RepairStatus::AwaitingParts => "AWAITING_PARTS",
            RepairStatus::InProgress => "IN_PROGRESS",
            RepairStatus::Completed => "COMPLETED",
            RepairStatus::Returned => "RETURNED",
            RepairStatus::Cancelled => "CANCELLED",
        }
    }
}

impl core::fmt::Display for RepairStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepairStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        RepairStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == wanted)
            .ok_or_else(|| DomainError::validation(format!("unknown repair status: {s}")))
    }
}

/// Kind of device brought in for repair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    Mobile,
    Notebook,
    Tablet,
    #[default]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_completed_and_returned_affect_stock() {
        let affecting: Vec<_> = RepairStatus::ALL.into_iter().filter(|s| s.is_stock_affecting()).collect();
        assert_eq!(affecting, vec![RepairStatus::Completed, RepairStatus::Returned]);
    }

    #[test]
    fn active_statuses_are_the_shop_floor_columns() {
        let active: Vec<_> = RepairStatus::ALL.into_iter().filter(|s| s.is_active()).collect();
        assert_eq!(
            active,
            vec![RepairStatus::Received, RepairStatus::AwaitingParts, RepairStatus::InProgress]
        );
    }

    #[test]
    fn parses_case_insensitively_and_matches_serde() {
        assert_eq!("awaiting_parts".parse::<RepairStatus>().unwrap(), RepairStatus::AwaitingParts);
        assert!("done".parse::<RepairStatus>().is_err());
        for s in RepairStatus::ALL {
            assert_eq!(serde_json::to_value(s).unwrap(), s.as_str());
        }
    }
}
