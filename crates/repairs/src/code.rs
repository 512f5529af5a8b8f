use serde::{Deserialize, Serialize};

const PREFIX: &str = "RP-";

/// Human-readable job code printed on receipts, e.g. `RP-000042`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepairCode(String);

impl RepairCode {
    pub fn from_sequence(n: u32) -> Self {
        Self(format!("{PREFIX}{n:06}"))
    }

    /// Sequence number, if the code follows the `RP-nnnnnn` format.
    pub fn sequence(&self) -> Option<u32> {
        let digits = self.0.strip_prefix(PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    /// Code following the highest sequence in use, so codes stay unique even
    /// after jobs are deleted.
    pub fn next_after<'a>(existing: impl IntoIterator<Item = &'a RepairCode>) -> Self {
        let last = existing.into_iter().filter_map(RepairCode::sequence).max().unwrap_or(0);
        Self::from_sequence(last.saturating_add(1))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for RepairCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
