use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar-day offset at which a series first regained its pre-event peak.
///
/// The derived ordering places every `Recovered` value before `Unbounded`, so the
/// smallest value in a collection is always the fastest recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecoveryDays {
    /// Offset (in calendar days from the anchor) of the first recovered row.
    Recovered(i64),
    /// No pre-event rows to recover to, or the series never got back within the slice.
    Unbounded,
}

impl RecoveryDays {
    pub fn is_finite(&self) -> bool {
        matches!(self, RecoveryDays::Recovered(_))
    }

    pub fn days(&self) -> Option<i64> {
        match self {
            RecoveryDays::Recovered(days) => Some(*days),
            RecoveryDays::Unbounded => None,
        }
    }
}

impl fmt::Display for RecoveryDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryDays::Recovered(days) => write!(f, "{days}"),
            RecoveryDays::Unbounded => write!(f, "unbounded"),
        }
    }
}
