//! Campaign termination and graceful degradation.
//!
//! A campaign whose corpus stops producing novel accepted values is not a
//! failure: the values accepted before the attempt budget ran out are
//! still reported, tagged with the reason the run stopped.

use serde::{Deserialize, Serialize};

/// Reason a campaign was stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The requested number of values was generated.
    Complete,
    /// The attempt budget ran out before `count` values were accepted.
    DegenerateSeed,
}

impl StopReason {
    pub fn is_complete(self) -> bool {
        self == StopReason::Complete
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Complete => write!(f, "complete"),
            StopReason::DegenerateSeed => write!(f, "degenerate seed"),
        }
    }
}
