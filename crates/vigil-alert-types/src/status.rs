//! Alert lifecycle status and the transition table.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Lifecycle status of an alert.
///
/// Alerts start at [`AlertStatus::New`] and move one stage forward at a time
/// until [`AlertStatus::Resolved`], which is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumIter, EnumString)]
pub enum AlertStatus {
    /// Freshly created from a finding.
    New,
    /// Seen by an operator.
    Acknowledged,
    /// Remediation under way.
    #[serde(rename = "In-Progress")]
    #[strum(serialize = "In-Progress")]
    InProgress,
    /// Closed.
    Resolved,
}

impl AlertStatus {
    /// Get all statuses.
    pub fn all() -> impl Iterator<Item = Self> {
        use strum::IntoEnumIterator;
        Self::iter()
    }

    /// Statuses reachable from this one in a single transition.
    pub fn next_states(self) -> &'static [AlertStatus] {
        match self {
            Self::New => &[Self::Acknowledged],
            Self::Acknowledged => &[Self::InProgress],
            Self::InProgress => &[Self::Resolved],
            Self::Resolved => &[],
        }
    }

    /// Check whether moving to `next` is a legal transition.
    pub fn can_transition_to(self, next: AlertStatus) -> bool {
        self.next_states().contains(&next)
    }

    /// Check if no further transitions are possible.
    pub fn is_terminal(self) -> bool {
        self.next_states().is_empty()
    }
}

impl Default for AlertStatus {
    fn default() -> Self {
        Self::New
    }
}
