//! Alert severity levels.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Severity assigned to an alert at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumIter, EnumString)]
pub enum Severity {
    /// Requires immediate review.
    High,
    /// Default when nothing in the finding says otherwise.
    Medium,
    /// Informational or hygiene findings.
    Low,
}

impl Severity {
    /// Get all severities.
    pub fn all() -> impl Iterator<Item = Self> {
        use strum::IntoEnumIterator;
        Self::iter()
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(Severity::from_str("High").unwrap(), Severity::High);
        assert_eq!(Severity::from_str("Low").unwrap(), Severity::Low);
        assert!(Severity::from_str("high").is_err());
        assert!(Severity::from_str("Critical").is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Severity::Medium).unwrap(), "\"Medium\"");
        assert_eq!(Severity::High.to_string(), "High");
        assert_eq!(Severity::all().count(), 3);
    }
}
