//! Finding categories.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Source category of a security finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumIter, EnumString)]
pub enum Category {
    /// Known vulnerability (CVE advisory).
    #[serde(rename = "CVE")]
    #[strum(serialize = "CVE")]
    Cve,
    /// Object storage bucket configuration.
    #[serde(rename = "S3")]
    #[strum(serialize = "S3")]
    S3,
    /// Identity and access management.
    #[serde(rename = "IAM")]
    #[strum(serialize = "IAM")]
    Iam,
    /// Network exposure or traffic.
    Network,
    /// Suspicious account or API activity.
    Activity,
}

impl Category {
    /// Get all categories.
    pub fn all() -> impl Iterator<Item = Self> {
        use strum::IntoEnumIterator;
        Self::iter()
    }
}
