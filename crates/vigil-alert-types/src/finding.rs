//! Inbound security findings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One finding field as the caller sent it.
///
/// Any JSON value is accepted so that a wrongly typed field reaches the
/// engine instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FindingField {
    /// A JSON string.
    Text(String),
    /// Any other JSON value, kept verbatim.
    Other(serde_json::Value),
}

impl FindingField {
    /// The string content, if the field was a JSON string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for FindingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for FindingField {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FindingField {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Raw security-detection input.
///
/// Fields are kept as the caller sent them; the lifecycle engine decides
/// which values are legal. A finding is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Category name, e.g. `"CVE"` or `"IAM"`.
    #[serde(default)]
    pub category: Option<FindingField>,
    /// Optional severity hint, e.g. `"High"`.
    #[serde(default)]
    pub severity: Option<FindingField>,
    /// Free-text description of what was detected.
    #[serde(default)]
    pub description: Option<FindingField>,
}

impl Finding {
    /// Create a finding with a category and description and no severity hint.
    pub fn new(category: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            category: Some(FindingField::Text(category.into())),
            severity: None,
            description: Some(FindingField::Text(description.into())),
        }
    }

    /// Add a severity hint.
    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = Some(FindingField::Text(severity.into()));
        self
    }
}
