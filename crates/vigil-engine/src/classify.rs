//! Keyword-based severity classification.

use std::str::FromStr;
use vigil_alert_types::Severity;

/// Keywords that mark a finding as high severity, checked in order.
pub const HIGH_KEYWORDS: &[&str] = &[
    "critical",
    "exploit",
    "breach",
    "exposed",
    "unauthorized",
    "malware",
    "ransomware",
    "privilege escalation",
    "remote code execution",
    "compromised",
];

/// Keywords that mark a finding as low severity, checked after the high list.
pub const LOW_KEYWORDS: &[&str] = &[
    "informational",
    "minor",
    "best practice",
    "recommendation",
    "low risk",
    "deprecated",
];

/// Pick a severity for a finding.
///
/// A legal hint wins. Otherwise the lower-cased description is searched
/// for the high keywords, then the low keywords, by plain substring.
/// Anything else is [`Severity::Medium`].
pub fn classify(hint: Option<&str>, description: &str) -> Severity {
    if let Some(severity) = hint.and_then(|h| Severity::from_str(h).ok()) {
        return severity;
    }

    let text = description.to_lowercase();
    if HIGH_KEYWORDS.iter().any(|k| text.contains(k)) {
        Severity::High
    } else if LOW_KEYWORDS.iter().any(|k| text.contains(k)) {
        Severity::Low
    } else {
        Severity::Medium
    }
}
