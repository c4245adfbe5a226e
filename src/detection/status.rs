//! Detection status model.
//!
//! The closed set of outcomes a detection strategy can report for a
//! recipe. Components branch on this enumeration only, never on raw
//! strings, so the strategies stay interchangeable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The result of detecting a single recipe on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectionStatus {
    /// Evidence found; the recipe is installable. From the primary
    /// probe this is provisional: it must be confirmed by the discovery
    /// script when the recipe declares one.
    Available,

    /// The target technology is present but the recipe is not cleanly
    /// installable (discovery script exited with the "detected" code).
    Detected,

    /// The discovery script explicitly signalled an unsupported host.
    Unsupported,

    /// No evidence found. The expected-negative outcome, never an error.
    Unavailable,
}

impl DetectionStatus {
    /// Whether this is the one outcome that escalates to the secondary
    /// probe.
    pub fn is_available(&self) -> bool {
        matches!(self, DetectionStatus::Available)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionStatus::Available => "AVAILABLE",
            DetectionStatus::Detected => "DETECTED",
            DetectionStatus::Unsupported => "UNSUPPORTED",
            DetectionStatus::Unavailable => "UNAVAILABLE",
        }
    }
}

impl fmt::Display for DetectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_available_escalates() {
        assert!(DetectionStatus::Available.is_available());
        assert!(!DetectionStatus::Detected.is_available());
        assert!(!DetectionStatus::Unsupported.is_available());
        assert!(!DetectionStatus::Unavailable.is_available());
    }

    #[test]
    fn display_matches_wire_vocabulary() {
        assert_eq!(DetectionStatus::Available.to_string(), "AVAILABLE");
        assert_eq!(DetectionStatus::Unavailable.to_string(), "UNAVAILABLE");
    }

    #[test]
    fn serializes_screaming_snake_case() {
        let json = serde_json::to_string(&DetectionStatus::Unsupported).unwrap();
        assert_eq!(json, "\"UNSUPPORTED\"");

        let status: DetectionStatus = serde_json::from_str("\"DETECTED\"").unwrap();
        assert_eq!(status, DetectionStatus::Detected);
    }
}
