//! Shared wire vocabulary for the inspection workflow
//!
//! These enums appear in event payloads and API responses, so they live in
//! cbi-common rather than in the inspection service itself.

use serde::{Deserialize, Serialize};

/// One stage of the linear-with-branches inspection workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InspectionStep {
    /// Operator enters flight attributes; carrier code resolves in background
    Flight,
    /// Camera frame capture and barcode recognition
    Scan,
    /// Recognized product shown before qualitative entry (matched path only)
    Preview,
    /// Condition/seal/fill/cleanliness entry
    Qualitative,
    /// Terminal: stored record and recommendation, or an error marker
    Done,
}

impl std::fmt::Display for InspectionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            InspectionStep::Flight => "flight",
            InspectionStep::Scan => "scan",
            InspectionStep::Preview => "preview",
            InspectionStep::Qualitative => "qualitative",
            InspectionStep::Done => "done",
        };
        f.write_str(s)
    }
}

/// Disposition returned by the registration service's policy logic
///
/// Opaque to this core: unrecognized values deserialize to `Unknown` rather
/// than failing the whole registration response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendedAction {
    Keep,
    Refill,
    Replace,
    Discard,
    #[serde(other)]
    Unknown,
}

/// Display category for a recommended action
///
/// Pure presentation vocabulary; the mapping from `RecommendedAction` is
/// owned by the result presenter and must not be reinterpreted elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayCategory {
    Affirmative,
    NeutralPositive,
    Caution,
    Negative,
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&InspectionStep::Qualitative).unwrap(),
            "\"qualitative\""
        );
    }

    #[test]
    fn recommended_action_roundtrip() {
        let action: RecommendedAction = serde_json::from_str("\"refill\"").unwrap();
        assert_eq!(action, RecommendedAction::Refill);
        assert_eq!(serde_json::to_string(&action).unwrap(), "\"refill\"");
    }

    #[test]
    fn unrecognized_action_falls_back_to_unknown() {
        let action: RecommendedAction = serde_json::from_str("\"incinerate\"").unwrap();
        assert_eq!(action, RecommendedAction::Unknown);
    }
}
