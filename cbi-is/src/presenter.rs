//! Result presenter
//!
//! Pure rendering of the terminal inspection result, plus the deterministic
//! mapping from the backend's recommended action to a display category. The
//! presenter never reinterprets or overrides the recommendation.

use serde::Serialize;

use cbi_common::types::{DisplayCategory, RecommendedAction};

use crate::models::{FlightEcho, InspectionResult, ProductEcho};

/// Map a recommended action to its display category
///
/// keep → affirmative, refill → neutral-positive, replace → caution,
/// discard → negative, anything else → unknown.
pub fn display_category(action: RecommendedAction) -> DisplayCategory {
    match action {
        RecommendedAction::Keep => DisplayCategory::Affirmative,
        RecommendedAction::Refill => DisplayCategory::NeutralPositive,
        RecommendedAction::Replace => DisplayCategory::Caution,
        RecommendedAction::Discard => DisplayCategory::Negative,
        RecommendedAction::Unknown => DisplayCategory::Unknown,
    }
}

/// Serializable rendering of the terminal result
#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    pub registered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductEcho>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight: Option<FlightEcho>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_action: Option<RecommendedAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<DisplayCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Build the operator-facing view of an inspection result
pub fn result_view(result: &InspectionResult) -> ResultView {
    match result {
        InspectionResult::Registered(record) => ResultView {
            registered: true,
            product: Some(record.product.clone()),
            flight: Some(record.flight.clone()),
            recommended_action: Some(record.recommended_action),
            category: Some(display_category(record.recommended_action)),
            policy_used: record.policy_used.clone(),
            notes: record.notes.clone(),
            error: None,
        },
        InspectionResult::Failed { error } => ResultView {
            registered: false,
            product: None,
            flight: None,
            recommended_action: None,
            category: None,
            policy_used: None,
            notes: None,
            error: Some(error.clone()),
        },
    }
}
