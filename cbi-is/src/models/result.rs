//! Terminal inspection result returned by the registration service

use cbi_common::types::RecommendedAction;
use serde::{Deserialize, Serialize};

/// Product echo from the stored record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductEcho {
    pub name: String,
    pub brand: String,
    pub category: String,
}

/// Flight echo from the stored record
///
/// Field types are whatever the registration service stored; this core does
/// not reinterpret them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightEcho {
    pub number: String,
    pub service_class: String,
    pub date: String,
}

/// Successful registration response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredInspection {
    pub product: ProductEcho,
    pub flight: FlightEcho,
    pub recommended_action: RecommendedAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Outcome held by the `done` step
///
/// A failed registration is an error marker inside the same type, never a
/// separate state: the workflow always reaches `done` with something the
/// operator can inspect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InspectionResult {
    Registered(RegisteredInspection),
    Failed { error: String },
}

impl InspectionResult {
    pub fn is_registered(&self) -> bool {
        matches!(self, InspectionResult::Registered(_))
    }
}
