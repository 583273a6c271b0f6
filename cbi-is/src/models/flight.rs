//! Flight context: operator-entered flight attributes plus the carrier code
//! resolved asynchronously from the airline-lookup service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Cabin service class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceClass {
    #[default]
    Economy,
    Business,
    First,
}

/// In-progress flight data while the `flight` step is active
///
/// The operator-editable fields arrive with the submit request; the draft
/// only tracks what the service owns: the resolver-populated carrier code
/// (read-only to the operator), the lookup warning if resolution failed, and
/// the seeded default date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightDraft {
    /// Carrier code from the airline-lookup service; empty until resolved
    pub airline_code: Option<String>,
    /// Recoverable warning when the lookup failed (unknown airline, network)
    pub lookup_warning: Option<String>,
    /// Seeded default for the flight date (today)
    pub flight_date: NaiveDate,
}

impl FlightDraft {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            airline_code: None,
            lookup_warning: None,
            flight_date: today,
        }
    }
}

/// Operator request payload for the flight step
///
/// Only `flight_number` gates submission; everything else has a seeded
/// default. The carrier code is deliberately absent: it is resolver-owned.
#[derive(Debug, Clone, Deserialize)]
pub struct FlightForm {
    pub flight_number: String,
    #[serde(default)]
    pub service_class: ServiceClass,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    /// Falls back to the draft's seeded date when omitted
    pub flight_date: Option<NaiveDate>,
}

/// Validated flight attributes, immutable once the workflow leaves `flight`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightInfo {
    /// May be empty when the airline lookup failed; does not gate submission
    pub airline_code: String,
    pub flight_number: String,
    pub service_class: ServiceClass,
    pub origin: String,
    pub destination: String,
    pub flight_date: NaiveDate,
}

impl FlightInfo {
    /// Combine the resolver-owned draft with the operator's submitted form
    pub fn from_draft(draft: &FlightDraft, form: FlightForm) -> Self {
        Self {
            airline_code: draft.airline_code.clone().unwrap_or_default(),
            flight_number: form.flight_number,
            service_class: form.service_class,
            origin: form.origin,
            destination: form.destination,
            flight_date: form.flight_date.unwrap_or(draft.flight_date),
        }
    }
}
