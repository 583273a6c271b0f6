//! Composed inspection record sent to the registration service

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BarcodeMatch, FlightInfo, QualitativeAssessment, ServiceClass};

/// The registration payload: barcode + flight attributes + assessment
///
/// Composed exactly once per qualitative submission, immediately before the
/// registration call, and never persisted locally beyond it. The field set is
/// the exact union of the three sources; nothing else goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionSubmission {
    pub barcode: String,
    pub airline_code: String,
    pub flight_number: String,
    pub service_class: ServiceClass,
    pub origin: String,
    pub destination: String,
    pub flight_date: NaiveDate,
    pub qualitative: QualitativeAssessment,
}

impl InspectionSubmission {
    pub fn compose(
        bottle: &BarcodeMatch,
        flight: &FlightInfo,
        qualitative: QualitativeAssessment,
    ) -> Self {
        Self {
            barcode: bottle.barcode().to_string(),
            airline_code: flight.airline_code.clone(),
            flight_number: flight.flight_number.clone(),
            service_class: flight.service_class,
            origin: flight.origin.clone(),
            destination: flight.destination.clone(),
            flight_date: flight.flight_date,
            qualitative,
        }
    }
}
