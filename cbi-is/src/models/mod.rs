//! Data model for the inspection workflow
//!
//! The four inspection entities (flight, barcode match, qualitative
//! assessment, result) are step-scoped: the session's `StepData` union
//! carries exactly the entities that exist at the current step, so invalid
//! field access is rejected at compile time instead of runtime.

mod assessment;
mod barcode;
mod flight;
mod result;
mod session;
mod submission;

pub use assessment::{Cleanliness, Condition, FillLevel, QualitativeAssessment, SealStatus};
pub use barcode::BarcodeMatch;
pub use flight::{FlightDraft, FlightForm, FlightInfo, ServiceClass};
pub use result::{FlightEcho, InspectionResult, ProductEcho, RegisteredInspection};
pub use session::{InspectionSession, PendingOp, SessionView, StepData};
pub use submission::InspectionSubmission;
