//! The step transition relation, centralized in one pure function
//!
//! Every step change in the workflow goes through [`next_step`]; nothing
//! else mutates the step indicator. Keeping the whole graph in a single
//! match makes the machine auditable and testable with no async, no
//! rendering, and no session plumbing involved.

use cbi_common::types::InspectionStep;

/// Workflow events that can cause a step transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    /// Operator submitted the flight form (flight_number present)
    SubmitFlight,
    /// Capture classified: known product
    CaptureMatched,
    /// Capture classified: barcode decoded, no product match
    CaptureUnmatched,
    /// Capture classified: nothing usable; stays retryable
    CaptureRejected,
    /// Operator confirmed the product preview
    ContinuePreview,
    /// Operator submitted the qualitative assessment
    SubmitAssessment,
    /// Operator restarted from the terminal step
    Restart,
}

/// `(current step, event) → next step`, or `None` when the event is not
/// legal in the current step
///
/// An illegal combination never panics and never advances: the controller
/// answers it with a corrective message (routing the operator backward when
/// prior-step data is missing) instead of calling any external service.
pub fn next_step(current: InspectionStep, event: StepEvent) -> Option<InspectionStep> {
    use InspectionStep::*;
    use StepEvent::*;

    match (current, event) {
        (Flight, SubmitFlight) => Some(Scan),
        (Scan, CaptureMatched) => Some(Preview),
        (Scan, CaptureUnmatched) => Some(Qualitative),
        (Scan, CaptureRejected) => Some(Scan),
        (Preview, ContinuePreview) => Some(Qualitative),
        (Qualitative, SubmitAssessment) => Some(Done),
        (Done, Restart) => Some(Flight),
        _ => None,
    }
}
