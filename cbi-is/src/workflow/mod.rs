//! Inspection workflow: the centralized step state machine and the
//! controller that owns session state and applies operator actions

mod controller;
mod transitions;

pub use controller::{
    CaptureResult, CaptureStatus, QualitativeResult, RegistrationStatus, WorkflowController,
};
pub use transitions::{next_step, StepEvent};
