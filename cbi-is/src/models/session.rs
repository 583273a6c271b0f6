//! Inspection session state
//!
//! One session per bottle-inspection cycle. The step state is a tagged union
//! whose variants carry exactly the entities that exist at that step, so the
//! compiler rejects access to data a step cannot have (e.g. a barcode before
//! a capture succeeded). A restart clears every entity and bumps the epoch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cbi_common::types::InspectionStep;

use super::{
    BarcodeMatch, FlightDraft, FlightInfo, InspectionResult, QualitativeAssessment,
};

/// The one async operation a session may have in flight
///
/// At most one operation of each kind is ever pending, and at most one kind
/// at a time: a second trigger of the same kind is refused without starting
/// another request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingOp {
    /// Airline-code lookup (flight step, background)
    AirlineLookup,
    /// Barcode recognition call (scan step)
    Recognition,
    /// Registration call (qualitative → done transition)
    Registration,
}

/// Step-scoped workflow data
#[derive(Debug, Clone)]
pub enum StepData {
    Flight {
        draft: FlightDraft,
    },
    Scan {
        flight: FlightInfo,
    },
    Preview {
        flight: FlightInfo,
        matched: BarcodeMatch,
    },
    Qualitative {
        flight: FlightInfo,
        bottle: BarcodeMatch,
    },
    Done {
        flight: FlightInfo,
        bottle: BarcodeMatch,
        assessment: QualitativeAssessment,
        result: InspectionResult,
    },
}

impl StepData {
    /// The step indicator for this data
    pub fn step(&self) -> InspectionStep {
        match self {
            StepData::Flight { .. } => InspectionStep::Flight,
            StepData::Scan { .. } => InspectionStep::Scan,
            StepData::Preview { .. } => InspectionStep::Preview,
            StepData::Qualitative { .. } => InspectionStep::Qualitative,
            StepData::Done { .. } => InspectionStep::Done,
        }
    }
}

/// In-memory inspection session owned by the workflow controller
#[derive(Debug, Clone)]
pub struct InspectionSession {
    pub session_id: Uuid,
    /// Airline name selected by the operator; retained across restarts,
    /// cleared only by the caller on exit
    pub airline: String,
    /// Monotonically increasing cycle counter; async completions carry the
    /// epoch they started under and are discarded on mismatch
    pub epoch: u64,
    pub step: StepData,
    pub pending: Option<PendingOp>,
    /// Step-local recoverable message shown to the operator
    pub notice: Option<String>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InspectionSession {
    /// Create a new session at the `flight` step
    pub fn new(airline: String) -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4(),
            airline,
            epoch: 0,
            step: StepData::Flight {
                draft: FlightDraft::new(now.date_naive()),
            },
            pending: None,
            notice: None,
            started_at: now,
            updated_at: now,
        }
    }

    pub fn step(&self) -> InspectionStep {
        self.step.step()
    }

    pub fn is_done(&self) -> bool {
        self.step() == InspectionStep::Done
    }

    /// Full reset back to `flight`: clears all four inspection entities and
    /// any notice, drops interest in pending operations by bumping the epoch
    pub fn reset_for_restart(&mut self) {
        self.epoch += 1;
        self.step = StepData::Flight {
            draft: FlightDraft::new(Utc::now().date_naive()),
        };
        self.pending = None;
        self.notice = None;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Serializable session view for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub airline: String,
    pub step: InspectionStep,
    /// Whether an async operation is in flight (the matching control should
    /// be disabled)
    pub pending: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airline_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight: Option<FlightInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottle: Option<BarcodeMatch>,
}

impl SessionView {
    /// Project the step-scoped state into the flat view the UI consumes
    pub fn from_session(session: &InspectionSession) -> Self {
        let (airline_code, lookup_warning, flight, bottle) = match &session.step {
            StepData::Flight { draft } => (
                draft.airline_code.clone(),
                draft.lookup_warning.clone(),
                None,
                None,
            ),
            StepData::Scan { flight } => (None, None, Some(flight.clone()), None),
            StepData::Preview { flight, matched } => {
                (None, None, Some(flight.clone()), Some(matched.clone()))
            }
            StepData::Qualitative { flight, bottle } => {
                (None, None, Some(flight.clone()), Some(bottle.clone()))
            }
            StepData::Done { flight, bottle, .. } => {
                (None, None, Some(flight.clone()), Some(bottle.clone()))
            }
        };

        Self {
            session_id: session.session_id,
            airline: session.airline.clone(),
            step: session.step(),
            pending: session.pending.is_some(),
            notice: session.notice.clone(),
            airline_code,
            lookup_warning,
            flight,
            bottle,
        }
    }
}
