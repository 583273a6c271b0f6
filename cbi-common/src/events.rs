//! Event types for the CBI event system
//!
//! Provides shared event definitions and the EventBus used by the inspection
//! service to broadcast workflow progress to SSE clients.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::types::RecommendedAction;

/// CBI inspection events
///
/// Events are broadcast via [`EventBus`] and serialized for SSE transmission.
/// Every operator action and every async completion that changes a session
/// emits exactly one event, so a connected UI can mirror the workflow without
/// polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InspectionEvent {
    /// A new inspection session was created (workflow enters `flight`)
    SessionStarted {
        session_id: Uuid,
        /// Airline name selected by the operator
        airline: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The airline-lookup service resolved a carrier code
    AirlineResolved {
        session_id: Uuid,
        airline_code: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The airline lookup failed (unknown airline or transport failure)
    ///
    /// Recoverable: the operator may continue with an empty carrier code.
    AirlineLookupFailed {
        session_id: Uuid,
        reason: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Flight attributes accepted; workflow advanced to `scan`
    FlightAccepted {
        session_id: Uuid,
        flight_number: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A capture attempt started (one recognition request in flight)
    CaptureStarted {
        session_id: Uuid,
        epoch: u64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Recognition matched a known product; workflow advanced to `preview`
    BarcodeMatched {
        session_id: Uuid,
        barcode: String,
        product_name: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Recognition decoded a barcode with no product match; workflow
    /// advanced directly to `qualitative`
    BarcodeUnmatched {
        session_id: Uuid,
        barcode: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The capture attempt produced nothing usable; workflow stays in `scan`
    CaptureFailed {
        session_id: Uuid,
        reason: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The composed record was submitted to the registration service
    RegistrationStarted {
        session_id: Uuid,
        barcode: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Registration succeeded; workflow reached `done`
    RegistrationCompleted {
        session_id: Uuid,
        recommended_action: RecommendedAction,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Registration failed; workflow still reached `done` with an error marker
    RegistrationFailed {
        session_id: Uuid,
        error: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Session reset to `flight`; all inspection entities cleared
    SessionRestarted {
        session_id: Uuid,
        /// Epoch after the restart; stale completions carry a lower value
        epoch: u64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Session destroyed; control returned to the caller
    SessionClosed {
        session_id: Uuid,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl InspectionEvent {
    /// Event type name used for SSE `event:` fields
    pub fn event_type(&self) -> &'static str {
        match self {
            InspectionEvent::SessionStarted { .. } => "SessionStarted",
            InspectionEvent::AirlineResolved { .. } => "AirlineResolved",
            InspectionEvent::AirlineLookupFailed { .. } => "AirlineLookupFailed",
            InspectionEvent::FlightAccepted { .. } => "FlightAccepted",
            InspectionEvent::CaptureStarted { .. } => "CaptureStarted",
            InspectionEvent::BarcodeMatched { .. } => "BarcodeMatched",
            InspectionEvent::BarcodeUnmatched { .. } => "BarcodeUnmatched",
            InspectionEvent::CaptureFailed { .. } => "CaptureFailed",
            InspectionEvent::RegistrationStarted { .. } => "RegistrationStarted",
            InspectionEvent::RegistrationCompleted { .. } => "RegistrationCompleted",
            InspectionEvent::RegistrationFailed { .. } => "RegistrationFailed",
            InspectionEvent::SessionRestarted { .. } => "SessionRestarted",
            InspectionEvent::SessionClosed { .. } => "SessionClosed",
        }
    }

    /// Session the event belongs to
    pub fn session_id(&self) -> Uuid {
        match self {
            InspectionEvent::SessionStarted { session_id, .. }
            | InspectionEvent::AirlineResolved { session_id, .. }
            | InspectionEvent::AirlineLookupFailed { session_id, .. }
            | InspectionEvent::FlightAccepted { session_id, .. }
            | InspectionEvent::CaptureStarted { session_id, .. }
            | InspectionEvent::BarcodeMatched { session_id, .. }
            | InspectionEvent::BarcodeUnmatched { session_id, .. }
            | InspectionEvent::CaptureFailed { session_id, .. }
            | InspectionEvent::RegistrationStarted { session_id, .. }
            | InspectionEvent::RegistrationCompleted { session_id, .. }
            | InspectionEvent::RegistrationFailed { session_id, .. }
            | InspectionEvent::SessionRestarted { session_id, .. }
            | InspectionEvent::SessionClosed { session_id, .. } => *session_id,
        }
    }
}

/// Broadcast bus for inspection events
///
/// Thin wrapper around `tokio::sync::broadcast`. Subscribers receive only
/// events emitted after subscription; when the buffer overflows the oldest
/// events are dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<InspectionEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<InspectionEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns the subscriber count, or an error when nobody is listening.
    /// Call sites that don't care whether a UI is connected use `let _ =`.
    pub fn emit(
        &self,
        event: InspectionEvent,
    ) -> std::result::Result<usize, broadcast::error::SendError<InspectionEvent>> {
        self.tx.send(event)
    }

    /// Configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
