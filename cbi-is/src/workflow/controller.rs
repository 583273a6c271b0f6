//! Workflow controller: exclusive owner of inspection session state
//!
//! Every operator action and every async completion goes through this
//! controller. It serializes the one in-flight operation per step (a second
//! trigger of the same kind is refused without starting a request), applies
//! async completions through the epoch/step guard so stale results are
//! discarded rather than applied, and guarantees that a qualitative
//! submission always ends in the terminal `done` step, on registration
//! success and failure alike.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use cbi_common::events::{EventBus, InspectionEvent};
use cbi_common::types::InspectionStep;
use cbi_common::{Error, Result};

use crate::capture::{normalize_frame, CaptureAgent, CaptureOutcome};
use crate::clients::ServiceClients;
use crate::models::{
    BarcodeMatch, FlightForm, FlightInfo, InspectionResult, InspectionSession,
    InspectionSubmission, PendingOp, QualitativeAssessment, StepData,
};
use crate::workflow::transitions::{next_step, StepEvent};

/// Outcome label for a capture trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureStatus {
    Matched,
    Unmatched,
    Rejected,
    TransportFailed,
    /// The session was restarted while the recognition call was in flight;
    /// the response was discarded
    Superseded,
}

/// Outcome label for a qualitative submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Registered,
    Failed,
    /// Prior-step data was missing; the operator was routed backward with a
    /// corrective message and no registration call was made
    RoutedBack,
    /// The session was restarted while the registration call was in flight
    Superseded,
}

/// Result of a capture trigger: outcome plus the session as it now stands
#[derive(Debug, Clone)]
pub struct CaptureResult {
    pub status: CaptureStatus,
    pub session: InspectionSession,
}

/// Result of a qualitative submission
#[derive(Debug, Clone)]
pub struct QualitativeResult {
    pub status: RegistrationStatus,
    pub session: InspectionSession,
}

/// Exclusive owner of all inspection sessions
pub struct WorkflowController {
    sessions: RwLock<HashMap<Uuid, InspectionSession>>,
    clients: ServiceClients,
    capture_agent: CaptureAgent,
    events: EventBus,
}

impl WorkflowController {
    pub fn new(clients: ServiceClients, events: EventBus) -> Self {
        let capture_agent = CaptureAgent::new(clients.recognizer.clone());
        Self {
            sessions: RwLock::new(HashMap::new()),
            clients,
            capture_agent,
            events,
        }
    }

    /// Create a session at the `flight` step and start the airline lookup
    pub async fn start(self: &Arc<Self>, airline: String) -> Result<InspectionSession> {
        let airline = airline.trim().to_string();
        if airline.is_empty() {
            return Err(Error::InvalidInput("An airline must be selected".to_string()));
        }

        let mut session = InspectionSession::new(airline.clone());
        session.pending = Some(PendingOp::AirlineLookup);
        let session_id = session.session_id;
        let epoch = session.epoch;

        tracing::info!(session_id = %session_id, airline = %airline, "Inspection session started");

        let snapshot = session.clone();
        self.sessions.write().await.insert(session_id, session);

        let _ = self.events.emit(InspectionEvent::SessionStarted {
            session_id,
            airline: airline.clone(),
            timestamp: chrono::Utc::now(),
        });

        self.spawn_airline_lookup(session_id, epoch, airline);

        Ok(snapshot)
    }

    /// Current state of a session
    pub async fn view(&self, session_id: Uuid) -> Result<InspectionSession> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&session_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Inspection session not found: {}", session_id)))
    }

    /// Operator submits the flight form; advances `flight → scan`
    ///
    /// Submission is gated only on a non-empty flight number: a still-pending
    /// or failed airline lookup does not block the operator, and the carrier
    /// code may end up empty.
    pub async fn submit_flight(
        &self,
        session_id: Uuid,
        form: FlightForm,
    ) -> Result<InspectionSession> {
        if form.flight_number.trim().is_empty() {
            return Err(Error::InvalidInput("flight_number is required".to_string()));
        }

        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| Error::NotFound(format!("Inspection session not found: {}", session_id)))?;

        let StepData::Flight { draft } = &session.step else {
            return Err(Error::InvalidInput(format!(
                "Flight details can only be submitted in the flight step (current: {})",
                session.step()
            )));
        };
        debug_assert_eq!(
            next_step(InspectionStep::Flight, StepEvent::SubmitFlight),
            Some(InspectionStep::Scan)
        );

        let flight = FlightInfo::from_draft(draft, form);

        tracing::info!(
            session_id = %session_id,
            flight_number = %flight.flight_number,
            airline_code = %flight.airline_code,
            "Flight details accepted, advancing to scan"
        );

        let _ = self.events.emit(InspectionEvent::FlightAccepted {
            session_id,
            flight_number: flight.flight_number.clone(),
            timestamp: chrono::Utc::now(),
        });

        session.step = StepData::Scan { flight };
        session.notice = None;
        session.touch();

        Ok(session.clone())
    }

    /// Operator triggers a capture with a camera frame
    ///
    /// Exactly one recognition request per trigger; a second trigger while
    /// one is in flight is refused with `Conflict` and starts nothing.
    pub async fn trigger_capture(
        self: &Arc<Self>,
        session_id: Uuid,
        image: &str,
    ) -> Result<CaptureResult> {
        // Frame validation is pure and happens before any state changes
        let data_uri = normalize_frame(image)?;

        let epoch = {
            let mut sessions = self.sessions.write().await;
            let session = sessions.get_mut(&session_id).ok_or_else(|| {
                Error::NotFound(format!("Inspection session not found: {}", session_id))
            })?;

            if !matches!(session.step, StepData::Scan { .. }) {
                return Err(Error::InvalidInput(format!(
                    "Scanning is only available in the scan step (current: {})",
                    session.step()
                )));
            }
            if session.pending == Some(PendingOp::Recognition) {
                return Err(Error::Conflict("A capture is already in progress".to_string()));
            }

            session.pending = Some(PendingOp::Recognition);
            session.touch();

            let _ = self.events.emit(InspectionEvent::CaptureStarted {
                session_id,
                epoch: session.epoch,
                timestamp: chrono::Utc::now(),
            });

            session.epoch
        };

        let outcome = self.capture_agent.submit(&data_uri).await;

        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&session_id).ok_or_else(|| {
            Error::NotFound(format!("Inspection session not found: {}", session_id))
        })?;

        // Stale guard: the session may have moved on while the recognition
        // call was outstanding. A response from a superseded cycle is
        // discarded, never applied.
        if session.epoch != epoch || !matches!(session.step, StepData::Scan { .. }) {
            if session.epoch == epoch && session.pending == Some(PendingOp::Recognition) {
                session.pending = None;
            }
            tracing::debug!(
                session_id = %session_id,
                stale_epoch = epoch,
                current_epoch = session.epoch,
                "Discarding stale recognition response"
            );
            return Ok(CaptureResult {
                status: CaptureStatus::Superseded,
                session: session.clone(),
            });
        }

        session.pending = None;

        let StepData::Scan { flight } = &session.step else {
            unreachable!("step checked above");
        };
        let flight = flight.clone();

        let status = match outcome {
            CaptureOutcome::Matched(matched) => {
                debug_assert_eq!(
                    next_step(InspectionStep::Scan, StepEvent::CaptureMatched),
                    Some(InspectionStep::Preview)
                );
                tracing::info!(
                    session_id = %session_id,
                    barcode = %matched.barcode(),
                    "Barcode matched, advancing to preview"
                );
                let barcode = matched.barcode().to_string();
                let product_name = match &matched {
                    BarcodeMatch::Found { product_name, .. } => product_name.clone(),
                    BarcodeMatch::NotFound { .. } => String::new(),
                };
                let _ = self.events.emit(InspectionEvent::BarcodeMatched {
                    session_id,
                    barcode,
                    product_name,
                    timestamp: chrono::Utc::now(),
                });
                session.step = StepData::Preview { flight, matched };
                session.notice = None;
                CaptureStatus::Matched
            }
            CaptureOutcome::Unmatched(bottle) => {
                debug_assert_eq!(
                    next_step(InspectionStep::Scan, StepEvent::CaptureUnmatched),
                    Some(InspectionStep::Qualitative)
                );
                tracing::info!(
                    session_id = %session_id,
                    barcode = %bottle.barcode(),
                    "Barcode unmatched, skipping preview"
                );
                let _ = self.events.emit(InspectionEvent::BarcodeUnmatched {
                    session_id,
                    barcode: bottle.barcode().to_string(),
                    timestamp: chrono::Utc::now(),
                });
                session.step = StepData::Qualitative { flight, bottle };
                session.notice = Some(
                    "This barcode isn't in the database. You can still proceed manually."
                        .to_string(),
                );
                CaptureStatus::Unmatched
            }
            CaptureOutcome::Rejected { message } => {
                debug_assert_eq!(
                    next_step(InspectionStep::Scan, StepEvent::CaptureRejected),
                    Some(InspectionStep::Scan)
                );
                let _ = self.events.emit(InspectionEvent::CaptureFailed {
                    session_id,
                    reason: message.clone(),
                    timestamp: chrono::Utc::now(),
                });
                session.notice = Some(message);
                CaptureStatus::Rejected
            }
            CaptureOutcome::TransportFailed { message } => {
                let _ = self.events.emit(InspectionEvent::CaptureFailed {
                    session_id,
                    reason: message.clone(),
                    timestamp: chrono::Utc::now(),
                });
                session.notice = Some(message);
                CaptureStatus::TransportFailed
            }
        };

        session.touch();
        Ok(CaptureResult {
            status,
            session: session.clone(),
        })
    }

    /// Operator confirms the product preview; advances `preview → qualitative`
    pub async fn continue_preview(&self, session_id: Uuid) -> Result<InspectionSession> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&session_id).ok_or_else(|| {
            Error::NotFound(format!("Inspection session not found: {}", session_id))
        })?;

        let StepData::Preview { flight, matched } = &session.step else {
            return Err(Error::InvalidInput(format!(
                "Nothing to confirm outside the preview step (current: {})",
                session.step()
            )));
        };
        debug_assert_eq!(
            next_step(InspectionStep::Preview, StepEvent::ContinuePreview),
            Some(InspectionStep::Qualitative)
        );

        session.step = StepData::Qualitative {
            flight: flight.clone(),
            bottle: matched.clone(),
        };
        session.notice = None;
        session.touch();

        Ok(session.clone())
    }

    /// Operator submits the qualitative assessment
    ///
    /// Composes the submission exactly once and always resolves into the
    /// terminal `done` step, on registration success and failure alike.
    /// Missing prior-step data (a consistency check against a state the
    /// typed step union should make impossible) routes the operator backward
    /// with a corrective message instead of calling the registration service.
    pub async fn submit_qualitative(
        &self,
        session_id: Uuid,
        assessment: QualitativeAssessment,
    ) -> Result<QualitativeResult> {
        let (submission, epoch) = {
            let mut sessions = self.sessions.write().await;
            let session = sessions.get_mut(&session_id).ok_or_else(|| {
                Error::NotFound(format!("Inspection session not found: {}", session_id))
            })?;

            match &session.step {
                StepData::Qualitative { flight, bottle } => {
                    if session.pending == Some(PendingOp::Registration) {
                        return Err(Error::Conflict(
                            "Registration already in progress".to_string(),
                        ));
                    }
                    debug_assert_eq!(
                        next_step(InspectionStep::Qualitative, StepEvent::SubmitAssessment),
                        Some(InspectionStep::Done)
                    );

                    let submission =
                        InspectionSubmission::compose(bottle, flight, assessment.clone());
                    if submission.airline_code.is_empty() {
                        // Flagged data-quality question: the original allows
                        // registering with a blank carrier code, so we do
                        // too, but visibly.
                        tracing::warn!(
                            session_id = %session_id,
                            barcode = %submission.barcode,
                            "Submitting inspection with empty airline code"
                        );
                    }

                    session.pending = Some(PendingOp::Registration);
                    session.touch();

                    let _ = self.events.emit(InspectionEvent::RegistrationStarted {
                        session_id,
                        barcode: submission.barcode.clone(),
                        timestamp: chrono::Utc::now(),
                    });

                    (submission, session.epoch)
                }
                StepData::Scan { .. } => {
                    tracing::warn!(
                        session_id = %session_id,
                        "Qualitative submit without bottle data, routing back to scan"
                    );
                    session.notice =
                        Some("Bottle data missing. Please scan the bottle again.".to_string());
                    session.touch();
                    return Ok(QualitativeResult {
                        status: RegistrationStatus::RoutedBack,
                        session: session.clone(),
                    });
                }
                StepData::Flight { .. } => {
                    tracing::warn!(
                        session_id = %session_id,
                        "Qualitative submit without flight data, routing back to flight"
                    );
                    session.notice =
                        Some("Flight information missing. Please enter it again.".to_string());
                    session.touch();
                    return Ok(QualitativeResult {
                        status: RegistrationStatus::RoutedBack,
                        session: session.clone(),
                    });
                }
                StepData::Preview { .. } => {
                    return Err(Error::InvalidInput(
                        "Confirm the product preview before the qualitative step".to_string(),
                    ));
                }
                StepData::Done { .. } => {
                    return Err(Error::InvalidInput(
                        "Inspection already completed; restart to begin a new one".to_string(),
                    ));
                }
            }
        };

        let registration = self.clients.registry.register(&submission).await;

        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&session_id).ok_or_else(|| {
            Error::NotFound(format!("Inspection session not found: {}", session_id))
        })?;

        if session.epoch != epoch || !matches!(session.step, StepData::Qualitative { .. }) {
            if session.epoch == epoch && session.pending == Some(PendingOp::Registration) {
                session.pending = None;
            }
            tracing::debug!(
                session_id = %session_id,
                stale_epoch = epoch,
                current_epoch = session.epoch,
                "Discarding stale registration response"
            );
            return Ok(QualitativeResult {
                status: RegistrationStatus::Superseded,
                session: session.clone(),
            });
        }

        session.pending = None;

        let StepData::Qualitative { flight, bottle } = &session.step else {
            unreachable!("step checked above");
        };
        let flight = flight.clone();
        let bottle = bottle.clone();

        let (status, result) = match registration {
            Ok(record) => {
                tracing::info!(
                    session_id = %session_id,
                    recommended_action = ?record.recommended_action,
                    "Inspection registered, workflow done"
                );
                let _ = self.events.emit(InspectionEvent::RegistrationCompleted {
                    session_id,
                    recommended_action: record.recommended_action,
                    timestamp: chrono::Utc::now(),
                });
                (
                    RegistrationStatus::Registered,
                    InspectionResult::Registered(record),
                )
            }
            Err(e) => {
                // The operator still reaches a terminal, inspectable state;
                // the failure travels inside the result marker.
                tracing::warn!(
                    session_id = %session_id,
                    error = %e,
                    "Registration failed, resolving into done with error marker"
                );
                let error = e.to_string();
                let _ = self.events.emit(InspectionEvent::RegistrationFailed {
                    session_id,
                    error: error.clone(),
                    timestamp: chrono::Utc::now(),
                });
                (
                    RegistrationStatus::Failed,
                    InspectionResult::Failed { error },
                )
            }
        };

        session.step = StepData::Done {
            flight,
            bottle,
            assessment,
            result,
        };
        session.notice = None;
        session.touch();

        Ok(QualitativeResult {
            status,
            session: session.clone(),
        })
    }

    /// Operator restarts from `done`: clears all entities, bumps the epoch,
    /// and re-runs the airline lookup for the retained selection
    pub async fn restart(self: &Arc<Self>, session_id: Uuid) -> Result<InspectionSession> {
        let (airline, epoch, snapshot) = {
            let mut sessions = self.sessions.write().await;
            let session = sessions.get_mut(&session_id).ok_or_else(|| {
                Error::NotFound(format!("Inspection session not found: {}", session_id))
            })?;

            if next_step(session.step(), StepEvent::Restart).is_none() {
                return Err(Error::InvalidInput(format!(
                    "Restart is only available from the done step (current: {})",
                    session.step()
                )));
            }

            session.reset_for_restart();
            session.pending = Some(PendingOp::AirlineLookup);

            tracing::info!(
                session_id = %session_id,
                epoch = session.epoch,
                "Session restarted"
            );

            let _ = self.events.emit(InspectionEvent::SessionRestarted {
                session_id,
                epoch: session.epoch,
                timestamp: chrono::Utc::now(),
            });

            (session.airline.clone(), session.epoch, session.clone())
        };

        self.spawn_airline_lookup(session_id, epoch, airline);

        Ok(snapshot)
    }

    /// Operator exits from `done`: the session is destroyed and control
    /// returns to the caller (which owns clearing the airline selection)
    pub async fn exit(&self, session_id: Uuid) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get(&session_id).ok_or_else(|| {
            Error::NotFound(format!("Inspection session not found: {}", session_id))
        })?;

        if !session.is_done() {
            return Err(Error::InvalidInput(format!(
                "Exit is only available from the done step (current: {})",
                session.step()
            )));
        }

        sessions.remove(&session_id);

        tracing::info!(session_id = %session_id, "Session closed");
        let _ = self.events.emit(InspectionEvent::SessionClosed {
            session_id,
            timestamp: chrono::Utc::now(),
        });

        Ok(())
    }

    /// Start the background airline-code lookup for a session cycle
    fn spawn_airline_lookup(self: &Arc<Self>, session_id: Uuid, epoch: u64, airline: String) {
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            let result = controller
                .clients
                .airlines
                .lookup_airline_code(&airline)
                .await;
            controller
                .apply_airline_lookup(session_id, epoch, result)
                .await;
        });
    }

    /// Apply an airline-lookup completion through the epoch/step guard
    async fn apply_airline_lookup(&self, session_id: Uuid, epoch: u64, result: Result<String>) {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions.get_mut(&session_id) else {
            tracing::debug!(session_id = %session_id, "Lookup completed for a closed session");
            return;
        };

        // A completion from a superseded cycle must not touch the session,
        // not even its pending marker: that belongs to the new cycle's lookup.
        if session.epoch != epoch {
            tracing::debug!(
                session_id = %session_id,
                stale_epoch = epoch,
                current_epoch = session.epoch,
                "Discarding stale airline lookup"
            );
            return;
        }

        if session.pending == Some(PendingOp::AirlineLookup) {
            session.pending = None;
        }

        let StepData::Flight { draft } = &mut session.step else {
            // Operator already advanced past the flight step; the carrier
            // code stays empty for this cycle.
            tracing::debug!(
                session_id = %session_id,
                step = %session.step(),
                "Airline lookup resolved after the flight step, ignoring"
            );
            return;
        };

        match result {
            Ok(code) => {
                tracing::info!(session_id = %session_id, airline_code = %code, "Airline resolved");
                draft.airline_code = Some(code.clone());
                draft.lookup_warning = None;
                let _ = self.events.emit(InspectionEvent::AirlineResolved {
                    session_id,
                    airline_code: code,
                    timestamp: chrono::Utc::now(),
                });
            }
            Err(Error::NotFound(_)) => {
                tracing::warn!(session_id = %session_id, "Airline not found in database");
                draft.lookup_warning = Some("Airline not found in database".to_string());
                let _ = self.events.emit(InspectionEvent::AirlineLookupFailed {
                    session_id,
                    reason: "Airline not found in database".to_string(),
                    timestamp: chrono::Utc::now(),
                });
            }
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Airline lookup failed");
                draft.lookup_warning = Some("Error fetching airline code".to_string());
                let _ = self.events.emit(InspectionEvent::AirlineLookupFailed {
                    session_id,
                    reason: e.to_string(),
                    timestamp: chrono::Utc::now(),
                });
            }
        }
        session.touch();
    }
}
