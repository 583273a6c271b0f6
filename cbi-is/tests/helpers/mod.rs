//! Shared test helpers: stub service clients and app construction
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use cbi_common::events::EventBus;
use cbi_common::types::RecommendedAction;
use cbi_common::{Error, Result};
use cbi_is::clients::{
    AirlineDirectory, BarcodeRecognizer, InspectionRegistry, RecognitionResponse, ServiceClients,
};
use cbi_is::models::{FlightEcho, InspectionSubmission, ProductEcho, RegisteredInspection};
use cbi_is::AppState;

/// Airline stub: a fixed directory of known airlines
pub struct StubAirlines {
    pub code: Option<String>,
}

#[async_trait]
impl AirlineDirectory for StubAirlines {
    async fn lookup_airline_code(&self, airline_name: &str) -> Result<String> {
        match &self.code {
            Some(code) => Ok(code.clone()),
            None => Err(Error::NotFound(format!("Unknown airline: {}", airline_name))),
        }
    }
}

/// What the recognizer stub should do with a frame
#[derive(Clone)]
pub enum RecognizerBehavior {
    Respond(RecognitionResponse),
    Transport,
}

pub struct StubRecognizer {
    pub behavior: RecognizerBehavior,
}

#[async_trait]
impl BarcodeRecognizer for StubRecognizer {
    async fn recognize(&self, _image_data_uri: &str) -> Result<RecognitionResponse> {
        match &self.behavior {
            RecognizerBehavior::Respond(response) => Ok(response.clone()),
            RecognizerBehavior::Transport => {
                Err(Error::Transport("connection refused".to_string()))
            }
        }
    }
}

/// What the registry stub should answer
#[derive(Clone)]
pub enum RegistryBehavior {
    Accept(RecommendedAction),
    Reject(String),
    Transport,
}

/// Registry stub recording every submission it receives
pub struct StubRegistry {
    pub behavior: RegistryBehavior,
    pub submissions: Mutex<Vec<InspectionSubmission>>,
}

impl StubRegistry {
    pub fn new(behavior: RegistryBehavior) -> Self {
        Self {
            behavior,
            submissions: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded(&self) -> Vec<InspectionSubmission> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl InspectionRegistry for StubRegistry {
    async fn register(&self, submission: &InspectionSubmission) -> Result<RegisteredInspection> {
        self.submissions.lock().unwrap().push(submission.clone());
        match &self.behavior {
            RegistryBehavior::Accept(action) => Ok(RegisteredInspection {
                product: ProductEcho {
                    name: "Tonic Water".to_string(),
                    brand: "Fever".to_string(),
                    category: "Mixer".to_string(),
                },
                flight: FlightEcho {
                    number: submission.flight_number.clone(),
                    service_class: "Economy".to_string(),
                    date: submission.flight_date.to_string(),
                },
                recommended_action: *action,
                policy_used: Some("default-policy".to_string()),
                notes: None,
            }),
            RegistryBehavior::Reject(message) => Err(Error::Internal(format!(
                "registration rejected (200 OK): {}",
                message
            ))),
            RegistryBehavior::Transport => {
                Err(Error::Transport("registration request failed".to_string()))
            }
        }
    }
}

/// A recognition response for a matched product
pub fn found_response(barcode: &str) -> RecognitionResponse {
    RecognitionResponse {
        success: true,
        found: true,
        barcode: Some(barcode.to_string()),
        product_name: Some("Tonic Water".to_string()),
        brand: Some("Fever".to_string()),
        category: Some("Mixer".to_string()),
        bottle_size: Some("200ml".to_string()),
        message: None,
    }
}

/// A recognition response for a decoded barcode without a product match
pub fn unmatched_response(barcode: &str) -> RecognitionResponse {
    RecognitionResponse {
        success: true,
        found: false,
        barcode: Some(barcode.to_string()),
        message: Some("Product not found".to_string()),
        ..Default::default()
    }
}

/// A recognition response with no usable detection
pub fn rejected_response() -> RecognitionResponse {
    RecognitionResponse::default()
}

/// A valid base64 frame payload
pub fn frame() -> String {
    BASE64.encode(b"fake jpeg frame bytes")
}

/// Bundle stubs into service clients
pub fn stub_clients(
    airlines: StubAirlines,
    recognizer: StubRecognizer,
    registry: Arc<StubRegistry>,
) -> ServiceClients {
    ServiceClients {
        airlines: Arc::new(airlines),
        recognizer: Arc::new(recognizer),
        registry,
    }
}

/// Build an AppState over stub clients
pub fn test_state(clients: ServiceClients) -> AppState {
    AppState::new(clients, EventBus::new(100))
}

/// Default happy-path clients: airline resolves to "LH", barcode "123"
/// matches, registration recommends keep
pub fn happy_clients() -> (ServiceClients, Arc<StubRegistry>) {
    let registry = Arc::new(StubRegistry::new(RegistryBehavior::Accept(
        RecommendedAction::Keep,
    )));
    let clients = stub_clients(
        StubAirlines {
            code: Some("LH".to_string()),
        },
        StubRecognizer {
            behavior: RecognizerBehavior::Respond(found_response("123")),
        },
        registry.clone(),
    );
    (clients, registry)
}
