//! Clients for the three external service collaborators
//!
//! Each contract is a trait so the workflow controller can be exercised with
//! stub implementations; the production implementations are thin reqwest
//! wrappers sharing one HTTP client with explicit timeouts. All calls are
//! single-attempt: no retry or backoff lives in this core.

mod airline;
mod recognition;
mod registry;

pub use airline::AirlineClient;
pub use recognition::{RecognitionClient, RecognitionResponse};
pub use registry::RegistryClient;

use std::sync::Arc;

use async_trait::async_trait;
use cbi_common::config::ServicesConfig;
use cbi_common::{Error, Result};

use crate::models::{InspectionSubmission, RegisteredInspection};

/// Airline-lookup service: maps an airline name to a carrier code
#[async_trait]
pub trait AirlineDirectory: Send + Sync {
    /// Returns the carrier code, `Error::NotFound` when the airline is
    /// unknown, or `Error::Transport` on transport/parse failure.
    async fn lookup_airline_code(&self, airline_name: &str) -> Result<String>;
}

/// Barcode-recognition service: maps an encoded camera frame to a product
#[async_trait]
pub trait BarcodeRecognizer: Send + Sync {
    /// Submits a base64 JPEG data URI; the response is classified by the
    /// capture agent, not here.
    async fn recognize(&self, image_data_uri: &str) -> Result<RecognitionResponse>;
}

/// Registration service: stores a composed inspection record
#[async_trait]
pub trait InspectionRegistry: Send + Sync {
    /// Returns the stored record with the recommended disposition, or an
    /// error for both transport failures and service-reported rejections;
    /// the caller folds either into the terminal result marker.
    async fn register(&self, submission: &InspectionSubmission) -> Result<RegisteredInspection>;
}

/// The three service seams bundled for injection into the controller
#[derive(Clone)]
pub struct ServiceClients {
    pub airlines: Arc<dyn AirlineDirectory>,
    pub recognizer: Arc<dyn BarcodeRecognizer>,
    pub registry: Arc<dyn InspectionRegistry>,
}

impl ServiceClients {
    /// Build the production reqwest-backed clients from configuration
    pub fn http(config: &ServicesConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();

        Ok(Self {
            airlines: Arc::new(AirlineClient::new(client.clone(), base_url.clone())),
            recognizer: Arc::new(RecognitionClient::new(client.clone(), base_url.clone())),
            registry: Arc::new(RegistryClient::new(client, base_url)),
        })
    }
}

/// Map a reqwest transport error onto the common taxonomy
pub(crate) fn classify_reqwest_error(context: &str, err: reqwest::Error) -> Error {
    if err.is_connect() || err.is_timeout() {
        Error::Transport(format!("{}: {}", context, err))
    } else if err.is_decode() {
        Error::MalformedResponse(format!("{}: {}", context, err))
    } else {
        Error::Transport(format!("{}: {}", context, err))
    }
}
