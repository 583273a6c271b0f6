//! Registration service client
//!
//! `POST {base}/barcode/register` body = the composed inspection submission.
//! The service answers either the stored record with a recommended
//! disposition, or `{ "error": "..." }`.

use async_trait::async_trait;
use cbi_common::{Error, Result};
use serde::Deserialize;

use super::{classify_reqwest_error, InspectionRegistry};
use crate::models::{InspectionSubmission, RegisteredInspection};

/// Either shape the registration service may answer with
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RegisterResponse {
    Registered(RegisteredInspection),
    Rejected { error: String },
}

/// Reqwest-backed registration client
pub struct RegistryClient {
    client: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl InspectionRegistry for RegistryClient {
    async fn register(&self, submission: &InspectionSubmission) -> Result<RegisteredInspection> {
        let url = format!("{}/barcode/register", self.base_url);

        tracing::debug!(
            barcode = %submission.barcode,
            flight_number = %submission.flight_number,
            "Registering inspection"
        );

        let response = self
            .client
            .post(&url)
            .json(submission)
            .send()
            .await
            .map_err(|e| classify_reqwest_error("registration request failed", e))?;

        let status = response.status();
        let body: RegisterResponse = response
            .json()
            .await
            .map_err(|e| classify_reqwest_error("registration response unreadable", e))?;

        match body {
            RegisterResponse::Registered(record) => {
                tracing::info!(
                    barcode = %submission.barcode,
                    recommended_action = ?record.recommended_action,
                    "Inspection registered"
                );
                Ok(record)
            }
            RegisterResponse::Rejected { error } => Err(Error::Internal(format!(
                "registration rejected ({}): {}",
                status, error
            ))),
        }
    }
}
