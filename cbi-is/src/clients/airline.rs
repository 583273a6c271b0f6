//! Airline-lookup service client
//!
//! `GET {base}/airline/by-name/{name}` → `{ "airline_code": "LH" }`

use async_trait::async_trait;
use cbi_common::{Error, Result};
use serde::Deserialize;

use super::{classify_reqwest_error, AirlineDirectory};

/// Airline-lookup API response
#[derive(Debug, Deserialize)]
struct AirlineLookupResponse {
    airline_code: Option<String>,
}

/// Reqwest-backed airline-lookup client
pub struct AirlineClient {
    client: reqwest::Client,
    base_url: String,
}

impl AirlineClient {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl AirlineDirectory for AirlineClient {
    async fn lookup_airline_code(&self, airline_name: &str) -> Result<String> {
        // Url::parse percent-encodes spaces and other illegal path bytes,
        // matching what the browser client did with encodeURIComponent.
        let raw = format!("{}/airline/by-name/{}", self.base_url, airline_name);
        let url = reqwest::Url::parse(&raw)
            .map_err(|e| Error::InvalidInput(format!("Bad airline lookup URL {}: {}", raw, e)))?;

        tracing::debug!(airline = airline_name, "Querying airline-lookup service");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_reqwest_error("airline lookup request failed", e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!("Unknown airline: {}", airline_name)));
        }
        if !response.status().is_success() {
            return Err(Error::Transport(format!(
                "airline lookup returned status {}",
                response.status()
            )));
        }

        let body: AirlineLookupResponse = response
            .json()
            .await
            .map_err(|e| classify_reqwest_error("airline lookup response unreadable", e))?;

        match body.airline_code {
            Some(code) if !code.is_empty() => {
                tracing::debug!(airline = airline_name, airline_code = %code, "Airline resolved");
                Ok(code)
            }
            // The service answers 200 with no code for unknown airlines too
            _ => Err(Error::NotFound(format!("Unknown airline: {}", airline_name))),
        }
    }
}
