//! Barcode-recognition service client
//!
//! `POST {base}/scan-barcode-image` body `{ "image": "<data URI>" }`

use async_trait::async_trait;
use cbi_common::{Error, Result};
use serde::Deserialize;
use serde_json::json;

use super::{classify_reqwest_error, BarcodeRecognizer};

/// Raw recognition response, before the capture agent classifies it
///
/// `success` covers whether the service produced any usable detection;
/// `found` whether the decoded barcode matched a known product. Anything the
/// service omits defaults to absent/false rather than failing the parse;
/// classification decides what is usable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecognitionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub found: bool,
    pub barcode: Option<String>,
    pub product_name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub bottle_size: Option<String>,
    pub message: Option<String>,
}

/// Reqwest-backed barcode-recognition client
pub struct RecognitionClient {
    client: reqwest::Client,
    base_url: String,
}

impl RecognitionClient {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl BarcodeRecognizer for RecognitionClient {
    async fn recognize(&self, image_data_uri: &str) -> Result<RecognitionResponse> {
        let url = format!("{}/scan-barcode-image", self.base_url);

        tracing::debug!(
            image_len = image_data_uri.len(),
            "Submitting frame to barcode-recognition service"
        );

        let response = self
            .client
            .post(&url)
            .json(&json!({ "image": image_data_uri }))
            .send()
            .await
            .map_err(|e| classify_reqwest_error("recognition request failed", e))?;

        if !response.status().is_success() {
            return Err(Error::Transport(format!(
                "recognition service returned status {}",
                response.status()
            )));
        }

        response
            .json::<RecognitionResponse>()
            .await
            .map_err(|e| classify_reqwest_error("recognition response unreadable", e))
    }
}
