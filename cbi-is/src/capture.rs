//! Capture agent: frame intake, recognition submission, classification
//!
//! One capture attempt produces exactly one recognition request. The agent
//! moves through capturing (frame normalization) and classifying (awaiting
//! the recognition call, mapping its response). Concurrency control (one
//! capture in flight per session) is owned by the workflow controller.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use cbi_common::{Error, Result};

use crate::clients::{BarcodeRecognizer, RecognitionResponse};
use crate::models::BarcodeMatch;

/// Classified outcome of one capture attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Known product; the workflow advances to `preview`
    Matched(BarcodeMatch),
    /// Decoded barcode without a product match; the workflow advances
    /// directly to `qualitative`
    Unmatched(BarcodeMatch),
    /// Nothing usable in the response; stay in `scan`, operator may retry
    Rejected { message: String },
    /// The recognition service was unreachable; stay in `scan`, retryable
    TransportFailed { message: String },
}

/// Drives frame encoding and the recognition call
pub struct CaptureAgent {
    recognizer: Arc<dyn BarcodeRecognizer>,
}

impl CaptureAgent {
    pub fn new(recognizer: Arc<dyn BarcodeRecognizer>) -> Self {
        Self { recognizer }
    }

    /// Submit a normalized frame and classify the response
    ///
    /// Infallible: every recognition-side failure becomes a
    /// classified outcome so the scan step stays retryable. Frame validation
    /// happens earlier via [`normalize_frame`], before any state is touched.
    pub async fn submit(&self, data_uri: &str) -> CaptureOutcome {
        tracing::debug!(frame_len = data_uri.len(), "Frame submitted, classifying");

        match self.recognizer.recognize(data_uri).await {
            Ok(response) => classify(response),
            Err(Error::Transport(message)) => {
                tracing::warn!(error = %message, "Recognition call failed in transport");
                CaptureOutcome::TransportFailed {
                    message: "Could not reach the barcode recognition service. Check the connection and try again.".to_string(),
                }
            }
            Err(Error::MalformedResponse(message)) => {
                tracing::warn!(error = %message, "Recognition response unusable");
                CaptureOutcome::Rejected {
                    message: "No barcode detected or server error".to_string(),
                }
            }
            Err(other) => {
                tracing::warn!(error = %other, "Recognition call failed unexpectedly");
                CaptureOutcome::TransportFailed {
                    message: other.to_string(),
                }
            }
        }
    }
}

/// Normalize operator frame input into the JPEG data URI the recognition
/// service expects
///
/// Accepts a complete `data:image/...;base64,` URI or a bare base64 payload;
/// the base64 content must decode in either case.
pub fn normalize_frame(image: &str) -> Result<String> {
    let trimmed = image.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("Empty camera frame".to_string()));
    }

    if let Some(rest) = trimmed.strip_prefix("data:") {
        let payload = rest
            .split_once(";base64,")
            .map(|(_, payload)| payload)
            .ok_or_else(|| {
                Error::InvalidInput("Camera frame data URI is not base64-encoded".to_string())
            })?;
        BASE64
            .decode(payload)
            .map_err(|e| Error::InvalidInput(format!("Camera frame is not valid base64: {}", e)))?;
        return Ok(trimmed.to_string());
    }

    BASE64
        .decode(trimmed)
        .map_err(|e| Error::InvalidInput(format!("Camera frame is not valid base64: {}", e)))?;
    Ok(format!("data:image/jpeg;base64,{}", trimmed))
}

/// Classification policy for recognition responses
///
/// A `BarcodeMatch` is emitted only when the response carries a decoded
/// barcode; everything else keeps the step retryable without touching state.
pub fn classify(response: RecognitionResponse) -> CaptureOutcome {
    if !response.success {
        return CaptureOutcome::Rejected {
            message: response
                .message
                .unwrap_or_else(|| "No barcode detected or server error".to_string()),
        };
    }

    let barcode = match response.barcode {
        Some(barcode) if !barcode.is_empty() => barcode,
        _ => {
            return CaptureOutcome::Rejected {
                message: "No valid barcode detected. Try again.".to_string(),
            }
        }
    };

    if response.found {
        CaptureOutcome::Matched(BarcodeMatch::Found {
            barcode,
            product_name: response.product_name.unwrap_or_default(),
            brand: response.brand.unwrap_or_default(),
            category: response.category.unwrap_or_default(),
            bottle_size: response.bottle_size.unwrap_or_default(),
        })
    } else {
        CaptureOutcome::Unmatched(BarcodeMatch::NotFound {
            barcode,
            message: response.message,
        })
    }
}
