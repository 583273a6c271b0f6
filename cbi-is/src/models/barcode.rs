//! Barcode recognition outcome

use serde::{Deserialize, Serialize};

/// Result of a usable barcode recognition response
///
/// Exactly one `BarcodeMatch` is live per inspection cycle; a rescan from the
/// `scan` step overwrites it. Responses that carry no decoded barcode never
/// produce a `BarcodeMatch` at all (the capture stays retryable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BarcodeMatch {
    /// The recognition service matched a known product
    Found {
        barcode: String,
        product_name: String,
        brand: String,
        category: String,
        bottle_size: String,
    },
    /// A barcode was decoded but no product matched; the inspection can
    /// still proceed manually
    NotFound {
        barcode: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl BarcodeMatch {
    /// The decoded barcode, present in both variants
    pub fn barcode(&self) -> &str {
        match self {
            BarcodeMatch::Found { barcode, .. } | BarcodeMatch::NotFound { barcode, .. } => barcode,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, BarcodeMatch::Found { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barcode_accessor_covers_both_variants() {
        let found = BarcodeMatch::Found {
            barcode: "123".to_string(),
            product_name: "Tonic".to_string(),
            brand: "Fever".to_string(),
            category: "Mixer".to_string(),
            bottle_size: "200ml".to_string(),
        };
        let missing = BarcodeMatch::NotFound {
            barcode: "456".to_string(),
            message: None,
        };
        assert_eq!(found.barcode(), "123");
        assert_eq!(missing.barcode(), "456");
        assert!(found.is_found());
        assert!(!missing.is_found());
    }

    #[test]
    fn serializes_with_status_tag() {
        let missing = BarcodeMatch::NotFound {
            barcode: "456".to_string(),
            message: Some("not in database".to_string()),
        };
        let json = serde_json::to_value(&missing).unwrap();
        assert_eq!(json["status"], "not_found");
        assert_eq!(json["barcode"], "456");
    }
}
