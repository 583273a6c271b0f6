//! Qualitative assessment of the physical container
//!
//! Pure data entry from closed enumerated option lists, with no free text
//! for evaluative fields. Every field has a seeded default so a submission is
//! well-formed even without explicit operator edits; out-of-range numeric
//! values are rejected at deserialization.

use cbi_common::Error;
use serde::{Deserialize, Serialize};

/// Physical condition of the container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[default]
    Intact,
    MinorWear,
    Damaged,
    Leaking,
}

/// State of the container's seal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SealStatus {
    #[default]
    Sealed,
    Opened,
    Broken,
    Missing,
}

/// Fill level percentage, restricted to {0, 10, ..., 100}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FillLevel(u8);

impl FillLevel {
    pub fn percent(self) -> u8 {
        self.0
    }
}

impl Default for FillLevel {
    fn default() -> Self {
        Self(100)
    }
}

impl TryFrom<u8> for FillLevel {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > 100 || value % 10 != 0 {
            return Err(Error::InvalidInput(format!(
                "fill_level must be a multiple of 10 between 0 and 100, got {}",
                value
            )));
        }
        Ok(Self(value))
    }
}

impl From<FillLevel> for u8 {
    fn from(level: FillLevel) -> u8 {
        level.0
    }
}

/// Cleanliness ordinal, 1 (filthy) to 10 (spotless)
///
/// The canonical wire scale is the 1–10 ordinal; percentage renderings are a
/// presentation concern outside this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Cleanliness(u8);

impl Cleanliness {
    pub fn score(self) -> u8 {
        self.0
    }
}

impl Default for Cleanliness {
    fn default() -> Self {
        Self(10)
    }
}

impl TryFrom<u8> for Cleanliness {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if !(1..=10).contains(&value) {
            return Err(Error::InvalidInput(format!(
                "cleanliness must be between 1 and 10, got {}",
                value
            )));
        }
        Ok(Self(value))
    }
}

impl From<Cleanliness> for u8 {
    fn from(c: Cleanliness) -> u8 {
        c.0
    }
}

/// The qualitative step's product: one instance per inspection cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualitativeAssessment {
    pub condition: Condition,
    pub seal_status: SealStatus,
    pub fill_level: FillLevel,
    pub cleanliness: Cleanliness,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_submittable() {
        let assessment = QualitativeAssessment::default();
        assert_eq!(assessment.condition, Condition::Intact);
        assert_eq!(assessment.seal_status, SealStatus::Sealed);
        assert_eq!(assessment.fill_level.percent(), 100);
        assert_eq!(assessment.cleanliness.score(), 10);
    }

    #[test]
    fn empty_payload_deserializes_to_defaults() {
        let assessment: QualitativeAssessment = serde_json::from_str("{}").unwrap();
        assert_eq!(assessment, QualitativeAssessment::default());
    }

    #[test]
    fn fill_level_rejects_off_grid_values() {
        assert!(FillLevel::try_from(55).is_err());
        assert!(FillLevel::try_from(110).is_err());
        assert_eq!(FillLevel::try_from(0).unwrap().percent(), 0);
        assert_eq!(FillLevel::try_from(70).unwrap().percent(), 70);
    }

    #[test]
    fn cleanliness_rejects_out_of_range() {
        assert!(Cleanliness::try_from(0).is_err());
        assert!(Cleanliness::try_from(11).is_err());
        assert_eq!(Cleanliness::try_from(1).unwrap().score(), 1);
    }

    #[test]
    fn invalid_fill_level_fails_deserialization() {
        let result: Result<QualitativeAssessment, _> =
            serde_json::from_str(r#"{"fill_level": 55}"#);
        assert!(result.is_err());
    }

    #[test]
    fn full_payload_roundtrip() {
        let json = serde_json::json!({
            "condition": "minor_wear",
            "seal_status": "opened",
            "fill_level": 40,
            "cleanliness": 6
        });
        let assessment: QualitativeAssessment = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(assessment.condition, Condition::MinorWear);
        assert_eq!(assessment.seal_status, SealStatus::Opened);
        assert_eq!(serde_json::to_value(&assessment).unwrap(), json);
    }
}
