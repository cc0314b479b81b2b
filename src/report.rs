//! Inference report encoder
//!
//! Packages a prediction outcome, its explanation and provenance into a JSON
//! document for the CLI and other consumers.

use crate::error::InsightError;
use crate::types::{FeatureVector, PredictionOutcome};
use crate::{INSIGHT_VERSION, PRODUCER_NAME};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Report producer metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// A single inference report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightReport {
    pub producer: ReportProducer,
    pub computed_at_utc: String,
    /// Student identifier when the features came from the dataset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<String>,
    pub features: FeatureVector,
    #[serde(flatten)]
    pub outcome: PredictionOutcome,
    /// Narrative for a successful prediction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Report encoder
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn encode(
        &self,
        student: Option<&str>,
        features: FeatureVector,
        outcome: PredictionOutcome,
        explanation: Option<String>,
    ) -> InsightReport {
        InsightReport {
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: INSIGHT_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
            student: student.map(str::to_string),
            features,
            outcome,
            explanation,
        }
    }

    /// Serialize a report, optionally indented
    pub fn to_json(report: &InsightReport, pretty: bool) -> Result<String, InsightError> {
        let json = if pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LearnerType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_report_layout() {
        let encoder = ReportEncoder::with_instance_id("test-instance".to_string());
        let report = encoder.encode(
            Some("Budi"),
            FeatureVector::from_array([45.0, 4.2, 88.0, 10.0, 120.0, 15.0, 2.0]),
            PredictionOutcome::succeeded(LearnerType::Consistent),
            Some("because".to_string()),
        );

        let json: serde_json::Value =
            serde_json::from_str(&ReportEncoder::to_json(&report, false).unwrap()).unwrap();

        assert_eq!(json["producer"]["name"], PRODUCER_NAME);
        assert_eq!(json["producer"]["instance_id"], "test-instance");
        assert_eq!(json["student"], "Budi");
        assert_eq!(json["label"], "Consistent Learner");
        assert_eq!(json["success"], true);
        assert_eq!(json["features"]["avg_exam_score"], 88.0);
        assert_eq!(json["explanation"], "because");
        assert!(json.get("error").is_none());
        let computed_at = json["computed_at_utc"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(computed_at).is_ok());
    }

    #[test]
    fn test_failed_report_carries_error() {
        let report = ReportEncoder::new().encode(
            None,
            FeatureVector::default(),
            PredictionOutcome::failed(
                "X has 7 features, but LinearClassifier is expecting 6 features as input.",
            ),
            None,
        );

        let json: serde_json::Value =
            serde_json::from_str(&ReportEncoder::to_json(&report, true).unwrap()).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["label"], "");
        assert!(json["error"].as_str().unwrap().contains("expecting 6 features"));
        assert!(json.get("student").is_none());
        assert!(json.get("explanation").is_none());
    }

    #[test]
    fn test_unique_instance_ids() {
        assert_ne!(ReportEncoder::new().instance_id, ReportEncoder::new().instance_id);
    }
}
