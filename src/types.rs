//! Core data types
//!
//! This module defines the learner features, learner types and raw field values
//! that flow between the presentation layer and the inference core.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Number of model features
pub const FEATURE_COUNT: usize = 7;

/// One of the seven model features.
///
/// Variants are declared in training column order; `FeatureName::ALL` and
/// `FeatureVector::to_array` follow the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureName {
    AvgStudyDuration,
    AvgSubmissionRating,
    AvgExamScore,
    TotalSubmissions,
    TotalTrackingEvents,
    TotalCompletedModules,
    DaysSinceLastActive,
}

impl FeatureName {
    /// All features in canonical (training) order
    pub const ALL: [FeatureName; FEATURE_COUNT] = [
        FeatureName::AvgStudyDuration,
        FeatureName::AvgSubmissionRating,
        FeatureName::AvgExamScore,
        FeatureName::TotalSubmissions,
        FeatureName::TotalTrackingEvents,
        FeatureName::TotalCompletedModules,
        FeatureName::DaysSinceLastActive,
    ];

    /// Column name used in datasets and raw field maps
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureName::AvgStudyDuration => "avg_study_duration",
            FeatureName::AvgSubmissionRating => "avg_submission_rating",
            FeatureName::AvgExamScore => "avg_exam_score",
            FeatureName::TotalSubmissions => "total_submissions",
            FeatureName::TotalTrackingEvents => "total_tracking_events",
            FeatureName::TotalCompletedModules => "total_completed_modules",
            FeatureName::DaysSinceLastActive => "days_since_last_active",
        }
    }

    /// Look up a feature by its column name
    pub fn from_name(name: &str) -> Option<FeatureName> {
        FeatureName::ALL.into_iter().find(|f| f.as_str() == name)
    }

    /// Position of this feature in the model input
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Learner activity features, one value per model input
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Average study duration per session in minutes
    pub avg_study_duration: f64,
    /// Average rating across all submissions
    pub avg_submission_rating: f64,
    /// Average exam score
    pub avg_exam_score: f64,
    /// Number of submitted assignments and quizzes
    pub total_submissions: f64,
    /// Number of tracked interactions with the learning platform
    pub total_tracking_events: f64,
    /// Number of completed sub-modules or tutorials
    pub total_completed_modules: f64,
    /// Days since the learner was last active
    pub days_since_last_active: f64,
}

impl FeatureVector {
    /// Values in canonical order, ready for a scaler or classifier.
    ///
    /// The order must match the column order the artifacts were fit on.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.avg_study_duration,
            self.avg_submission_rating,
            self.avg_exam_score,
            self.total_submissions,
            self.total_tracking_events,
            self.total_completed_modules,
            self.days_since_last_active,
        ]
    }

    /// Build from values in canonical order
    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        Self {
            avg_study_duration: values[0],
            avg_submission_rating: values[1],
            avg_exam_score: values[2],
            total_submissions: values[3],
            total_tracking_events: values[4],
            total_completed_modules: values[5],
            days_since_last_active: values[6],
        }
    }

    /// Get a single feature value
    pub fn get(&self, name: FeatureName) -> f64 {
        self.to_array()[name.index()]
    }

    /// Feature values as a raw field map, for `explain` and reports
    pub fn to_field_map(&self) -> RawFieldMap {
        FeatureName::ALL
            .iter()
            .map(|f| (f.as_str().to_string(), RawValue::Number(self.get(*f))))
            .collect()
    }
}

/// Learner type predicted by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LearnerType {
    Consistent,
    Fast,
    Reflective,
    /// A class code outside the known label table
    Other(i64),
}

impl LearnerType {
    /// Map a classifier output code to a learner type
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => LearnerType::Consistent,
            1 => LearnerType::Fast,
            2 => LearnerType::Reflective,
            other => LearnerType::Other(other),
        }
    }

    /// Map a display label back to a known learner type
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Consistent Learner" => Some(LearnerType::Consistent),
            "Fast Learner" => Some(LearnerType::Fast),
            "Reflective Learner" => Some(LearnerType::Reflective),
            _ => None,
        }
    }

    /// Display label; unknown codes render as the bare number
    pub fn label(&self) -> String {
        match self {
            LearnerType::Consistent => "Consistent Learner".to_string(),
            LearnerType::Fast => "Fast Learner".to_string(),
            LearnerType::Reflective => "Reflective Learner".to_string(),
            LearnerType::Other(code) => code.to_string(),
        }
    }
}

impl fmt::Display for LearnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// A raw field value as supplied by a form, a dataset row or a JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Missing,
    /// Anything else (booleans, arrays, objects); always coerces to the default
    Other(serde_json::Value),
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Number(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::Text(v)
    }
}

/// Field name to raw value mapping supplied by callers
pub type RawFieldMap = HashMap<String, RawValue>;

/// Result of a single prediction request as shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionOutcome {
    /// Display label, empty when the prediction failed
    pub label: String,
    /// Whether the classifier produced a label
    pub success: bool,
    /// Failure message, verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PredictionOutcome {
    pub fn succeeded(learner_type: LearnerType) -> Self {
        Self {
            label: learner_type.label(),
            success: true,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            label: String::new(),
            success: false,
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_canonical_feature_order() {
        let names: Vec<&str> = FeatureName::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "avg_study_duration",
                "avg_submission_rating",
                "avg_exam_score",
                "total_submissions",
                "total_tracking_events",
                "total_completed_modules",
                "days_since_last_active",
            ]
        );

        for (i, f) in FeatureName::ALL.iter().enumerate() {
            assert_eq!(f.index(), i);
            assert_eq!(FeatureName::from_name(f.as_str()), Some(*f));
        }
    }

    #[test]
    fn test_vector_array_matches_names() {
        let v = FeatureVector::from_array([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(v.avg_exam_score, 3.0);
        assert_eq!(v.get(FeatureName::DaysSinceLastActive), 7.0);
        assert_eq!(v.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_learner_type_codes() {
        assert_eq!(LearnerType::from_code(0).label(), "Consistent Learner");
        assert_eq!(LearnerType::from_code(1).label(), "Fast Learner");
        assert_eq!(LearnerType::from_code(2).label(), "Reflective Learner");
        assert_eq!(LearnerType::from_code(99).label(), "99");
        assert_eq!(LearnerType::from_code(-1).to_string(), "-1");
    }

    #[test]
    fn test_label_round_trip_for_known_types() {
        for code in 0..3 {
            let t = LearnerType::from_code(code);
            assert_eq!(LearnerType::from_label(&t.label()), Some(t));
        }
        assert_eq!(LearnerType::from_label("99"), None);
    }

    #[test]
    fn test_raw_value_deserialization() {
        let map: RawFieldMap = serde_json::from_str(
            r#"{"a": 1.5, "b": "12,5", "c": null, "d": true, "e": [1, 2]}"#,
        )
        .unwrap();

        assert_eq!(map["a"], RawValue::Number(1.5));
        assert_eq!(map["b"], RawValue::Text("12,5".to_string()));
        assert_eq!(map["c"], RawValue::Missing);
        assert!(matches!(map["d"], RawValue::Other(_)));
        assert!(matches!(map["e"], RawValue::Other(_)));
    }

    #[test]
    fn test_outcome_serialization_skips_empty_error() {
        let ok = PredictionOutcome::succeeded(LearnerType::Fast);
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["label"], "Fast Learner");
        assert!(json.get("error").is_none());

        let failed = PredictionOutcome::failed("boom");
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("boom"));
    }
}
