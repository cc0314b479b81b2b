//! Feature vector construction
//!
//! Turns a loosely typed field map (form input, dataset row, JSON document)
//! into a `FeatureVector`. Coercion never fails: anything that is not a
//! finite number becomes the default value.

use crate::types::{FeatureName, FeatureVector, RawFieldMap, RawValue, FEATURE_COUNT};

/// Value substituted for missing or unparseable fields
pub const DEFAULT_FEATURE_VALUE: f64 = 0.0;

/// Builder for model feature vectors
pub struct FeatureVectorBuilder;

impl FeatureVectorBuilder {
    /// Build a feature vector from raw fields in canonical order
    pub fn build(fields: &RawFieldMap) -> FeatureVector {
        let mut values = [DEFAULT_FEATURE_VALUE; FEATURE_COUNT];
        for feature in FeatureName::ALL {
            values[feature.index()] = field_value(fields, feature);
        }
        FeatureVector::from_array(values)
    }
}

/// Coerced value of a single feature, default when absent
pub fn field_value(fields: &RawFieldMap, feature: FeatureName) -> f64 {
    fields
        .get(feature.as_str())
        .map(|v| to_float_or(v, DEFAULT_FEATURE_VALUE))
        .unwrap_or(DEFAULT_FEATURE_VALUE)
}

/// Coerce a raw value to a float, falling back to `default`
pub fn to_float_or(value: &RawValue, default: f64) -> f64 {
    let parsed = match value {
        RawValue::Number(n) => Some(*n),
        RawValue::Text(s) => parse_decimal(s),
        RawValue::Missing | RawValue::Other(_) => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(default)
}

/// Parse a decimal string that may use a comma as decimal separator
///
/// `"12,5"` and `"12.5"` parse identically.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let normalized = text.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fields(pairs: &[(&str, RawValue)]) -> RawFieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_build_in_canonical_order() {
        // Insertion order of the map must not matter
        let map = fields(&[
            ("days_since_last_active", 2.0.into()),
            ("total_completed_modules", 15.0.into()),
            ("total_tracking_events", 120.0.into()),
            ("total_submissions", 10.0.into()),
            ("avg_exam_score", 88.0.into()),
            ("avg_submission_rating", 4.2.into()),
            ("avg_study_duration", 45.0.into()),
        ]);

        let v = FeatureVectorBuilder::build(&map);
        assert_eq!(v.to_array(), [45.0, 4.2, 88.0, 10.0, 120.0, 15.0, 2.0]);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let map = fields(&[("avg_exam_score", 75.0.into())]);
        let v = FeatureVectorBuilder::build(&map);

        assert_eq!(v.avg_exam_score, 75.0);
        assert_eq!(v.avg_study_duration, 0.0);
        assert_eq!(v.days_since_last_active, 0.0);

        let empty = FeatureVectorBuilder::build(&RawFieldMap::new());
        assert_eq!(empty, FeatureVector::default());
    }

    #[test]
    fn test_comma_decimal_matches_dot_decimal() {
        assert_eq!(parse_decimal("12,5"), Some(12.5));
        assert_eq!(parse_decimal("12,5"), parse_decimal("12.5"));

        let comma = FeatureVectorBuilder::build(&fields(&[("avg_study_duration", "12,5".into())]));
        let dot = FeatureVectorBuilder::build(&fields(&[("avg_study_duration", "12.5".into())]));
        assert_eq!(comma, dot);
    }

    #[test]
    fn test_invalid_values_become_default() {
        let map = fields(&[
            ("avg_study_duration", "".into()),
            ("avg_submission_rating", "abc".into()),
            ("avg_exam_score", RawValue::Missing),
            ("total_submissions", RawValue::Other(serde_json::json!(true))),
            ("total_tracking_events", "1,2,3".into()),
            ("total_completed_modules", "NaN".into()),
            ("days_since_last_active", f64::NAN.into()),
        ]);

        assert_eq!(FeatureVectorBuilder::build(&map), FeatureVector::default());
    }

    #[test]
    fn test_whitespace_is_ignored() {
        assert_eq!(parse_decimal("  7,25 "), Some(7.25));
        assert_eq!(parse_decimal("   "), None);
        assert_eq!(parse_decimal("inf"), None);
    }

    #[test]
    fn test_to_float_or_uses_given_default() {
        assert_eq!(to_float_or(&RawValue::Missing, -1.0), -1.0);
        assert_eq!(to_float_or(&"3".into(), -1.0), 3.0);
        assert_eq!(to_float_or(&RawValue::Number(4.5), -1.0), 4.5);
    }
}
