//! Per-student dashboard view
//!
//! A single field catalog decides, per column, the display alias and whether
//! the column is shown at all. Privacy-sensitive columns (emails, phone
//! numbers) are always hidden.

use crate::config::InsightConfig;
use crate::dataset::StudentRecord;
use crate::features::parse_decimal;
use crate::types::FeatureName;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Catalog entry for one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Label shown instead of the raw column name
    pub alias: Option<String>,
    /// Whether the column appears on the dashboard
    pub visible: bool,
    /// What the column measures
    pub description: Option<String>,
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self {
            alias: None,
            visible: true,
            description: None,
        }
    }
}

/// One displayed dashboard value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardCell {
    pub field: String,
    pub label: String,
    pub value: String,
}

/// Dashboard for a single student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardPanel {
    pub student: String,
    pub cells: Vec<DashboardCell>,
}

/// Field catalog keyed by column name
#[derive(Debug, Clone)]
pub struct FieldCatalog {
    fields: HashMap<String, FieldSpec>,
    denylist: HashSet<String>,
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self::from_config(&InsightConfig::default())
    }
}

impl FieldCatalog {
    /// Build the catalog from configuration, seeded with the model features
    pub fn from_config(config: &InsightConfig) -> Self {
        let mut fields: HashMap<String, FieldSpec> = FeatureName::ALL
            .iter()
            .map(|f| {
                let spec = FieldSpec {
                    description: Some(feature_description(*f).to_string()),
                    ..FieldSpec::default()
                };
                (f.as_str().to_string(), spec)
            })
            .collect();

        for (name, alias) in &config.field_aliases {
            fields.entry(name.clone()).or_default().alias = Some(alias.clone());
        }
        for name in &config.hidden_fields {
            fields.entry(name.clone()).or_default().visible = false;
        }

        Self {
            fields,
            denylist: config
                .privacy_denylist
                .iter()
                .map(|s| s.to_lowercase())
                .collect(),
        }
    }

    /// Catalog entry for a column, if one is defined
    pub fn spec(&self, field: &str) -> Option<&FieldSpec> {
        self.fields.get(field)
    }

    /// Whether a column may be shown
    pub fn is_visible(&self, field: &str) -> bool {
        if self.denylist.contains(&field.trim().to_lowercase()) {
            return false;
        }
        self.fields.get(field).map_or(true, |s| s.visible)
    }

    /// Display label for a column
    pub fn label(&self, field: &str) -> String {
        self.fields
            .get(field)
            .and_then(|s| s.alias.clone())
            .unwrap_or_else(|| field.to_string())
    }

    /// Render the dashboard panel for a student record
    pub fn panel(&self, record: &StudentRecord) -> DashboardPanel {
        let cells = record
            .cells
            .iter()
            .filter(|(field, _)| self.is_visible(field))
            .map(|(field, value)| DashboardCell {
                field: field.clone(),
                label: self.label(field),
                value: display_value(value),
            })
            .collect();

        DashboardPanel {
            student: record.id.clone(),
            cells,
        }
    }
}

/// Whole-number values render without a fractional part; anything else is shown as-is
pub fn display_value(raw: &str) -> String {
    match parse_decimal(raw) {
        Some(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => (v as i64).to_string(),
        _ => raw.to_string(),
    }
}

/// Plain-language description of a model feature
pub fn feature_description(feature: FeatureName) -> &'static str {
    match feature {
        FeatureName::AvgStudyDuration => "Average study duration per session.",
        FeatureName::AvgSubmissionRating => "Average rating across all submissions.",
        FeatureName::AvgExamScore => "Average exam score.",
        FeatureName::TotalSubmissions => "Total number of submitted assignments and quizzes.",
        FeatureName::TotalTrackingEvents => {
            "Total tracked interactions with the platform (opening a tutorial, next, etc.)."
        }
        FeatureName::TotalCompletedModules => {
            "Number of completed sub-modules or tutorials, not top-level modules."
        }
        FeatureName::DaysSinceLastActive => "Days since the learner was last active.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record() -> StudentRecord {
        StudentRecord {
            id: "Budi".to_string(),
            cells: vec![
                ("name".to_string(), "Budi".to_string()),
                ("Email".to_string(), "budi@example.com".to_string()),
                ("PHONE_NUMBER".to_string(), "0812".to_string()),
                ("avg_exam_score".to_string(), "88.50".to_string()),
                ("total_completed_modules".to_string(), "15.0".to_string()),
                ("internal_note".to_string(), "watch".to_string()),
            ],
        }
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value("15.0"), "15");
        assert_eq!(display_value("15,0"), "15");
        assert_eq!(display_value("88.50"), "88.50");
        assert_eq!(display_value("Budi"), "Budi");
        assert_eq!(display_value(""), "");
    }

    #[test]
    fn test_privacy_denylist_is_case_insensitive() {
        let catalog = FieldCatalog::default();
        assert!(!catalog.is_visible("Email"));
        assert!(!catalog.is_visible("PHONE_NUMBER"));
        assert!(!catalog.is_visible("no_hp"));
        assert!(catalog.is_visible("avg_exam_score"));
        assert!(catalog.is_visible("unknown_column"));
    }

    #[test]
    fn test_padded_private_column_stays_hidden() {
        let catalog = FieldCatalog::default();
        assert!(!catalog.is_visible(" email"));
        assert!(!catalog.is_visible("Email "));
    }

    #[test]
    fn test_panel_filters_and_aliases() {
        let mut config = InsightConfig::default();
        config
            .field_aliases
            .insert("avg_exam_score".to_string(), "Exam Score".to_string());
        config.hidden_fields.push("internal_note".to_string());

        let panel = FieldCatalog::from_config(&config).panel(&record());

        assert_eq!(panel.student, "Budi");
        assert_eq!(
            panel.cells,
            vec![
                DashboardCell {
                    field: "name".to_string(),
                    label: "name".to_string(),
                    value: "Budi".to_string(),
                },
                DashboardCell {
                    field: "avg_exam_score".to_string(),
                    label: "Exam Score".to_string(),
                    value: "88.50".to_string(),
                },
                DashboardCell {
                    field: "total_completed_modules".to_string(),
                    label: "total_completed_modules".to_string(),
                    value: "15".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_features_carry_descriptions() {
        let catalog = FieldCatalog::default();
        for feature in FeatureName::ALL {
            let spec = catalog.spec(feature.as_str()).unwrap();
            assert!(spec.description.is_some());
            assert!(spec.visible);
        }
    }
}
