//! Runtime configuration
//!
//! Paths to the reference dataset and artifacts, plus the dashboard field
//! catalog overrides. Every field has a default so an empty JSON object is a
//! valid configuration.

use crate::error::InsightError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Field names never shown on the dashboard (matched case-insensitively)
pub const DEFAULT_PRIVACY_DENYLIST: &[&str] = &[
    "email",
    "e-mail",
    "email_address",
    "phone",
    "phone_number",
    "phone_no",
    "mobile",
    "mobile_phone",
    "no_hp",
    "nomor_hp",
    "telepon",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Student activity dataset (CSV with header row)
    pub data_path: PathBuf,
    /// Classifier artifact (JSON)
    pub model_path: PathBuf,
    /// Optional scaler artifact (JSON)
    pub scaler_path: PathBuf,
    /// Dashboard columns hidden for privacy
    pub privacy_denylist: Vec<String>,
    /// Display aliases keyed by column name
    pub field_aliases: HashMap<String, String>,
    /// Additional columns hidden from the dashboard
    pub hidden_fields: Vec<String>,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("df_convert.csv"),
            model_path: PathBuf::from("model_learner_classifier.json"),
            scaler_path: PathBuf::from("scaler.json"),
            privacy_denylist: DEFAULT_PRIVACY_DENYLIST
                .iter()
                .map(|s| s.to_string())
                .collect(),
            field_aliases: HashMap::new(),
            hidden_fields: Vec::new(),
        }
    }
}

impl InsightConfig {
    /// Parse configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, InsightError> {
        serde_json::from_str(json).map_err(|e| InsightError::Config(e.to_string()))
    }

    /// Read configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, InsightError> {
        let content = fs::read_to_string(path)
            .map_err(|e| InsightError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// Read configuration from `path` if it exists, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, InsightError> {
        match path {
            Some(p) if p.exists() => Self::from_file(p),
            Some(p) => {
                log::info!("Config file {} not found, using defaults", p.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }
}
