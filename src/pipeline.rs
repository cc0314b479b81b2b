//! Pipeline orchestration
//!
//! This module provides the public API for EduInsight: raw field map →
//! feature vector → prediction → narrative. `InsightEngine` holds the state
//! that is loaded once per process (artifacts, dataset, field catalog) and is
//! passed by reference into every request.

use crate::config::InsightConfig;
use crate::dashboard::{DashboardPanel, FieldCatalog};
use crate::dataset::StudentDataset;
use crate::error::InsightError;
use crate::features::FeatureVectorBuilder;
use crate::narrative::NarrativeGenerator;
use crate::predictor::PredictionService;
use crate::types::{PredictionOutcome, RawFieldMap};

/// Predict the learner type for raw field values.
///
/// Never fails: an unavailable classifier or a classifier error is reported in
/// the returned outcome with the original message.
pub fn predict(service: &PredictionService, fields: &RawFieldMap) -> PredictionOutcome {
    // Stage 1: Build the feature vector
    let features = FeatureVectorBuilder::build(fields);

    // Stage 2: Scale, classify, map label
    match service.predict(&features) {
        Ok(learner_type) => PredictionOutcome::succeeded(learner_type),
        Err(e) => {
            log::warn!("Prediction failed: {}", e);
            PredictionOutcome::failed(e.to_string())
        }
    }
}

/// Explain a learner type label using raw field values
pub fn explain(label: &str, fields: &RawFieldMap) -> String {
    NarrativeGenerator::explain(label, fields)
}

/// Process-wide state, initialised once and then read-only
pub struct InsightEngine {
    service: PredictionService,
    dataset: Option<StudentDataset>,
    catalog: FieldCatalog,
}

impl InsightEngine {
    /// Assemble an engine from already loaded parts
    pub fn new(
        service: PredictionService,
        dataset: Option<StudentDataset>,
        catalog: FieldCatalog,
    ) -> Self {
        Self {
            service,
            dataset,
            catalog,
        }
    }

    /// Load dataset and artifacts described by `config`.
    ///
    /// Missing or broken files degrade the corresponding capability instead of
    /// failing the whole engine.
    pub fn load(config: &InsightConfig) -> Self {
        let service = PredictionService::load(&config.model_path, &config.scaler_path);

        let dataset = match StudentDataset::from_path(&config.data_path) {
            Ok(d) => Some(d),
            Err(e) => {
                log::warn!("Dashboard disabled: {}", e);
                None
            }
        };

        Self::new(service, dataset, FieldCatalog::from_config(config))
    }

    /// Whether predictions can be made
    pub fn is_available(&self) -> bool {
        self.service.is_available()
    }

    pub fn service(&self) -> &PredictionService {
        &self.service
    }

    pub fn dataset(&self) -> Option<&StudentDataset> {
        self.dataset.as_ref()
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// Predict the learner type for raw field values
    pub fn predict(&self, fields: &RawFieldMap) -> PredictionOutcome {
        predict(&self.service, fields)
    }

    /// Explain a learner type label
    pub fn explain(&self, label: &str, fields: &RawFieldMap) -> String {
        explain(label, fields)
    }

    /// Sorted student identifiers, empty without a dataset
    pub fn students(&self) -> Vec<String> {
        self.dataset.as_ref().map(|d| d.students()).unwrap_or_default()
    }

    /// Raw fields of a student's latest row
    pub fn student_fields(&self, id: &str) -> Result<RawFieldMap, InsightError> {
        let dataset = self.require_dataset()?;
        dataset
            .latest(id)
            .map(|r| r.to_field_map())
            .ok_or_else(|| InsightError::StudentNotFound(id.to_string()))
    }

    /// Dashboard panel for a student's latest row
    pub fn dashboard(&self, id: &str) -> Result<DashboardPanel, InsightError> {
        let dataset = self.require_dataset()?;
        dataset
            .latest(id)
            .map(|r| self.catalog.panel(r))
            .ok_or_else(|| InsightError::StudentNotFound(id.to_string()))
    }

    fn require_dataset(&self) -> Result<&StudentDataset, InsightError> {
        self.dataset
            .as_ref()
            .ok_or_else(|| InsightError::Dataset("no student dataset loaded".to_string()))
    }
}
