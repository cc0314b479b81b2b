//! Prediction service
//!
//! Scales a feature vector (when a scaler is loaded), runs the classifier on a
//! single-row batch and maps the class code to a learner type.

use crate::artifacts::{load_classifier, load_scaler, Classifier, Scaler};
use crate::error::InsightError;
use crate::types::{FeatureVector, LearnerType};
use std::path::Path;

/// Classifier plus optional scaler, loaded once and shared read-only
pub struct PredictionService {
    classifier: Option<Box<dyn Classifier>>,
    scaler: Option<Box<dyn Scaler>>,
}

impl PredictionService {
    /// Create a service from already loaded artifacts
    pub fn new(classifier: Option<Box<dyn Classifier>>, scaler: Option<Box<dyn Scaler>>) -> Self {
        Self { classifier, scaler }
    }

    /// Create a service without a classifier; inference stays unavailable
    pub fn unavailable() -> Self {
        Self::new(None, None)
    }

    /// Load artifacts from disk.
    ///
    /// A classifier that cannot be loaded disables inference. A scaler that
    /// cannot be loaded is dropped and raw features go to the classifier.
    /// Neither failure is returned to the caller.
    pub fn load(model_path: &Path, scaler_path: &Path) -> Self {
        let classifier = match load_classifier(model_path) {
            Ok(c) => Some(Box::new(c) as Box<dyn Classifier>),
            Err(e) => {
                log::warn!("Inference disabled: {}", e);
                None
            }
        };

        let scaler = match load_scaler(scaler_path) {
            Ok(s) => Some(Box::new(s) as Box<dyn Scaler>),
            Err(e) => {
                log::debug!("Using unscaled features: {}", e);
                None
            }
        };

        Self { classifier, scaler }
    }

    /// Whether a classifier is loaded
    pub fn is_available(&self) -> bool {
        self.classifier.is_some()
    }

    /// Whether a scaler is loaded
    pub fn has_scaler(&self) -> bool {
        self.scaler.is_some()
    }

    /// Predict the learner type for a feature vector
    pub fn predict(&self, features: &FeatureVector) -> Result<LearnerType, InsightError> {
        let classifier = self
            .classifier
            .as_ref()
            .ok_or(InsightError::InferenceUnavailable)?;

        let raw = features.to_array();
        let row = match &self.scaler {
            Some(scaler) => scaler.transform(&raw)?,
            None => raw.to_vec(),
        };

        let codes = classifier.predict(&[row])?;
        let code = codes.first().copied().ok_or_else(|| {
            InsightError::Prediction("classifier returned no prediction".to_string())
        })?;

        let learner_type = LearnerType::from_code(code);
        log::debug!("Predicted class {} ({})", code, learner_type);
        Ok(learner_type)
    }
}
