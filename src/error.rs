//! Error types for EduInsight

use thiserror::Error;

/// Errors that can occur while loading artifacts or running inference
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("Failed to load artifact {path}: {reason}")]
    ArtifactLoad { path: String, reason: String },

    #[error("{0}")]
    Prediction(String),

    #[error("Inference unavailable: no classifier loaded")]
    InferenceUnavailable,

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Student not found: {0}")]
    StudentNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl InsightError {
    pub(crate) fn artifact_load(path: impl Into<String>, reason: impl ToString) -> Self {
        InsightError::ArtifactLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
