//! EduInsight - Learner-type inference and narrative engine
//!
//! EduInsight turns aggregate learner activity metrics into a learner type
//! (Consistent, Fast or Reflective Learner) and a plain-language explanation
//! through a deterministic pipeline: raw fields → feature vector → optional
//! scaling → classifier → label lookup → narrative.
//!
//! ## Modules
//!
//! - **Inference core**: `features`, `predictor`, `narrative`, `pipeline`
//! - **Artifacts**: JSON scaler/classifier formats behind the `Scaler` and `Classifier` traits
//! - **Dashboard**: student dataset loading and privacy-aware per-student panels

pub mod artifacts;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod features;
pub mod narrative;
pub mod pipeline;
pub mod predictor;
pub mod report;
pub mod types;

pub use artifacts::{Classifier, ClassifierArtifact, Scaler, ScalerArtifact};
pub use config::InsightConfig;
pub use error::InsightError;
pub use features::FeatureVectorBuilder;
pub use narrative::NarrativeGenerator;
pub use pipeline::{explain, predict, InsightEngine};
pub use predictor::PredictionService;
pub use types::{FeatureName, FeatureVector, LearnerType, PredictionOutcome, RawFieldMap, RawValue};

/// EduInsight version embedded in all reports
pub const INSIGHT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "edu-insight";
