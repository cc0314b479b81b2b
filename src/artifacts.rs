//! Pre-trained artifacts
//!
//! The classifier and scaler are produced by an external training job. The
//! inference core only depends on the two traits below; the JSON artifact
//! formats in this module are one concrete way to ship them.

use crate::error::InsightError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A pre-fit feature transform
pub trait Scaler: Send + Sync {
    /// Transform one row; output has the same width as the input
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InsightError>;
}

/// A pre-trained classifier producing integer class codes
pub trait Classifier: Send + Sync {
    /// Predict one class code per input row
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<i64>, InsightError>;
}

/// Serialized scaler artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    /// `(x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// `x * scale + min`
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

impl ScalerArtifact {
    fn kind(&self) -> &'static str {
        match self {
            ScalerArtifact::Standard { .. } => "StandardScaler",
            ScalerArtifact::MinMax { .. } => "MinMaxScaler",
        }
    }

    fn width(&self) -> usize {
        match self {
            ScalerArtifact::Standard { mean, .. } => mean.len(),
            ScalerArtifact::MinMax { min, .. } => min.len(),
        }
    }

    /// Check internal consistency after deserialization
    pub fn validate(&self) -> Result<(), String> {
        let (a, b) = match self {
            ScalerArtifact::Standard { mean, scale } => (mean.len(), scale.len()),
            ScalerArtifact::MinMax { min, scale } => (min.len(), scale.len()),
        };
        if a == 0 {
            return Err(format!("{} has no features", self.kind()));
        }
        if a != b {
            return Err(format!(
                "{} parameter lengths differ ({} vs {})",
                self.kind(),
                a,
                b
            ));
        }
        Ok(())
    }
}

impl Scaler for ScalerArtifact {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InsightError> {
        check_width(row, self.width(), self.kind())?;

        let out = match self {
            ScalerArtifact::Standard { mean, scale } => row
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| {
                    // Constant training columns were fit with zero variance
                    let s = if *s == 0.0 { 1.0 } else { *s };
                    (x - m) / s
                })
                .collect(),
            ScalerArtifact::MinMax { min, scale } => row
                .iter()
                .zip(min.iter().zip(scale))
                .map(|(x, (m, s))| x * s + m)
                .collect(),
        };
        Ok(out)
    }
}

/// Serialized classifier artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    /// One weight row per class; the highest decision score wins
    Linear {
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
        classes: Vec<i64>,
    },
    /// The class whose centroid is closest wins
    NearestCentroid {
        centroids: Vec<Vec<f64>>,
        classes: Vec<i64>,
    },
}

impl ClassifierArtifact {
    fn kind(&self) -> &'static str {
        match self {
            ClassifierArtifact::Linear { .. } => "LinearClassifier",
            ClassifierArtifact::NearestCentroid { .. } => "NearestCentroid",
        }
    }

    fn width(&self) -> usize {
        match self {
            ClassifierArtifact::Linear { coef, .. } => coef.first().map_or(0, Vec::len),
            ClassifierArtifact::NearestCentroid { centroids, .. } => {
                centroids.first().map_or(0, Vec::len)
            }
        }
    }

    /// Check internal consistency after deserialization
    pub fn validate(&self) -> Result<(), String> {
        let (rows, classes) = match self {
            ClassifierArtifact::Linear {
                coef,
                intercept,
                classes,
            } => {
                if intercept.len() != coef.len() {
                    return Err(format!(
                        "{} has {} weight rows but {} intercepts",
                        self.kind(),
                        coef.len(),
                        intercept.len()
                    ));
                }
                (coef, classes)
            }
            ClassifierArtifact::NearestCentroid { centroids, classes } => (centroids, classes),
        };

        if rows.is_empty() {
            return Err(format!("{} has no classes", self.kind()));
        }
        if rows.len() != classes.len() {
            return Err(format!(
                "{} has {} rows but {} class codes",
                self.kind(),
                rows.len(),
                classes.len()
            ));
        }
        let width = self.width();
        if width == 0 || rows.iter().any(|r| r.len() != width) {
            return Err(format!("{} rows have inconsistent widths", self.kind()));
        }
        Ok(())
    }

    fn predict_row(&self, row: &[f64]) -> Result<i64, InsightError> {
        check_width(row, self.width(), self.kind())?;

        let best = match self {
            ClassifierArtifact::Linear {
                coef,
                intercept,
                classes,
            } => {
                let scores = coef
                    .iter()
                    .zip(intercept)
                    .map(|(w, b)| dot(w, row) + b);
                first_extreme(scores, |candidate, best| candidate > best)
                    .map(|i| classes[i])
            }
            ClassifierArtifact::NearestCentroid { centroids, classes } => {
                let distances = centroids.iter().map(|c| squared_distance(c, row));
                first_extreme(distances, |candidate, best| candidate < best)
                    .map(|i| classes[i])
            }
        };

        best.ok_or_else(|| InsightError::Prediction(format!("{} has no classes", self.kind())))
    }
}

impl Classifier for ClassifierArtifact {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<i64>, InsightError> {
        rows.iter().map(|row| self.predict_row(row)).collect()
    }
}

/// Load and validate a classifier artifact from a JSON file
pub fn load_classifier(path: &Path) -> Result<ClassifierArtifact, InsightError> {
    let artifact: ClassifierArtifact = read_json(path)?;
    artifact
        .validate()
        .map_err(|reason| InsightError::artifact_load(path.display().to_string(), reason))?;
    log::info!("Loaded classifier from {}", path.display());
    Ok(artifact)
}

/// Load and validate a scaler artifact from a JSON file
pub fn load_scaler(path: &Path) -> Result<ScalerArtifact, InsightError> {
    let artifact: ScalerArtifact = read_json(path)?;
    artifact
        .validate()
        .map_err(|reason| InsightError::artifact_load(path.display().to_string(), reason))?;
    log::info!("Loaded scaler from {}", path.display());
    Ok(artifact)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, InsightError> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| InsightError::artifact_load(&display, e))?;
    serde_json::from_str(&content).map_err(|e| InsightError::artifact_load(display, e))
}

fn check_width(row: &[f64], expected: usize, kind: &str) -> Result<(), InsightError> {
    if row.len() != expected {
        return Err(InsightError::Prediction(format!(
            "X has {} features, but {} is expecting {} features as input.",
            row.len(),
            kind,
            expected
        )));
    }
    Ok(())
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Index of the first value that beats every earlier one
fn first_extreme(
    values: impl Iterator<Item = f64>,
    beats: impl Fn(f64, f64) -> bool,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.enumerate() {
        match best {
            Some((_, b)) if !beats(v, b) => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
