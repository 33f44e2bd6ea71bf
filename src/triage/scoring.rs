//! Model-scoring seam and the default JSON-backed linear models.
//!
//! The triage engine only sees [`ScoringModel`]. Artifacts are exported
//! from the training environment as JSON and loaded once at startup;
//! tests substitute their own implementations.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::TriageError;

// ---------------------------------------------------------------------------
// Features
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

/// Named model inputs, ordered by feature name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    values: BTreeMap<String, FeatureValue>,
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_number(mut self, name: &str, value: f64) -> Self {
        self.values.insert(name.to_string(), FeatureValue::Number(value));
        self
    }

    pub fn with_category(mut self, name: &str, value: &str) -> Self {
        self.values
            .insert(name.to_string(), FeatureValue::Category(value.to_string()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.values.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn number(&self, name: &str) -> Result<f64, ScoringError> {
        match self.get(name) {
            Some(FeatureValue::Number(v)) => Ok(*v),
            Some(FeatureValue::Category(_)) => Err(ScoringError::IncompatibleFeature {
                feature: name.to_string(),
                expected: "number",
            }),
            None => Err(ScoringError::MissingFeature(name.to_string())),
        }
    }

    fn category(&self, name: &str) -> Result<&str, ScoringError> {
        match self.get(name) {
            Some(FeatureValue::Category(v)) => Ok(v),
            Some(FeatureValue::Number(_)) => Err(ScoringError::IncompatibleFeature {
                feature: name.to_string(),
                expected: "category",
            }),
            None => Err(ScoringError::MissingFeature(name.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ScoringModel trait
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("missing feature '{0}'")]
    MissingFeature(String),

    #[error("feature '{feature}' must be a {expected}")]
    IncompatibleFeature {
        feature: String,
        expected: &'static str,
    },

    #[error("unseen level '{value}' for feature '{feature}'")]
    UnknownCategory { feature: String, value: String },

    #[error("model produced a non-finite score")]
    NonFinite,

    #[error("model fault: {0}")]
    Internal(String),
}

/// A loaded, read-only model. Must be safe to score from many requests at once.
pub trait ScoringModel: Send + Sync {
    fn score(&self, features: &FeatureVector) -> Result<f64, ScoringError>;
}

// ---------------------------------------------------------------------------
// Linear artifacts
// ---------------------------------------------------------------------------

fn unit_scale() -> f64 {
    1.0
}

/// Contribution of one numeric feature: `weight * (x - center) / scale`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericTerm {
    pub weight: f64,
    #[serde(default)]
    pub center: f64,
    #[serde(default = "unit_scale")]
    pub scale: f64,
}

/// What to do with a categorical level absent from the artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCategoryPolicy {
    /// Contribute nothing (one-hot encoder with unknown levels ignored).
    #[default]
    Ignore,
    Error,
}

/// Intercept plus numeric and one-hot categorical terms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinearTerms {
    #[serde(default)]
    pub intercept: f64,
    #[serde(default)]
    pub numeric: BTreeMap<String, NumericTerm>,
    /// feature -> level -> weight. An exact level wins over a
    /// case-insensitive one. Terms are summed in name order.
    #[serde(default)]
    pub categorical: BTreeMap<String, BTreeMap<String, f64>>,
}

impl LinearTerms {
    fn evaluate(
        &self,
        features: &FeatureVector,
        policy: UnknownCategoryPolicy,
    ) -> Result<f64, ScoringError> {
        let mut total = self.intercept;

        for (name, term) in &self.numeric {
            let x = features.number(name)?;
            total += term.weight * (x - term.center) / term.scale;
        }

        for (name, levels) in &self.categorical {
            let raw = features.category(name)?;
            let value = raw.to_lowercase();
            let weight = levels.get(raw).or_else(|| {
                levels
                    .iter()
                    .find(|(level, _)| level.to_lowercase() == value)
                    .map(|(_, weight)| weight)
            });
            match weight {
                Some(weight) => total += weight,
                None if policy == UnknownCategoryPolicy::Error => {
                    return Err(ScoringError::UnknownCategory {
                        feature: name.clone(),
                        value,
                    });
                }
                None => {}
            }
        }

        Ok(total)
    }

    fn check(&self, artifact: &str) -> Result<(), TriageError> {
        for (name, term) in &self.numeric {
            if !term.scale.is_finite() || term.scale == 0.0 {
                return Err(TriageError::ModelInvalid(
                    artifact.to_string(),
                    format!("scale for '{name}' must be finite and non-zero"),
                ));
            }
        }
        Ok(())
    }
}

/// Linear regressor; the score is the linear prediction itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinearRegressor {
    #[serde(flatten)]
    pub terms: LinearTerms,
    #[serde(default)]
    pub unknown_category: UnknownCategoryPolicy,
}

impl ScoringModel for LinearRegressor {
    fn score(&self, features: &FeatureVector) -> Result<f64, ScoringError> {
        let value = self.terms.evaluate(features, self.unknown_category)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ScoringError::NonFinite)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassScorer {
    pub code: i64,
    #[serde(flatten)]
    pub terms: LinearTerms,
}

/// One-vs-rest linear classifier; the score is the code of the best class.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub classes: Vec<ClassScorer>,
    #[serde(default)]
    pub unknown_category: UnknownCategoryPolicy,
}

impl ScoringModel for LinearClassifier {
    fn score(&self, features: &FeatureVector) -> Result<f64, ScoringError> {
        let mut best: Option<(i64, f64)> = None;
        for class in &self.classes {
            let s = class.terms.evaluate(features, self.unknown_category)?;
            if !s.is_finite() {
                return Err(ScoringError::NonFinite);
            }
            // Strict comparison: ties go to the class listed first.
            if best.map_or(true, |(_, top)| s > top) {
                best = Some((class.code, s));
            }
        }
        best.map(|(code, _)| code as f64)
            .ok_or_else(|| ScoringError::Internal("classifier has no classes".into()))
    }
}

/// A model artifact as exported to disk, tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Regression(LinearRegressor),
    Classification(LinearClassifier),
}

impl ModelArtifact {
    /// Parse and sanity-check an artifact. `name` only labels errors.
    pub fn from_json(name: &str, json: &str) -> Result<Self, TriageError> {
        let artifact: ModelArtifact = serde_json::from_str(json)
            .map_err(|e| TriageError::ModelInvalid(name.to_string(), e.to_string()))?;
        artifact.check(name)?;
        Ok(artifact)
    }

    pub fn load(path: &Path) -> Result<Self, TriageError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            TriageError::ModelLoad(path.display().to_string(), e.to_string())
        })?;
        let artifact = Self::from_json(&path.display().to_string(), &json)?;
        tracing::debug!(path = %path.display(), kind = artifact.kind(), "Model artifact loaded");
        Ok(artifact)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Regression(_) => "regression",
            Self::Classification(_) => "classification",
        }
    }

    fn check(&self, name: &str) -> Result<(), TriageError> {
        match self {
            Self::Regression(model) => model.terms.check(name),
            Self::Classification(model) => {
                if model.classes.is_empty() {
                    return Err(TriageError::ModelInvalid(
                        name.to_string(),
                        "classification artifact has no classes".into(),
                    ));
                }
                model.classes.iter().try_for_each(|c| c.terms.check(name))
            }
        }
    }
}

impl ScoringModel for ModelArtifact {
    fn score(&self, features: &FeatureVector) -> Result<f64, ScoringError> {
        match self {
            Self::Regression(model) => model.score(features),
            Self::Classification(model) => model.score(features),
        }
    }
}
