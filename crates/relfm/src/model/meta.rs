//! Model metadata.
//!
//! Shared metadata types for model introspection.

use serde::{Deserialize, Serialize};

/// Type of prediction task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TaskKind {
    /// Regression (continuous target). Scores are used as-is.
    #[default]
    Regression,
    /// Binary classification with a probit link: `P(y = 1) = Φ(score)`.
    BinaryClassification,
}

impl TaskKind {
    /// Returns true if this is a classification task.
    pub fn is_classification(&self) -> bool {
        matches!(self, Self::BinaryClassification)
    }

    /// Returns true if this is a regression task.
    pub fn is_regression(&self) -> bool {
        matches!(self, Self::Regression)
    }
}

/// Shared metadata for a posterior model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMeta {
    /// Total feature dimension (primary + relation blocks).
    pub n_features: usize,
    /// Number of latent factors.
    pub n_factors: usize,
    /// Number of posterior samples.
    pub n_samples: usize,
    /// Task type.
    pub task: TaskKind,
}
