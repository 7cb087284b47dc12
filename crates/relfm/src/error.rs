//! Errors raised by the scoring engine and model wrappers.

/// Error type for factorization machine construction and scoring.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FMError {
    /// Scoring was attempted before weights were initialized.
    #[error("predict called before weights were initialized")]
    NotInitialized,

    /// A relation block is mapped onto a different number of cases than the
    /// primary matrix has rows.
    #[error("relation block {block} maps {actual} cases but the primary matrix has {expected} rows")]
    CaseCountMismatch {
        block: usize,
        expected: usize,
        actual: usize,
    },

    /// Primary columns plus all block feature sizes don't add up to the
    /// parameter dimension.
    #[error("total feature size {actual} doesn't match model dimension {expected}")]
    FeatureSizeMismatch { expected: usize, actual: usize },

    /// Initialization standard deviation must be finite and non-negative.
    #[error("init_std must be finite and >= 0, got {0}")]
    InvalidInitStd(f64),

    /// Linear weights and factor rows disagree on the feature count.
    #[error("linear weights have {weights} entries but factor matrix has {factors} rows")]
    ShapeMismatch { weights: usize, factors: usize },

    /// A posterior model needs at least one sample.
    #[error("no samples available")]
    NoSamples,

    /// Posterior samples must share one feature dimension and factor count.
    #[error("sample {index} has {actual} {dimension}, expected {expected}")]
    InconsistentSamples {
        index: usize,
        /// `"features"` or `"factors"`.
        dimension: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The requested output only exists for classification models.
    #[error("{0} is only available for classification models")]
    TaskMismatch(&'static str),
}

impl FMError {
    /// Returns `true` for errors caused by inputs that don't fit the model.
    pub fn is_input_validation(&self) -> bool {
        matches!(
            self,
            Self::CaseCountMismatch { .. } | Self::FeatureSizeMismatch { .. }
        )
    }
}
