//! Posterior factorization machine model.
//!
//! A Gibbs sampler keeps one [`FactorizationMachine`] per retained iteration.
//! [`FMModel`] scores a batch with every retained sample and averages them.

use ndarray::Array1;

use crate::data::{RelationBlock, SparseMatrix};
use crate::error::FMError;
use crate::inference::fm::FactorizationMachinePredict;
use crate::model::meta::{ModelMeta, TaskKind};
use crate::repr::fm::FactorizationMachine;
use crate::utils::normal_cdf;

/// Ensemble of sampled factorization machines with posterior-mean prediction.
///
/// For classification the probit link is applied per sample before averaging,
/// so [`predict_proba`](Self::predict_proba) is the posterior predictive
/// probability rather than the probability of the mean score.
///
/// # Example
///
/// ```
/// use relfm::{FactorizationMachine, FMModel, SparseMatrix, TaskKind};
/// use ndarray::array;
///
/// let a = FactorizationMachine::from_parts(1.0, array![1.0], array![[0.0]]).unwrap();
/// let b = FactorizationMachine::from_parts(3.0, array![1.0], array![[0.0]]).unwrap();
/// let model = FMModel::new(vec![a, b], TaskKind::Regression).unwrap();
///
/// let x = SparseMatrix::from_dense(array![[1.0]].view());
/// assert_eq!(model.predict_score(&x, &[]).unwrap()[0], 3.0);
/// ```
#[derive(Debug, Clone)]
pub struct FMModel {
    samples: Vec<FactorizationMachine>,
    meta: ModelMeta,
}

impl FMModel {
    /// Create a model from retained samples.
    ///
    /// # Errors
    ///
    /// - [`FMError::NoSamples`] if `samples` is empty
    /// - [`FMError::InconsistentSamples`] if samples disagree on the feature
    ///   count or the factor count
    pub fn new(samples: Vec<FactorizationMachine>, task: TaskKind) -> Result<Self, FMError> {
        let first = samples.first().ok_or(FMError::NoSamples)?;
        let n_features = first.n_features();
        let n_factors = first.n_factors();

        for (index, fm) in samples.iter().enumerate().skip(1) {
            if fm.n_features() != n_features {
                return Err(FMError::InconsistentSamples {
                    index,
                    dimension: "features",
                    expected: n_features,
                    actual: fm.n_features(),
                });
            }
            if fm.n_factors() != n_factors {
                return Err(FMError::InconsistentSamples {
                    index,
                    dimension: "factors",
                    expected: n_factors,
                    actual: fm.n_factors(),
                });
            }
        }

        let meta = ModelMeta {
            n_features,
            n_factors,
            n_samples: samples.len(),
            task,
        };
        Ok(Self { samples, meta })
    }

    #[inline]
    pub fn samples(&self) -> &[FactorizationMachine] {
        &self.samples
    }

    #[inline]
    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    #[inline]
    pub fn task(&self) -> TaskKind {
        self.meta.task
    }

    /// Posterior-mean raw score.
    pub fn predict_score(
        &self,
        x: &SparseMatrix,
        relations: &[RelationBlock],
    ) -> Result<Array1<f64>, FMError> {
        self.mean_over_samples(x, relations, |score| score)
    }

    /// Posterior predictive probability of the positive class.
    ///
    /// # Errors
    ///
    /// Returns [`FMError::TaskMismatch`] for regression models, in addition to
    /// any scoring error.
    pub fn predict_proba(
        &self,
        x: &SparseMatrix,
        relations: &[RelationBlock],
    ) -> Result<Array1<f64>, FMError> {
        if !self.meta.task.is_classification() {
            return Err(FMError::TaskMismatch("predict_proba"));
        }
        self.mean_over_samples(x, relations, normal_cdf)
    }

    /// Predicted class: `predict_proba > 0.5`.
    pub fn predict_class(
        &self,
        x: &SparseMatrix,
        relations: &[RelationBlock],
    ) -> Result<Array1<bool>, FMError> {
        if !self.meta.task.is_classification() {
            return Err(FMError::TaskMismatch("predict_class"));
        }
        Ok(self.predict_proba(x, relations)?.mapv(|p| p > 0.5))
    }

    /// Task-appropriate prediction: mean score for regression, probability for
    /// classification.
    pub fn predict(
        &self,
        x: &SparseMatrix,
        relations: &[RelationBlock],
    ) -> Result<Array1<f64>, FMError> {
        match self.meta.task {
            TaskKind::Regression => self.predict_score(x, relations),
            TaskKind::BinaryClassification => self.predict_proba(x, relations),
        }
    }

    fn mean_over_samples(
        &self,
        x: &SparseMatrix,
        relations: &[RelationBlock],
        link: impl Fn(f64) -> f64,
    ) -> Result<Array1<f64>, FMError> {
        log::debug!(
            "averaging {} samples over {} cases",
            self.samples.len(),
            x.n_rows()
        );

        let mut total = Array1::<f64>::zeros(x.n_rows());
        for fm in &self.samples {
            let scores = fm.predict(x, relations)?;
            total.zip_mut_with(&scores, |acc, &s| *acc += link(s));
        }
        total /= self.samples.len() as f64;
        Ok(total)
    }
}
