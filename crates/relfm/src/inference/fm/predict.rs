//! Factorization machine scoring with relation blocks.
//!
//! Provides prediction methods for [`FactorizationMachine`].
//!
//! # Algorithm
//!
//! The pairwise interaction term is evaluated per factor column `k` with the
//! usual identity
//!
//! ```text
//! Σ_{f < g} x_f x_g V[f,k] V[g,k] = 0.5 * ((Σ_f x_f V[f,k])² - Σ_f x_f² V[f,k]²)
//! ```
//!
//! so a case costs O(nnz) per factor. Relation-block features are projected
//! once per *group* and then scattered to cases through `case_to_group`, so a
//! block with G groups mapped onto N cases costs O(nnz(block) + N) per factor
//! instead of O(N · nnz per group).

use ndarray::{s, Array1, ArrayView1};

use crate::data::{RelationBlock, SparseMatrix};
use crate::error::FMError;
use crate::repr::fm::FactorizationMachine;

/// Extension trait for [`FactorizationMachine`] scoring.
pub trait FactorizationMachinePredict {
    /// Score a batch of cases whose features are split into a primary matrix
    /// and zero or more relation blocks.
    ///
    /// Feature indices are laid out as `[x columns | block 0 | block 1 | ...]`.
    ///
    /// # Errors
    ///
    /// - [`FMError::NotInitialized`] if weights were never initialized
    /// - [`FMError::CaseCountMismatch`] if a block maps a different number of
    ///   cases than `x` has rows
    /// - [`FMError::FeatureSizeMismatch`] if the feature widths don't add up to
    ///   the model dimension
    ///
    /// Validation happens before any computation.
    fn predict(&self, x: &SparseMatrix, relations: &[RelationBlock])
        -> Result<Array1<f64>, FMError>;

    /// Score a batch with no relation blocks. Same as `predict(x, &[])`.
    fn predict_single(&self, x: &SparseMatrix) -> Result<Array1<f64>, FMError> {
        self.predict(x, &[])
    }
}

impl FactorizationMachinePredict for FactorizationMachine {
    fn predict(
        &self,
        x: &SparseMatrix,
        relations: &[RelationBlock],
    ) -> Result<Array1<f64>, FMError> {
        let layout = FeatureLayout::validate(self, x, relations)?;
        let n_cases = x.n_rows();

        log::trace!(
            "scoring {} cases with {} relation blocks, {} factors",
            n_cases,
            relations.len(),
            self.n_factors()
        );

        // Scratch buffers reused across factor columns.
        let mut term = vec![0.0; n_cases];
        let mut group_buf = Vec::with_capacity(layout.max_groups);
        let mut col_sq = Array1::<f64>::zeros(self.n_features());

        let mut result = Array1::from_elem(n_cases, self.w0());

        layout.project(x, relations, self.w(), false, &mut group_buf, &mut term);
        for (r, &t) in result.iter_mut().zip(&term) {
            *r += t;
        }

        let v = self.v();
        for k in 0..self.n_factors() {
            let col = v.column(k);

            layout.project(x, relations, col, false, &mut group_buf, &mut term);
            for (r, &q) in result.iter_mut().zip(&term) {
                *r += 0.5 * q * q;
            }

            col_sq.zip_mut_with(&col, |dst, &vk| *dst = vk * vk);
            layout.project(x, relations, col_sq.view(), true, &mut group_buf, &mut term);
            for (r, &sq) in result.iter_mut().zip(&term) {
                *r -= 0.5 * sq;
            }
        }

        Ok(result)
    }
}

/// Validated column offsets of the primary matrix and every relation block.
struct FeatureLayout {
    n_primary: usize,
    /// Start of each block's slice in the full feature-index space.
    offsets: Vec<usize>,
    max_groups: usize,
}

impl FeatureLayout {
    fn validate(
        fm: &FactorizationMachine,
        x: &SparseMatrix,
        relations: &[RelationBlock],
    ) -> Result<Self, FMError> {
        if !fm.is_initialized() {
            return Err(FMError::NotInitialized);
        }

        for (block, rel) in relations.iter().enumerate() {
            if rel.n_cases() != x.n_rows() {
                return Err(FMError::CaseCountMismatch {
                    block,
                    expected: x.n_rows(),
                    actual: rel.n_cases(),
                });
            }
        }

        let mut offsets = Vec::with_capacity(relations.len());
        let mut end = x.n_cols();
        for rel in relations {
            offsets.push(end);
            end += rel.feature_size();
        }
        if end != fm.n_features() {
            return Err(FMError::FeatureSizeMismatch {
                expected: fm.n_features(),
                actual: end,
            });
        }

        Ok(Self {
            n_primary: x.n_cols(),
            offsets,
            max_groups: relations.iter().map(RelationBlock::n_groups).max().unwrap_or(0),
        })
    }

    /// Write the per-case projection of the full feature vector onto
    /// `weights` (length = full dimension) into `out`.
    ///
    /// With `square` set, feature values are squared before projecting.
    fn project(
        &self,
        x: &SparseMatrix,
        relations: &[RelationBlock],
        weights: ArrayView1<'_, f64>,
        square: bool,
        group_buf: &mut Vec<f64>,
        out: &mut [f64],
    ) {
        x.dot_into(weights.slice(s![..self.n_primary]), square, out);
        for (rel, &offset) in relations.iter().zip(&self.offsets) {
            let block_weights = weights.slice(s![offset..offset + rel.feature_size()]);
            project_scatter(rel, block_weights, square, group_buf, out);
        }
    }
}

/// Project a block's group rows onto `weights` once per group, then add each
/// group's value to every case mapped to it.
fn project_scatter(
    rel: &RelationBlock,
    weights: ArrayView1<'_, f64>,
    square: bool,
    group_buf: &mut Vec<f64>,
    out: &mut [f64],
) {
    group_buf.clear();
    group_buf.resize(rel.n_groups(), 0.0);
    rel.features().dot_into(weights, square, group_buf);
    rel.scatter_add(group_buf, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};

    /// w0 = 1, w = [1, 2, 3], V = [[1, 0], [0, 1], [1, 1]]
    fn small_model() -> FactorizationMachine {
        FactorizationMachine::from_parts(
            1.0,
            array![1.0, 2.0, 3.0],
            array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]],
        )
        .unwrap()
    }

    #[test]
    fn predict_hand_computed() {
        let fm = small_model();
        // row 0: x = [1, 1, 0] → 1 + 1 + 2 + <v0, v1> = 4 + 0 = 4
        // row 1: x = [2, 0, 1] → 1 + 2 + 3 + 2 * <v0, v2> = 6 + 2 = 8
        let x = SparseMatrix::from_dense(array![[1.0, 1.0, 0.0], [2.0, 0.0, 1.0]].view());
        let scores = fm.predict_single(&x).unwrap();
        assert_abs_diff_eq!(scores[0], 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(scores[1], 8.0, epsilon = 1e-12);
    }

    #[test]
    fn relation_block_matches_hand_computed() {
        let fm = small_model();
        // Primary: feature 0 only. Block: features 1..3, two groups.
        let x = SparseMatrix::from_dense(array![[1.0], [2.0], [0.0]].view());
        let groups = SparseMatrix::from_dense(array![[1.0, 0.0], [0.0, 1.0]].view());
        let block = RelationBlock::new(groups, vec![0, 1, 1]).unwrap();

        let scores = fm.predict(&x, &[block]).unwrap();
        // case 0: x = [1, 1, 0] → 4
        // case 1: x = [2, 0, 1] → 8
        // case 2: x = [0, 0, 1] → 1 + 3 = 4
        assert_abs_diff_eq!(scores[0], 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(scores[1], 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(scores[2], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_primary_with_blocks_only() {
        let fm = small_model();
        let x = SparseMatrix::zeros(2, 0);
        let a = RelationBlock::new(SparseMatrix::from_dense(array![[1.0]].view()), vec![0, 0])
            .unwrap();
        let b = RelationBlock::new(
            SparseMatrix::from_dense(array![[1.0, 0.0], [0.0, 0.0]].view()),
            vec![0, 1],
        )
        .unwrap();

        let scores = fm.predict(&x, &[a, b]).unwrap();
        // case 0: x = [1, 1, 0] → 4; case 1: x = [1, 0, 0] → 1 + 1 = 2
        assert_abs_diff_eq!(scores[0], 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(scores[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_factors_is_linear_model() {
        let fm =
            FactorizationMachine::from_parts(0.5, array![1.0, -1.0], Array2::zeros((2, 0))).unwrap();
        let x = SparseMatrix::from_dense(array![[2.0, 1.0]].view());
        let scores = fm.predict_single(&x).unwrap();
        assert_abs_diff_eq!(scores[0], 1.5, epsilon = 1e-12);
    }

    #[test]
    fn empty_batch() {
        let fm = small_model();
        let scores = fm.predict_single(&SparseMatrix::zeros(0, 3)).unwrap();
        assert_eq!(scores.len(), 0);
    }

    #[test]
    fn not_initialized_checked_first() {
        let fm = FactorizationMachine::new(2);
        // Also mismatched, but the initialization error wins.
        let err = fm.predict_single(&SparseMatrix::zeros(1, 5)).unwrap_err();
        assert_eq!(err, FMError::NotInitialized);
    }

    #[test]
    fn case_count_checked_before_feature_size() {
        let fm = small_model();
        let x = SparseMatrix::zeros(3, 1);
        let block = RelationBlock::new(SparseMatrix::zeros(1, 5), vec![0, 0]).unwrap();
        let err = fm.predict(&x, &[block]).unwrap_err();
        assert_eq!(
            err,
            FMError::CaseCountMismatch {
                block: 0,
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn feature_size_mismatch() {
        let fm = small_model();
        let x = SparseMatrix::zeros(2, 1);
        let block = RelationBlock::new(SparseMatrix::zeros(1, 1), vec![0, 0]).unwrap();
        let err = fm.predict(&x, &[block]).unwrap_err();
        assert_eq!(err, FMError::FeatureSizeMismatch { expected: 3, actual: 2 });
    }
}
