//! Relation blocks: features stored once per group and shared by many cases.

use super::sparse::{SparseError, SparseMatrix};

/// A group-level feature matrix plus the case → group mapping.
///
/// Each row of [`features`](Self::features) describes one group (e.g. one
/// user with all of their metadata). Every case of a batch points at exactly
/// one group through [`case_to_group`](Self::case_to_group), so the block
/// contributes `features.row(case_to_group[case])` to that case's feature
/// vector without the row ever being copied.
///
/// Blocks are borrowed for a single scoring call and must be built against
/// the batch they are scored with: `n_cases()` has to equal the primary
/// matrix's row count.
///
/// # Example
///
/// ```
/// use relfm::{RelationBlock, SparseMatrix};
///
/// // 2 users with 3 metadata features each.
/// let users = SparseMatrix::from_triplets(2, 3, &[(0, 0, 1.0), (1, 2, 1.0)]).unwrap();
/// // 4 interactions: user 0, user 1, user 1, user 0.
/// let block = RelationBlock::new(users, vec![0, 1, 1, 0]).unwrap();
///
/// assert_eq!(block.n_cases(), 4);
/// assert_eq!(block.n_groups(), 2);
/// assert_eq!(block.feature_size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RelationBlock {
    features: SparseMatrix,
    case_to_group: Vec<usize>,
}

impl RelationBlock {
    /// Create a relation block.
    ///
    /// # Errors
    ///
    /// Returns [`SparseError::GroupOutOfBounds`] if any case maps to a group
    /// index `>= features.n_rows()`.
    pub fn new(features: SparseMatrix, case_to_group: Vec<usize>) -> Result<Self, SparseError> {
        let n_groups = features.n_rows();
        if let Some((case, &group)) = case_to_group
            .iter()
            .enumerate()
            .find(|&(_, &g)| g >= n_groups)
        {
            return Err(SparseError::GroupOutOfBounds {
                case,
                group,
                n_groups,
            });
        }
        Ok(Self {
            features,
            case_to_group,
        })
    }

    /// Group-level feature matrix `[n_groups, feature_size]`.
    #[inline]
    pub fn features(&self) -> &SparseMatrix {
        &self.features
    }

    /// Group index of every case.
    #[inline]
    pub fn case_to_group(&self) -> &[usize] {
        &self.case_to_group
    }

    /// Number of cases this block is mapped onto.
    #[inline]
    pub fn n_cases(&self) -> usize {
        self.case_to_group.len()
    }

    /// Number of distinct groups (rows of the feature matrix).
    #[inline]
    pub fn n_groups(&self) -> usize {
        self.features.n_rows()
    }

    /// Width of this block's slice of the feature-index space.
    #[inline]
    pub fn feature_size(&self) -> usize {
        self.features.n_cols()
    }

    /// Add `per_group[case_to_group[case]]` to `out[case]` for every case.
    #[inline]
    pub(crate) fn scatter_add(&self, per_group: &[f64], out: &mut [f64]) {
        debug_assert_eq!(out.len(), self.case_to_group.len());
        for (slot, &group) in out.iter_mut().zip(&self.case_to_group) {
            *slot += per_group[group];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_group_out_of_bounds() {
        let features = SparseMatrix::zeros(2, 1);
        let err = RelationBlock::new(features, vec![0, 2, 1]).unwrap_err();
        assert_eq!(
            err,
            SparseError::GroupOutOfBounds {
                case: 1,
                group: 2,
                n_groups: 2
            }
        );
    }

    #[test]
    fn empty_mapping_is_valid() {
        let block = RelationBlock::new(SparseMatrix::zeros(0, 3), Vec::new()).unwrap();
        assert_eq!(block.n_cases(), 0);
        assert_eq!(block.feature_size(), 3);
    }

    #[test]
    fn scatter_add_broadcasts_group_values() {
        let block = RelationBlock::new(SparseMatrix::zeros(2, 1), vec![1, 0, 1]).unwrap();
        let mut out = vec![1.0, 1.0, 1.0];
        block.scatter_add(&[10.0, 20.0], &mut out);
        assert_eq!(out, vec![21.0, 11.0, 21.0]);
    }
}
