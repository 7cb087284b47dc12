use ndarray::Array1;

use crate::data::{RelationBlock, SparseMatrix};
use crate::repr::fm::FactorizationMachine;

/// Materialize the full per-case feature matrix `[x | block 0 | block 1 | ...]`.
///
/// This is exactly what relation blocks avoid; it exists to check the
/// compressed path against.
///
/// # Panics
///
/// Panics if any block maps a different number of cases than `x` has rows.
pub fn expand_relations(x: &SparseMatrix, relations: &[RelationBlock]) -> SparseMatrix {
	let n_cols = x.n_cols() + relations.iter().map(RelationBlock::feature_size).sum::<usize>();
	let mut triplets = Vec::new();

	for (case, (cols, values)) in x.rows().enumerate() {
		triplets.extend(cols.iter().zip(values).map(|(&c, &v)| (case, c, v)));
	}

	let mut offset = x.n_cols();
	for rel in relations {
		assert_eq!(rel.n_cases(), x.n_rows(), "relation block case count mismatch");
		for (case, &group) in rel.case_to_group().iter().enumerate() {
			let (cols, values) = rel.features().row(group);
			triplets.extend(cols.iter().zip(values).map(|(&c, &v)| (case, offset + c, v)));
		}
		offset += rel.feature_size();
	}

	SparseMatrix::from_triplets(x.n_rows(), n_cols, &triplets).expect("expanded entries are in bounds")
}

/// Split `x` into its first `n_left` columns and the remaining columns.
pub fn split_columns(x: &SparseMatrix, n_left: usize) -> (SparseMatrix, SparseMatrix) {
	assert!(n_left <= x.n_cols());
	let mut left = Vec::new();
	let mut right = Vec::new();
	for (row, (cols, values)) in x.rows().enumerate() {
		for (&c, &v) in cols.iter().zip(values) {
			if c < n_left {
				left.push((row, c, v));
			} else {
				right.push((row, c - n_left, v));
			}
		}
	}
	(
		SparseMatrix::from_triplets(x.n_rows(), n_left, &left).expect("left split in bounds"),
		SparseMatrix::from_triplets(x.n_rows(), x.n_cols() - n_left, &right)
			.expect("right split in bounds"),
	)
}

/// Score every row by explicitly summing over all feature pairs.
///
/// O(nnz² · n_factors) per row.
pub fn brute_force_scores(fm: &FactorizationMachine, x: &SparseMatrix) -> Array1<f64> {
	assert_eq!(x.n_cols(), fm.n_features());
	x.rows()
		.map(|(cols, values)| {
			let mut score = fm.w0();
			for (i, (&fi, &xi)) in cols.iter().zip(values).enumerate() {
				score += fm.weight(fi) * xi;
				for (&fj, &xj) in cols[i + 1..].iter().zip(&values[i + 1..]) {
					score += fm.factors(fi).dot(&fm.factors(fj)) * xi * xj;
				}
			}
			score
		})
		.collect()
}
