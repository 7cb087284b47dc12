use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::data::{RelationBlock, SparseMatrix};
use crate::repr::fm::FactorizationMachine;

/// Generate a random sparse matrix.
///
/// Each entry is stored with probability `density`; stored values are uniform
/// in `[-1, 1)`.
pub fn random_sparse(rows: usize, cols: usize, density: f64, seed: u64) -> SparseMatrix {
	assert!((0.0..=1.0).contains(&density));
	let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
	let mut triplets = Vec::new();
	for r in 0..rows {
		for c in 0..cols {
			if rng.gen::<f64>() < density {
				triplets.push((r, c, rng.gen::<f64>() * 2.0 - 1.0));
			}
		}
	}
	SparseMatrix::from_triplets(rows, cols, &triplets).expect("generated triplets are in bounds")
}

/// Generate a random one-hot matrix: every row has a single `1.0` entry.
///
/// This is the typical shape of categorical id features (user id, item id).
pub fn random_one_hot(rows: usize, cols: usize, seed: u64) -> SparseMatrix {
	assert!(cols > 0 || rows == 0);
	let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
	let triplets: Vec<_> = (0..rows).map(|r| (r, rng.gen_range(0..cols), 1.0)).collect();
	SparseMatrix::from_triplets(rows, cols, &triplets).expect("generated triplets are in bounds")
}

/// Generate a relation block with `n_groups` random group rows and a uniform
/// random case → group mapping over `n_cases` cases.
pub fn random_relation_block(
	n_cases: usize,
	n_groups: usize,
	feature_size: usize,
	density: f64,
	seed: u64,
) -> RelationBlock {
	assert!(n_groups > 0 || n_cases == 0);
	let features = random_sparse(n_groups, feature_size, density, seed);
	let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed ^ 0x5EED_0F_6A0C);
	let case_to_group = (0..n_cases).map(|_| rng.gen_range(0..n_groups)).collect();
	RelationBlock::new(features, case_to_group).expect("generated groups are in bounds")
}

/// Create an initialized machine with weights drawn from `Normal(0, init_std)`.
pub fn random_fm(n_features: usize, n_factors: usize, init_std: f64, seed: u64) -> FactorizationMachine {
	let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
	let mut fm = FactorizationMachine::new(n_factors);
	fm.initialize_weights(n_features, init_std, &mut rng)
		.expect("init_std must be finite and >= 0");
	fm
}
