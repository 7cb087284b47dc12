//! relfm: Factorization machine scoring with relation blocks.
//!
//! Native Rust implementation of the prediction side of a Bayesian
//! factorization machine, including the relation-block compression for
//! features that are shared by many rows through a group index.
//!
//! # Key Types
//!
//! - [`FactorizationMachine`] - Parameter container (bias, weights, factors)
//! - [`FactorizationMachinePredict`] - Scoring, with or without relation blocks
//! - [`SparseMatrix`] / [`RelationBlock`] - Input data
//! - [`FMModel`] - Posterior-mean prediction over sampled machines
//! - [`sampling::truncnorm`] - One-sided truncated normal draws
//!
//! # Scoring
//!
//! ```
//! use relfm::{FactorizationMachine, FactorizationMachinePredict, RelationBlock, SparseMatrix};
//! use rand::SeedableRng;
//! use rand_xoshiro::Xoshiro256PlusPlus;
//!
//! let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
//! let mut fm = FactorizationMachine::new(4);
//! fm.initialize_weights(5, 0.1, &mut rng).unwrap();
//!
//! // Two cases with 3 primary features each.
//! let x = SparseMatrix::from_triplets(2, 3, &[(0, 0, 1.0), (1, 2, 1.0)]).unwrap();
//!
//! // One relation block with 2 features, shared by both cases through group 0.
//! let groups = SparseMatrix::from_triplets(1, 2, &[(0, 1, 1.0)]).unwrap();
//! let block = RelationBlock::new(groups, vec![0, 0]).unwrap();
//!
//! let scores = fm.predict(&x, &[block]).unwrap();
//! assert_eq!(scores.len(), 2);
//! ```

// Re-export approx traits for users who want to compare predictions
pub use approx;

pub mod data;
pub mod error;
pub mod inference;
pub mod metrics;
pub mod model;
pub mod repr;
pub mod sampling;
pub mod testing;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use data::{RelationBlock, SparseError, SparseMatrix};
pub use error::FMError;
pub use inference::fm::FactorizationMachinePredict;
pub use model::{ConfigError, FMConfig, FMModel, ModelMeta, TaskKind};
pub use repr::fm::FactorizationMachine;
pub use sampling::truncnorm::{TruncatedNormal, TruncatedNormalError};
