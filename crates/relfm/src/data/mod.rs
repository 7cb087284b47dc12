//! Input data for scoring.
//!
//! - [`SparseMatrix`]: CSR feature matrix, one row per case (or per group)
//! - [`RelationBlock`]: group-level features broadcast to cases by index
//!
//! The full feature vector of a case is the primary matrix row followed by
//! the mapped row of every relation block, in the order the blocks are given.

mod relation;
mod sparse;

pub use relation::RelationBlock;
pub use sparse::{SparseError, SparseMatrix};
