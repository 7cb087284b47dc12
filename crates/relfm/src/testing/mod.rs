//! Test and benchmark utilities.
//!
//! Seeded generators for synthetic feature matrices and relation blocks, and
//! reference implementations that the fast paths are checked against.

pub mod data;
pub mod reference;
