//! Prediction algorithms.
//!
//! Scoring is provided as extension traits over the parameter types in
//! [`crate::repr`].

pub mod fm;
