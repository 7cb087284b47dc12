//! Factorization machine inference.

mod predict;

pub use predict::FactorizationMachinePredict;
