//! Factorization machine representation.

mod model;

pub use model::FactorizationMachine;
