//! Random variate generation used by the Gibbs sampler.
//!
//! All samplers take the generator as `&mut R` with `R: Rng + ?Sized`; no
//! global or thread-local state is used.

pub mod truncnorm;

pub use truncnorm::{
    sample_left, sample_left_scaled, sample_right, sample_right_scaled, Side, TruncatedNormal,
    TruncatedNormalError,
};
