//! One-sided truncated normal sampling.
//!
//! Used by Gibbs samplers for probit-link latent variables, which are normal
//! draws conditioned on lying above or below zero.
//!
//! # Algorithm
//!
//! For `z ~ N(0, 1)` conditioned on `z > mu_minus`:
//!
//! - `mu_minus < 0`: plain rejection from `N(0, 1)`. At least half of all
//!   draws are accepted.
//! - `mu_minus >= 0`: rejection from a shifted exponential proposal with rate
//!   `alpha* = (mu_minus + sqrt(mu_minus² + 4)) / 2`, accepting with
//!   probability `exp(-(z - alpha*)² / 2)`. The acceptance rate stays bounded
//!   away from zero however far into the tail `mu_minus` lies, where rejection
//!   from `N(0, 1)` would almost never accept.
//!
//! See Robert (1995), "Simulation of truncated normal variables",
//! Proposition 2.3 (arXiv:0907.4010).
//!
//! Neither loop has an iteration cap; termination relies on the generator
//! producing independent variates.
//!
//! For truncation points so far out that the excess over the bound is below
//! `f64` resolution, draws collapse onto the bound itself.

use rand::distributions::Open01;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Draw `z ~ N(0, 1)` conditioned on `z > mu_minus`.
///
/// `mu_minus` must not be NaN or `+∞`; `-∞` means no truncation.
pub fn sample_left<R: Rng + ?Sized>(rng: &mut R, mu_minus: f64) -> f64 {
    debug_assert!(
        !mu_minus.is_nan() && mu_minus != f64::INFINITY,
        "truncation point must be < +inf, got {mu_minus}"
    );

    if mu_minus < 0.0 {
        loop {
            let z: f64 = rng.sample(StandardNormal);
            if z > mu_minus {
                return z;
            }
        }
    }

    // hypot keeps the rate finite where mu_minus² would overflow.
    let alpha_star = 0.5 * mu_minus + 0.5 * mu_minus.hypot(2.0);
    loop {
        let u: f64 = rng.sample(Open01);
        let z = -u.ln() / alpha_star + mu_minus;
        let rho = (-(z - alpha_star) * (z - alpha_star) / 2.0).exp();
        let accept: f64 = rng.sample(Open01);
        if accept < rho {
            return z;
        }
    }
}

/// Draw `x ~ N(mean, std²)` conditioned on `x > mu_minus`.
///
/// Equivalent to `mean + std * sample_left((mu_minus - mean) / std)`; `std`
/// must be positive. The result never falls below `mu_minus`, even when
/// rescaling rounds it.
pub fn sample_left_scaled<R: Rng + ?Sized>(rng: &mut R, mean: f64, std: f64, mu_minus: f64) -> f64 {
    (mean + std * sample_left(rng, (mu_minus - mean) / std)).max(mu_minus)
}

/// Draw `z ~ N(0, 1)` conditioned on `z < mu_plus`.
///
/// Defined by symmetry as `-sample_left(-mu_plus)`.
pub fn sample_right<R: Rng + ?Sized>(rng: &mut R, mu_plus: f64) -> f64 {
    -sample_left(rng, -mu_plus)
}

/// Draw `x ~ N(mean, std²)` conditioned on `x < mu_plus`.
pub fn sample_right_scaled<R: Rng + ?Sized>(rng: &mut R, mean: f64, std: f64, mu_plus: f64) -> f64 {
    (mean + std * sample_right(rng, (mu_plus - mean) / std)).min(mu_plus)
}

// =============================================================================
// Distribution wrapper
// =============================================================================

/// Error raised for invalid truncated normal parameters.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum TruncatedNormalError {
    #[error("mean must be finite, got {0}")]
    InvalidMean(f64),
    #[error("std must be finite and > 0, got {0}")]
    InvalidStd(f64),
    #[error("truncation bound {0} leaves no support representable at this mean and std")]
    InvalidBound(f64),
}

/// Which tail is cut off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Left-truncated: support is `(bound, +∞)`.
    Left,
    /// Right-truncated: support is `(-∞, bound)`.
    Right,
}

/// One-sided truncated normal as a [`rand_distr::Distribution`].
///
/// # Example
///
/// ```
/// use relfm::TruncatedNormal;
/// use rand::SeedableRng;
/// use rand_distr::Distribution;
/// use rand_xoshiro::Xoshiro256PlusPlus;
///
/// let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
/// let dist = TruncatedNormal::left(1.0, 2.0, 3.0).unwrap();
/// let x = dist.sample(&mut rng);
/// assert!(x > 3.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruncatedNormal {
    mean: f64,
    std: f64,
    bound: f64,
    side: Side,
}

impl TruncatedNormal {
    /// `N(mean, std²)` conditioned on `x > lower`.
    pub fn left(mean: f64, std: f64, lower: f64) -> Result<Self, TruncatedNormalError> {
        Self::new(mean, std, lower, Side::Left)
    }

    /// `N(mean, std²)` conditioned on `x < upper`.
    pub fn right(mean: f64, std: f64, upper: f64) -> Result<Self, TruncatedNormalError> {
        Self::new(mean, std, upper, Side::Right)
    }

    fn new(mean: f64, std: f64, bound: f64, side: Side) -> Result<Self, TruncatedNormalError> {
        if !mean.is_finite() {
            return Err(TruncatedNormalError::InvalidMean(mean));
        }
        if !std.is_finite() || std <= 0.0 {
            return Err(TruncatedNormalError::InvalidStd(std));
        }
        // The samplers work on the standardized bound, which must stay on the
        // finite side of the kept tail.
        let standardized = (bound - mean) / std;
        let empty = match side {
            Side::Left => standardized == f64::INFINITY,
            Side::Right => standardized == f64::NEG_INFINITY,
        };
        if standardized.is_nan() || empty {
            return Err(TruncatedNormalError::InvalidBound(bound));
        }
        Ok(Self {
            mean,
            std,
            bound,
            side,
        })
    }

    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    #[inline]
    pub fn std(&self) -> f64 {
        self.std
    }

    #[inline]
    pub fn bound(&self) -> f64 {
        self.bound
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }
}

impl Distribution<f64> for TruncatedNormal {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self.side {
            Side::Left => sample_left_scaled(rng, self.mean, self.std, self.bound),
            Side::Right => sample_right_scaled(rng, self.mean, self.std, self.bound),
        }
    }
}
