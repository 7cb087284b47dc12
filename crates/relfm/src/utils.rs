//! Common utilities used across the crate.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

// =============================================================================
// Normal Distribution Helpers
// =============================================================================

/// Standard normal cumulative distribution function `Φ(x)`.
///
/// Used as the probit link for classification and as the reference CDF when
/// checking truncated normal samples.
#[inline]
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + libm::erf(x * FRAC_1_SQRT_2))
}

/// Standard normal upper tail `1 - Φ(x)`, accurate for large positive `x`.
#[inline]
pub fn normal_sf(x: f64) -> f64 {
    0.5 * libm::erfc(x * FRAC_1_SQRT_2)
}

/// Standard normal probability density function `φ(x)`.
#[inline]
pub fn normal_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn cdf_known_values() {
        assert_abs_diff_eq!(normal_cdf(0.0), 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(normal_cdf(1.96), 0.975_002_104_851_780, epsilon = 1e-12);
        assert_abs_diff_eq!(normal_cdf(-1.0), 0.158_655_253_931_457, epsilon = 1e-12);
    }

    #[test]
    fn sf_is_complement() {
        for &x in &[-3.0, -0.5, 0.0, 0.7, 2.5] {
            assert_abs_diff_eq!(normal_sf(x), 1.0 - normal_cdf(x), epsilon = 1e-14);
        }
        // Far tail stays positive where 1 - Φ(x) underflows.
        assert!(normal_sf(40.0) > 0.0);
    }

    #[test]
    fn pdf_known_values() {
        assert_abs_diff_eq!(normal_pdf(0.0), 0.398_942_280_401_433, epsilon = 1e-15);
        assert_abs_diff_eq!(normal_pdf(1.0), normal_pdf(-1.0), epsilon = 1e-15);
    }
}
