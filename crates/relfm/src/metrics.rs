//! Evaluation metrics.
//!
//! - [`rmse`]: regression scores against continuous targets
//! - [`log_loss`]: probit probabilities against 0/1 labels

use ndarray::ArrayView1;

/// Clamp applied inside the logarithms of [`log_loss`].
const LOG_EPS: f64 = 1e-15;

// =============================================================================
// RMSE (Root Mean Squared Error)
// =============================================================================

/// Root Mean Squared Error: sqrt(mean((pred - label)²))
///
/// Lower is better. Returns 0.0 for empty input.
///
/// # Panics
///
/// Panics if `predictions` and `targets` differ in length.
pub fn rmse(predictions: ArrayView1<'_, f64>, targets: ArrayView1<'_, f64>) -> f64 {
    assert_eq!(
        predictions.len(),
        targets.len(),
        "predictions and targets must have the same length"
    );
    if predictions.is_empty() {
        return 0.0;
    }

    let sum_sq: f64 = predictions
        .iter()
        .zip(targets.iter())
        .map(|(&p, &y)| (p - y) * (p - y))
        .sum();
    (sum_sq / predictions.len() as f64).sqrt()
}

// =============================================================================
// Log Loss
// =============================================================================

/// Mean binary cross-entropy of positive-class probabilities.
///
/// Labels `> 0` count as positive. Probabilities are offset by `1e-15`
/// inside the logarithms so 0 and 1 stay finite. Lower is better; returns
/// 0.0 for empty input.
///
/// # Panics
///
/// Panics if `probabilities` and `labels` differ in length.
pub fn log_loss(probabilities: ArrayView1<'_, f64>, labels: ArrayView1<'_, f64>) -> f64 {
    assert_eq!(
        probabilities.len(),
        labels.len(),
        "probabilities and labels must have the same length"
    );
    if probabilities.is_empty() {
        return 0.0;
    }

    let total: f64 = probabilities
        .iter()
        .zip(labels.iter())
        .map(|(&p, &y)| {
            if y > 0.0 {
                -(p + LOG_EPS).ln()
            } else {
                -(1.0 - p + LOG_EPS).ln()
            }
        })
        .sum();
    total / probabilities.len() as f64
}
