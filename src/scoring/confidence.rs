//! Threshold-relative confidence transform.

use super::error::ScoringError;

/// Number of decimal places kept when confidence crosses the HTTP boundary.
pub const CONFIDENCE_DECIMALS: i32 = 4;

/// Maps a raw probability to a confidence score in `[0, 1]`.
///
/// Confidence is `0.5` when `probability == threshold` and approaches `1.0` as
/// the probability moves toward either extreme:
///
/// ```text
/// f1 = p / t
/// f2 = (1 - p) / (1 - t)
/// confidence = 1 - 0.5 * min(f1, f2)
/// ```
///
/// Preconditions: `probability` in `[0, 1]` and `threshold` in `(0, 1)`.
/// Outside that domain the result is unclamped.
///
/// # Example
///
/// ```
/// use sentiment::scoring::confidence;
///
/// assert!((confidence(0.9, 0.5) - 0.9).abs() < 1e-12);
/// assert_eq!(confidence(0.5, 0.5), 0.5);
/// ```
pub fn confidence(probability: f64, threshold: f64) -> f64 {
    let f1 = probability / threshold;
    let f2 = (1.0 - probability) / (1.0 - threshold);
    1.0 - 0.5 * f1.min(f2)
}

/// Rounds a confidence value to [`CONFIDENCE_DECIMALS`] places.
pub fn round_confidence(value: f64) -> f64 {
    let scale = 10f64.powi(CONFIDENCE_DECIMALS);
    (value * scale).round() / scale
}

/// Checks that `threshold` is a usable decision boundary.
///
/// `0` and `1` are rejected because one side of [`confidence`] would divide by
/// zero. NaN and infinities are rejected as well.
pub fn validate_threshold(threshold: f64) -> Result<f64, ScoringError> {
    if threshold.is_finite() && threshold > 0.0 && threshold < 1.0 {
        Ok(threshold)
    } else {
        Err(ScoringError::InvalidThreshold { value: threshold })
    }
}
