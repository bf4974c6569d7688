use crate::error::RobustError;

/// Computes how many trials are needed to draw at least one outlier-free
/// minimal sample with probability `confidence`.
///
/// The standard bound `ln(1 - p) / ln(1 - (1 - ep)^m)` is evaluated with the
/// inputs clamped to `[0, 1]` and the result capped at `max_iters`, so the
/// returned budget never exceeds the current one. Numerically degenerate
/// inputs keep the current cap instead of producing infinities.
///
/// * `confidence` - Desired probability `p` of success.
/// * `outlier_ratio` - Observed fraction `ep` of outliers.
/// * `model_points` - Minimal sample size `m`.
/// * `max_iters` - The current iteration cap.
///
/// # Returns
///
/// The number of trials in `[0, max_iters]`. Zero when no outliers were
/// observed.
///
/// # Example
///
/// ```rust
/// use kornia_robust::iterations_needed;
///
/// let n = iterations_needed(0.99, 0.5, 4, 2000)?;
/// assert_eq!(n, 71);
/// # Ok::<(), kornia_robust::RobustError>(())
/// ```
pub fn iterations_needed(
    confidence: f64,
    outlier_ratio: f64,
    model_points: usize,
    max_iters: usize,
) -> Result<usize, RobustError> {
    if model_points == 0 {
        return Err(RobustError::InvalidSampleSize(model_points));
    }

    let p = confidence.clamp(0.0, 1.0);
    let ep = outlier_ratio.clamp(0.0, 1.0);

    // avoid inf's and nan's
    let num = (1.0 - p).max(f64::MIN_POSITIVE);
    let denom = 1.0 - (1.0 - ep).powi(model_points as i32);
    if denom < f64::MIN_POSITIVE {
        return Ok(0);
    }

    let num = num.ln();
    let denom = denom.ln();

    if denom >= 0.0 || -num >= max_iters as f64 * -denom {
        return Ok(max_iters);
    }

    Ok((num / denom).round() as usize)
}
