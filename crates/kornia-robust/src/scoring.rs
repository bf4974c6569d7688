use crate::kernel::ModelKernel;
use crate::model::ModelMatrix;

/// Classifies every correspondence as inlier or outlier under `model`.
///
/// The kernel residuals are written to `errors` and compared against the
/// square of the geometric `threshold`, since kernels report squared errors.
/// `mask[i]` is set to whether correspondence `i` is an inlier.
///
/// * `kernel` - The model plug-in computing the residuals.
/// * `source` - The source points with shape (N,).
/// * `target` - The target points with shape (N,).
/// * `model` - The candidate model.
/// * `errors` - Scratch buffer for the residuals with shape (N,).
/// * `mask` - The output inlier mask with shape (N,).
/// * `threshold` - The geometric inlier threshold.
///
/// # Returns
///
/// The number of inliers.
pub fn find_inliers<K: ModelKernel>(
    kernel: &K,
    source: &[K::Point],
    target: &[K::Point],
    model: &ModelMatrix,
    errors: &mut [f64],
    mask: &mut [bool],
    threshold: f64,
) -> usize {
    debug_assert_eq!(source.len(), errors.len());
    debug_assert_eq!(source.len(), mask.len());

    kernel.reprojection_error(source, target, model, errors);

    let threshold = threshold * threshold;
    let mut good_count = 0;
    for (m, &e) in mask.iter_mut().zip(errors.iter()) {
        *m = e <= threshold;
        good_count += *m as usize;
    }
    good_count
}

/// Computes the median of `values`.
///
/// For an even number of values the mean of the two central order statistics
/// is returned. The slice is partially reordered in the process.
///
/// # Example
///
/// ```rust
/// use kornia_robust::median;
///
/// assert_eq!(median(&mut [5.0, 1.0, 4.0, 2.0, 3.0]), Some(3.0));
/// assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), Some(2.5));
/// assert_eq!(median(&mut []), None);
/// ```
pub fn median(values: &mut [f64]) -> Option<f64> {
    let n = values.len();
    if n == 0 {
        return None;
    }

    let half = n / 2;
    let (lower, upper, _) = values.select_nth_unstable_by(half, f64::total_cmp);
    let upper = *upper;
    if n % 2 != 0 {
        return Some(upper);
    }

    let lower = lower.iter().copied().max_by(f64::total_cmp)?;
    Some((lower + upper) * 0.5)
}
