use crate::error::AffineError;
use crate::{Affine2dKernel, Affine3dKernel};
use kornia_robust::{
    Estimator, EstimatorConfig, LmedsParams, ModelKernel, ModelMatrix, RansacParams, RobustMethod,
};

/// Reprojection threshold used when the supplied one is not positive.
const DEFAULT_REPROJ_THRESHOLD: f64 = 3.0;

/// Confidence used when the supplied one is not strictly inside (0, 1).
const DEFAULT_CONFIDENCE: f64 = 0.99;

/// Result of a robust affine estimation.
#[derive(Clone, Debug)]
pub struct AffineResult<const R: usize, const C: usize> {
    /// Estimated affine transformation `[A | t]` with shape (R, C).
    pub model: [[f64; C]; R],
    /// Per-correspondence inlier mask.
    pub inliers: Vec<bool>,
    /// Total inlier count.
    pub inlier_count: usize,
}

/// Robustly estimates the 2D affine transformation mapping `source` onto `target`.
///
/// * `source` - The source points with shape (N, 2), N >= 3.
/// * `target` - The target points with shape (N, 2).
/// * `method` - The robust strategy and its parameters.
/// * `config` - The sampling configuration.
///
/// # Returns
///
/// The affine transformation with shape (2, 3) and its inliers.
pub fn estimate_affine_2d(
    source: &[[f64; 2]],
    target: &[[f64; 2]],
    method: &RobustMethod,
    config: &EstimatorConfig,
) -> Result<AffineResult<2, 3>, AffineError> {
    estimate_affine(Affine2dKernel, source, target, method, config)
}

/// Robustly estimates the 3D affine transformation mapping `source` onto `target`.
///
/// A non-positive RANSAC threshold falls back to 3.0 and a confidence outside
/// (0, 1) falls back to 0.99.
///
/// * `source` - The source points with shape (N, 3), N >= 4.
/// * `target` - The target points with shape (N, 3).
/// * `method` - The robust strategy and its parameters.
/// * `config` - The sampling configuration.
///
/// # Returns
///
/// The affine transformation with shape (3, 4) and its inliers.
pub fn estimate_affine_3d(
    source: &[[f64; 3]],
    target: &[[f64; 3]],
    method: &RobustMethod,
    config: &EstimatorConfig,
) -> Result<AffineResult<3, 4>, AffineError> {
    estimate_affine(Affine3dKernel, source, target, method, config)
}

fn estimate_affine<K, const D: usize, const R: usize, const C: usize>(
    kernel: K,
    source: &[[f64; D]],
    target: &[[f64; D]],
    method: &RobustMethod,
    config: &EstimatorConfig,
) -> Result<AffineResult<R, C>, AffineError>
where
    K: ModelKernel<Point = [f64; D]>,
{
    let required = kernel.model_points();
    if source.len() < required {
        return Err(AffineError::InsufficientCorrespondences {
            required,
            actual: source.len(),
        });
    }

    let method = sanitize_method(method);
    let mut estimator = Estimator::with_config(kernel, config);
    let mut model = ModelMatrix::zeros(R, C);
    let mut mask = vec![true; source.len()];

    let summary = estimator.run(source, target, &mut model, &mut mask, &method)?;
    if !summary.success {
        log::debug!("affine {}D: no model found after {} trials", D, summary.trials);
        return Err(AffineError::NotFound);
    }

    let mut affine = [[0.0; C]; R];
    for (r, row) in affine.iter_mut().enumerate() {
        row.copy_from_slice(model.row(r));
    }

    Ok(AffineResult {
        model: affine,
        inliers: mask,
        inlier_count: summary.inlier_count,
    })
}

/// Replaces out-of-range thresholds and confidences with the defaults.
fn sanitize_method(method: &RobustMethod) -> RobustMethod {
    let confidence = |p: f64| {
        if p < f64::EPSILON || p > 1.0 - f64::EPSILON {
            DEFAULT_CONFIDENCE
        } else {
            p
        }
    };

    match *method {
        RobustMethod::Ransac(params) => RobustMethod::Ransac(RansacParams {
            reproj_threshold: if params.reproj_threshold <= 0.0 {
                DEFAULT_REPROJ_THRESHOLD
            } else {
                params.reproj_threshold
            },
            confidence: confidence(params.confidence),
            ..params
        }),
        RobustMethod::Lmeds(params) => RobustMethod::Lmeds(LmedsParams {
            confidence: confidence(params.confidence),
            ..params
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kornia_robust::RobustError;

    #[test]
    fn test_sanitize_method() {
        let method = RobustMethod::Ransac(RansacParams {
            reproj_threshold: -1.0,
            confidence: 1.0,
            max_iterations: 10,
        });
        assert_eq!(
            sanitize_method(&method),
            RobustMethod::Ransac(RansacParams {
                reproj_threshold: 3.0,
                confidence: 0.99,
                max_iterations: 10,
            })
        );

        let method = RobustMethod::Lmeds(LmedsParams {
            confidence: 0.5,
            max_iterations: 10,
        });
        assert_eq!(sanitize_method(&method), method);
    }

    #[test]
    fn test_insufficient_correspondences() {
        let pts = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let res = estimate_affine_3d(&pts, &pts, &RobustMethod::default(), &Default::default());
        assert_eq!(
            res.unwrap_err(),
            AffineError::InsufficientCorrespondences {
                required: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_mismatched_lengths() {
        let x1 = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
        let x2 = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        let res = estimate_affine_2d(&x1, &x2, &RobustMethod::default(), &Default::default());
        assert!(matches!(
            res,
            Err(AffineError::Robust(RobustError::MismatchedArrayLengths { .. }))
        ));
    }

    #[test]
    fn test_collinear_points_not_found() {
        let x1: Vec<[f64; 2]> = (0..10).map(|i| [i as f64, 2.0 * i as f64 + 1.0]).collect();
        let res = estimate_affine_2d(&x1, &x1, &RobustMethod::default(), &Default::default());
        assert_eq!(res.unwrap_err(), AffineError::NotFound);
    }
}
