use faer::prelude::SpSolverLstsq;
use kornia_robust::{check_subset_2d, ModelKernel, ModelMatrix};

/// Fits a 2D affine transformation to point correspondences in the least squares sense.
///
/// * `x1` - The source points with shape (N, 2), N >= 3.
/// * `x2` - The destination points with shape (N, 2).
///
/// # Returns
///
/// The 2D affine transformation matrix with shape (2, 3), or `None` if there
/// are fewer than 3 correspondences or the points are degenerate.
pub fn fit_affine_2d(x1: &[[f64; 2]], x2: &[[f64; 2]]) -> Option<[[f64; 3]; 2]> {
    let n = x1.len().min(x2.len());
    if n < 3 {
        return None;
    }

    // construct matrix A
    let mut mat_a = faer::Mat::<f64>::zeros(2 * n, 6);
    let mut mat_b = faer::Mat::<f64>::zeros(2 * n, 1);

    for i in 0..n {
        let (x1_0, x1_1) = (x1[i][0], x1[i][1]);
        mat_a.write(2 * i, 0, x1_0);
        mat_a.write(2 * i, 1, x1_1);
        mat_a.write(2 * i, 2, 1.0);
        mat_a.write(2 * i + 1, 3, x1_0);
        mat_a.write(2 * i + 1, 4, x1_1);
        mat_a.write(2 * i + 1, 5, 1.0);
        mat_b.write(2 * i, 0, x2[i][0]);
        mat_b.write(2 * i + 1, 0, x2[i][1]);
    }

    let params = mat_a.qr().solve_lstsq(mat_b);
    let aff = params.col(0);

    let affine = [[aff[0], aff[1], aff[2]], [aff[3], aff[4], aff[5]]];
    affine.iter().flatten().all(|v| v.is_finite()).then_some(affine)
}

/// Maps a point through a 2D affine transformation.
pub fn transform_point_2d(affine: &[[f64; 3]; 2], p: &[f64; 2]) -> [f64; 2] {
    [
        affine[0][0] * p[0] + affine[0][1] * p[1] + affine[0][2],
        affine[1][0] * p[0] + affine[1][1] * p[1] + affine[1][2],
    ]
}

/// Model kernel estimating a 2D affine transformation from 3 correspondences.
///
/// The model is the 2x3 matrix `[A | t]` mapping source to target points. The
/// residual is the squared Euclidean distance between the mapped source point
/// and its target, and samples with collinear points are rejected.
#[derive(Clone, Copy, Debug, Default)]
pub struct Affine2dKernel;

impl ModelKernel for Affine2dKernel {
    type Point = [f64; 2];

    fn model_points(&self) -> usize {
        3
    }

    fn model_shape(&self) -> (usize, usize) {
        (2, 3)
    }

    fn max_solutions(&self) -> usize {
        1
    }

    fn fit(&self, source: &[[f64; 2]], target: &[[f64; 2]], models: &mut Vec<ModelMatrix>) {
        if let Some(affine) = fit_affine_2d(source, target) {
            models.push(ModelMatrix::from_rows(&affine));
        }
    }

    fn reprojection_error(
        &self,
        source: &[[f64; 2]],
        target: &[[f64; 2]],
        model: &ModelMatrix,
        errors: &mut [f64],
    ) {
        let f = model.as_slice();
        for ((s, t), e) in source.iter().zip(target).zip(errors.iter_mut()) {
            let a = f[0] * s[0] + f[1] * s[1] + f[2] - t[0];
            let b = f[3] * s[0] + f[4] * s[1] + f[5] - t[1];
            *e = a * a + b * b;
        }
    }

    fn check_subset(&self, sample: &[[f64; 2]]) -> bool {
        check_subset_2d(sample)
    }
}
