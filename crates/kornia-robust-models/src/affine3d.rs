use faer::prelude::SpSolverLstsq;
use kornia_robust::{check_subset_3d, ModelKernel, ModelMatrix};

/// Fits a 3D affine transformation to point correspondences in the least squares sense.
///
/// * `x1` - The source points with shape (N, 3), N >= 4.
/// * `x2` - The destination points with shape (N, 3).
///
/// # Returns
///
/// The 3D affine transformation matrix with shape (3, 4), or `None` if there
/// are fewer than 4 correspondences or the points are degenerate.
pub fn fit_affine_3d(x1: &[[f64; 3]], x2: &[[f64; 3]]) -> Option<[[f64; 4]; 3]> {
    let n = x1.len().min(x2.len());
    if n < 4 {
        return None;
    }

    // each correspondence contributes one row per coordinate: [x y z 1] in the
    // block of the unknowns of that output row
    let mut mat_a = faer::Mat::<f64>::zeros(3 * n, 12);
    let mut mat_b = faer::Mat::<f64>::zeros(3 * n, 1);

    for i in 0..n {
        for k in 0..3 {
            let row = 3 * i + k;
            mat_a.write(row, 4 * k, x1[i][0]);
            mat_a.write(row, 4 * k + 1, x1[i][1]);
            mat_a.write(row, 4 * k + 2, x1[i][2]);
            mat_a.write(row, 4 * k + 3, 1.0);
            mat_b.write(row, 0, x2[i][k]);
        }
    }

    let params = mat_a.qr().solve_lstsq(mat_b);
    let x = params.col(0);

    let mut affine = [[0.0; 4]; 3];
    for (r, row) in affine.iter_mut().enumerate() {
        for (c, v) in row.iter_mut().enumerate() {
            *v = x[4 * r + c];
        }
    }
    affine.iter().flatten().all(|v| v.is_finite()).then_some(affine)
}

/// Maps a point through a 3D affine transformation.
pub fn transform_point_3d(affine: &[[f64; 4]; 3], p: &[f64; 3]) -> [f64; 3] {
    let mut out = [0.0; 3];
    for (o, row) in out.iter_mut().zip(affine) {
        *o = row[0] * p[0] + row[1] * p[1] + row[2] * p[2] + row[3];
    }
    out
}

/// Model kernel estimating a 3D affine transformation from 4 correspondences.
///
/// The model is the 3x4 matrix `[A | t]`. The residual is the squared
/// Euclidean distance between the mapped source point and its target. Samples
/// where a point lies on the line through two others are rejected.
#[derive(Clone, Copy, Debug, Default)]
pub struct Affine3dKernel;

impl ModelKernel for Affine3dKernel {
    type Point = [f64; 3];

    fn model_points(&self) -> usize {
        4
    }

    fn model_shape(&self) -> (usize, usize) {
        (3, 4)
    }

    fn max_solutions(&self) -> usize {
        1
    }

    fn fit(&self, source: &[[f64; 3]], target: &[[f64; 3]], models: &mut Vec<ModelMatrix>) {
        if let Some(affine) = fit_affine_3d(source, target) {
            models.push(ModelMatrix::from_rows(&affine));
        }
    }

    fn reprojection_error(
        &self,
        source: &[[f64; 3]],
        target: &[[f64; 3]],
        model: &ModelMatrix,
        errors: &mut [f64],
    ) {
        let f = model.as_slice();
        for ((s, t), e) in source.iter().zip(target).zip(errors.iter_mut()) {
            let a = f[0] * s[0] + f[1] * s[1] + f[2] * s[2] + f[3] - t[0];
            let b = f[4] * s[0] + f[5] * s[1] + f[6] * s[2] + f[7] - t[1];
            let c = f[8] * s[0] + f[9] * s[1] + f[10] * s[2] + f[11] - t[2];
            *e = a * a + b * b + c * c;
        }
    }

    fn check_subset(&self, sample: &[[f64; 3]]) -> bool {
        check_subset_3d(sample)
    }
}
