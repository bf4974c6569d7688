//! Degeneracy tests used to reject minimal samples in which fitting is ill-posed.
//!
//! Both predicates look only at the newest (last) point of the sample, so they
//! can be evaluated incrementally while a sample is being drawn.

/// Maximum absolute cosine between two difference vectors before the 3D
/// points are considered collinear.
const MAX_COLLINEAR_COSINE_3D: f64 = 0.996;

/// Checks that the last 2D point of `sample` is not collinear with any pair
/// of the previously selected points.
///
/// The cross product of the two difference vectors is compared against a
/// tolerance scaled by their magnitude, so exactly and nearly collinear (or
/// coincident) points are both rejected.
///
/// # Example
///
/// ```rust
/// use kornia_robust::check_subset_2d;
///
/// assert!(check_subset_2d(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]));
/// assert!(!check_subset_2d(&[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]));
/// ```
pub fn check_subset_2d(sample: &[[f64; 2]]) -> bool {
    let Some((last, previous)) = sample.split_last() else {
        return true;
    };

    for (j, pj) in previous.iter().enumerate() {
        let dx1 = pj[0] - last[0];
        let dy1 = pj[1] - last[1];
        for pk in &previous[..j] {
            let dx2 = pk[0] - last[0];
            let dy2 = pk[1] - last[1];
            let tol = f32::EPSILON as f64 * (dx1.abs() + dy1.abs() + dx2.abs() + dy2.abs());
            if (dx2 * dy1 - dy2 * dx1).abs() <= tol {
                return false;
            }
        }
    }

    true
}

/// Checks that the last 3D point of `sample` does not lie on a line through
/// any pair of the previously selected points.
///
/// The normalized dot product of the two difference vectors must stay below
/// 0.996 in magnitude. Coincident points are rejected as well.
pub fn check_subset_3d(sample: &[[f64; 3]]) -> bool {
    let Some((last, previous)) = sample.split_last() else {
        return true;
    };

    for (j, pj) in previous.iter().enumerate() {
        let d1 = sub3(pj, last);
        let n1 = norm3(&d1);
        for pk in &previous[..j] {
            let d2 = sub3(pk, last);
            let n = norm3(&d2) * n1;
            if n <= f64::MIN_POSITIVE {
                return false;
            }
            if (dot3(&d1, &d2) / n).abs() > MAX_COLLINEAR_COSINE_3D {
                return false;
            }
        }
    }

    true
}

fn sub3(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot3(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn norm3(a: &[f64; 3]) -> f64 {
    dot3(a, a).sqrt()
}
