use approx::assert_relative_eq;
use kornia_robust::{
    Estimator, EstimatorConfig, LmedsParams, ModelMatrix, RansacParams, RobustMethod,
};
use kornia_robust_models::{
    estimate_affine_2d, estimate_affine_3d, transform_point_2d, transform_point_3d,
    Affine2dKernel, AffineError,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

const AFFINE_2D: [[f64; 3]; 2] = [[0.8, -0.4, 12.0], [0.3, 1.1, -5.0]];

const AFFINE_3D: [[f64; 4]; 3] = [
    [0.9, -0.2, 0.1, 1.0],
    [0.3, 1.1, 0.0, -2.0],
    [-0.1, 0.2, 0.7, 0.5],
];

/// `n_inliers` exact correspondences under [`AFFINE_2D`] followed by
/// `n_outliers` uniformly random ones, optionally perturbing the inliers.
fn affine_2d_data(
    n_inliers: usize,
    n_outliers: usize,
    noise: f64,
    seed: u64,
) -> (Vec<[f64; 2]>, Vec<[f64; 2]>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut source = Vec::with_capacity(n_inliers + n_outliers);
    let mut target = Vec::with_capacity(n_inliers + n_outliers);

    for _ in 0..n_inliers {
        let s = [rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)];
        let mut t = transform_point_2d(&AFFINE_2D, &s);
        if noise > 0.0 {
            t[0] += rng.random_range(-noise..noise);
            t[1] += rng.random_range(-noise..noise);
        }
        source.push(s);
        target.push(t);
    }
    for _ in 0..n_outliers {
        source.push([rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)]);
        target.push([rng.random_range(-50.0..150.0), rng.random_range(-50.0..150.0)]);
    }

    (source, target)
}

fn mask_accuracy(mask: &[bool], n_inliers: usize) -> f64 {
    let correct = mask
        .iter()
        .enumerate()
        .filter(|&(i, &m)| m == (i < n_inliers))
        .count();
    correct as f64 / mask.len() as f64
}

fn seeded(seed: u64) -> EstimatorConfig {
    EstimatorConfig {
        random_seed: Some(seed),
        ..Default::default()
    }
}

#[test]
fn ransac_recovers_affine_2d_with_outliers() -> Result<(), AffineError> {
    let (source, target) = affine_2d_data(100, 60, 0.0, 7);
    let method = RobustMethod::Ransac(RansacParams {
        reproj_threshold: 0.5,
        confidence: 0.99,
        max_iterations: 2000,
    });

    let res = estimate_affine_2d(&source, &target, &method, &seeded(1))?;

    assert!(res.inlier_count >= 100 && res.inlier_count <= 103);
    assert_eq!(res.inliers.iter().filter(|&&m| m).count(), res.inlier_count);
    assert!(mask_accuracy(&res.inliers, 100) >= 0.95);
    for i in 0..2 {
        for j in 0..3 {
            assert_relative_eq!(res.model[i][j], AFFINE_2D[i][j], epsilon = 1e-6);
        }
    }
    Ok(())
}

#[test]
fn ransac_full_sample_validation_recovers_affine_2d() -> Result<(), AffineError> {
    let (source, target) = affine_2d_data(100, 60, 0.0, 11);
    let config = EstimatorConfig {
        check_partial_subsets: false,
        random_seed: Some(2),
        ..Default::default()
    };
    let method = RobustMethod::Ransac(RansacParams {
        reproj_threshold: 0.5,
        ..Default::default()
    });

    let res = estimate_affine_2d(&source, &target, &method, &config)?;
    assert!(res.inlier_count >= 100 && res.inlier_count <= 103);
    assert!(mask_accuracy(&res.inliers, 100) >= 0.95);
    Ok(())
}

#[test]
fn ransac_tolerates_noisy_inliers() -> Result<(), AffineError> {
    let (source, target) = affine_2d_data(100, 60, 0.1, 3);
    let method = RobustMethod::Ransac(RansacParams {
        reproj_threshold: 2.0,
        ..Default::default()
    });

    let res = estimate_affine_2d(&source, &target, &method, &seeded(5))?;
    assert!(res.inlier_count >= 95);
    assert!(mask_accuracy(&res.inliers, 100) >= 0.95);
    for i in 0..2 {
        for j in 0..3 {
            assert_relative_eq!(res.model[i][j], AFFINE_2D[i][j], epsilon = 1.0);
        }
    }
    Ok(())
}

#[test]
fn lmeds_recovers_affine_2d_with_outliers() -> Result<(), AffineError> {
    let (source, target) = affine_2d_data(100, 60, 0.0, 7);
    let method = RobustMethod::Lmeds(LmedsParams {
        confidence: 0.999,
        max_iterations: 2000,
    });

    let res = estimate_affine_2d(&source, &target, &method, &seeded(1))?;

    assert!(res.inlier_count >= 100 && res.inlier_count <= 103);
    assert!(mask_accuracy(&res.inliers, 100) >= 0.95);
    for i in 0..2 {
        for j in 0..3 {
            assert_relative_eq!(res.model[i][j], AFFINE_2D[i][j], epsilon = 1e-6);
        }
    }
    Ok(())
}

#[test]
fn ransac_recovers_affine_3d_with_outliers() -> Result<(), AffineError> {
    let mut rng = StdRng::seed_from_u64(21);
    let mut source = Vec::new();
    let mut target = Vec::new();
    for _ in 0..50 {
        let s = [
            rng.random_range(-10.0..10.0),
            rng.random_range(-10.0..10.0),
            rng.random_range(-10.0..10.0),
        ];
        target.push(transform_point_3d(&AFFINE_3D, &s));
        source.push(s);
    }
    for _ in 0..20 {
        source.push([
            rng.random_range(-10.0..10.0),
            rng.random_range(-10.0..10.0),
            rng.random_range(-10.0..10.0),
        ]);
        target.push([
            rng.random_range(-20.0..20.0),
            rng.random_range(-20.0..20.0),
            rng.random_range(-20.0..20.0),
        ]);
    }

    let method = RobustMethod::Ransac(RansacParams {
        reproj_threshold: 0.1,
        ..Default::default()
    });
    let res = estimate_affine_3d(&source, &target, &method, &seeded(4))?;

    assert!(res.inlier_count >= 50 && res.inlier_count <= 52);
    assert!(mask_accuracy(&res.inliers, 50) >= 0.95);
    for i in 0..3 {
        for j in 0..4 {
            assert_relative_eq!(res.model[i][j], AFFINE_3D[i][j], epsilon = 1e-6);
        }
    }
    Ok(())
}

#[test]
fn estimator_leaves_outputs_untouched_on_failure() -> Result<(), kornia_robust::RobustError> {
    // all source points collinear: no valid minimal sample exists
    let source: Vec<[f64; 2]> = (0..20).map(|i| [i as f64, 0.5 * i as f64]).collect();
    let target: Vec<[f64; 2]> = source.iter().map(|p| transform_point_2d(&AFFINE_2D, p)).collect();

    let mut est = Estimator::with_config(Affine2dKernel, &seeded(0));
    let mut model = ModelMatrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    let mut mask = vec![true; 20];

    let summary = est.run_ransac(&source, &target, &mut model, &mut mask, &RansacParams::default())?;
    assert!(!summary.success);
    let summary = est.run_lmeds(&source, &target, &mut model, &mut mask, &LmedsParams::default())?;
    assert!(!summary.success);

    assert_eq!(mask, vec![true; 20]);
    assert_eq!(model.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    Ok(())
}

#[test]
fn minimal_set_runs_single_trial() -> Result<(), kornia_robust::RobustError> {
    let source = [[0.0, 0.0], [4.0, 1.0], [1.0, 3.0]];
    let target: Vec<[f64; 2]> = source.iter().map(|p| transform_point_2d(&AFFINE_2D, p)).collect();

    let mut est = Estimator::with_config(Affine2dKernel, &seeded(0));
    let mut model = ModelMatrix::zeros(2, 3);
    let mut mask = vec![false; 3];

    let summary = est.run_ransac(&source, &target, &mut model, &mut mask, &RansacParams::default())?;
    assert!(summary.success);
    assert_eq!(summary.trials, 1);
    assert_eq!(mask, vec![true; 3]);

    let summary = est.run_lmeds(&source, &target, &mut model, &mut mask, &LmedsParams::default())?;
    assert!(summary.success);
    assert_eq!(summary.trials, 1);
    assert_relative_eq!(model.get(0, 2), AFFINE_2D[0][2], epsilon = 1e-9);
    Ok(())
}
