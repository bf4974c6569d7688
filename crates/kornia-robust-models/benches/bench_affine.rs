use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use kornia_robust::{EstimatorConfig, LmedsParams, RansacParams, RobustMethod};
use kornia_robust_models::{estimate_affine_2d, fit_affine_2d, transform_point_2d};
use rand::{rngs::StdRng, Rng, SeedableRng};

const AFFINE: [[f64; 3]; 2] = [[0.8, -0.4, 12.0], [0.3, 1.1, -5.0]];

/// Generate affine correspondences where 30% of the points are outliers.
fn generate_affine_data(n: usize) -> (Vec<[f64; 2]>, Vec<[f64; 2]>) {
    let mut rng = StdRng::seed_from_u64(0);
    let n_outliers = n * 3 / 10;
    let mut x1 = Vec::with_capacity(n);
    let mut x2 = Vec::with_capacity(n);
    for i in 0..n {
        let p = [rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)];
        let q = if i < n - n_outliers {
            transform_point_2d(&AFFINE, &p)
        } else {
            [rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)]
        };
        x1.push(p);
        x2.push(q);
    }
    (x1, x2)
}

fn bench_fit_affine_2d(c: &mut Criterion) {
    let (x1, x2) = generate_affine_data(3);
    c.bench_function("fit_affine_2d", |b| {
        b.iter(|| std::hint::black_box(fit_affine_2d(&x1, &x2)));
    });
}

fn bench_estimate_affine_2d(c: &mut Criterion) {
    let config = EstimatorConfig {
        random_seed: Some(0),
        ..Default::default()
    };
    let methods = [
        (
            "ransac",
            RobustMethod::Ransac(RansacParams {
                reproj_threshold: 0.5,
                ..Default::default()
            }),
        ),
        ("lmeds", RobustMethod::Lmeds(LmedsParams::default())),
    ];

    for (name, method) in methods {
        let mut group = c.benchmark_group(format!("estimate_affine_2d_{name}"));
        for &n in &[50, 200, 1000] {
            let (x1, x2) = generate_affine_data(n);
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
                b.iter(|| {
                    let _ = std::hint::black_box(estimate_affine_2d(&x1, &x2, &method, &config));
                });
            });
        }
        group.finish();
    }
}

criterion_group!(benches, bench_fit_affine_2d, bench_estimate_affine_2d);
criterion_main!(benches);
