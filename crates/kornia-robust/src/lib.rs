#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Kornia Robust
//!
//! Generic robust estimation of model parameters from point correspondences
//! contaminated by outliers.
//!
//! The crate separates the robust control flow from the model mathematics:
//! a [`ModelKernel`] knows how to fit a model from a minimal sample and how to
//! measure residuals, while the [`Estimator`] draws random minimal samples,
//! scores the candidates and keeps the best one.
//!
//! ## Example: RANSAC with a custom kernel
//!
//! ```rust
//! use kornia_robust::{Estimator, ModelKernel, ModelMatrix, RansacParams};
//!
//! /// Pure 2D translation, fitted from a single correspondence.
//! struct Translation;
//!
//! impl ModelKernel for Translation {
//!     type Point = [f64; 2];
//!
//!     fn model_points(&self) -> usize {
//!         1
//!     }
//!
//!     fn model_shape(&self) -> (usize, usize) {
//!         (1, 2)
//!     }
//!
//!     fn max_solutions(&self) -> usize {
//!         1
//!     }
//!
//!     fn fit(&self, source: &[[f64; 2]], target: &[[f64; 2]], models: &mut Vec<ModelMatrix>) {
//!         let t = [target[0][0] - source[0][0], target[0][1] - source[0][1]];
//!         models.push(ModelMatrix::from_rows(&[t]));
//!     }
//!
//!     fn reprojection_error(
//!         &self,
//!         source: &[[f64; 2]],
//!         target: &[[f64; 2]],
//!         model: &ModelMatrix,
//!         errors: &mut [f64],
//!     ) {
//!         let (tx, ty) = (model.get(0, 0), model.get(0, 1));
//!         for ((s, t), e) in source.iter().zip(target).zip(errors.iter_mut()) {
//!             let dx = s[0] + tx - t[0];
//!             let dy = s[1] + ty - t[1];
//!             *e = dx * dx + dy * dy;
//!         }
//!     }
//! }
//!
//! let source = vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [5.0, 5.0]];
//! let target = vec![[2.0, 1.0], [3.0, 1.0], [2.0, 2.0], [-4.0, 9.0]];
//!
//! let mut estimator = Estimator::new(Translation);
//! estimator.set_seed(42);
//!
//! let mut model = ModelMatrix::zeros(1, 2);
//! let mut mask = vec![false; source.len()];
//! let summary = estimator.run_ransac(&source, &target, &mut model, &mut mask, &RansacParams::default())?;
//!
//! assert!(summary.success);
//! assert_eq!(mask, vec![true, true, true, false]);
//! # Ok::<(), kornia_robust::RobustError>(())
//! ```

/// Iteration budget statistics for adaptive stopping.
pub mod budget;

/// Stock degeneracy predicates for minimal samples.
pub mod degeneracy;

/// Error types for the robust estimators.
pub mod error;

/// RANSAC and LMedS drivers.
pub mod estimator;

/// The capability contract of a model plug-in.
pub mod kernel;

/// Model parameter storage.
pub mod model;

/// Estimator parameters and configuration.
pub mod params;

/// Random minimal sample generation.
pub mod sampler;

/// Inlier scoring and residual statistics.
pub mod scoring;

pub use budget::iterations_needed;
pub use degeneracy::{check_subset_2d, check_subset_3d};
pub use error::RobustError;
pub use estimator::{EstimateSummary, Estimator};
pub use kernel::ModelKernel;
pub use model::ModelMatrix;
pub use params::{EstimatorConfig, LmedsParams, RansacParams, RobustMethod};
pub use sampler::{MinimalSample, RandomSampler};
pub use scoring::{find_inliers, median};
