#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! Concrete [`ModelKernel`](kornia_robust::ModelKernel) implementations and
//! convenience entry points built on top of the `kornia-robust` estimators.
//!
//! - [`Affine2dKernel`] — 2D affine transform (6 DOF) from 3 correspondences
//! - [`Affine3dKernel`] — 3D affine transform (12 DOF) from 4 correspondences
//!
//! ## Example
//!
//! ```rust
//! use kornia_robust::{EstimatorConfig, RansacParams, RobustMethod};
//! use kornia_robust_models::estimate_affine_2d;
//!
//! let source = vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0], [2.0, 3.0], [5.0, 5.0]];
//! let mut target: Vec<[f64; 2]> = source.iter().map(|p| [2.0 * p[0] + 1.0, p[1] - 4.0]).collect();
//! target[5] = [100.0, -100.0];
//!
//! let config = EstimatorConfig {
//!     random_seed: Some(0),
//!     ..Default::default()
//! };
//! let res = estimate_affine_2d(&source, &target, &RobustMethod::Ransac(RansacParams::default()), &config)?;
//!
//! assert_eq!(res.inlier_count, 5);
//! assert!(!res.inliers[5]);
//! # Ok::<(), kornia_robust_models::AffineError>(())
//! ```

mod affine2d;
pub use affine2d::*;

mod affine3d;
pub use affine3d::*;

mod error;
pub use error::*;

mod estimate;
pub use estimate::*;
