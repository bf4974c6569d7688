use crate::error::RobustError;
use serde::{Deserialize, Serialize};

/// Parameters for the RANSAC estimator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RansacParams {
    /// Maximum geometric distance for a correspondence to count as an inlier.
    pub reproj_threshold: f64,
    /// Desired probability that at least one sample set is outlier-free.
    pub confidence: f64,
    /// Maximum number of RANSAC iterations.
    pub max_iterations: usize,
}

impl Default for RansacParams {
    fn default() -> Self {
        Self {
            reproj_threshold: 3.0,
            confidence: 0.99,
            max_iterations: 2000,
        }
    }
}

impl RansacParams {
    pub(crate) fn validate(&self) -> Result<(), RobustError> {
        if !(self.reproj_threshold.is_finite() && self.reproj_threshold > 0.0) {
            return Err(RobustError::InvalidThreshold(self.reproj_threshold));
        }
        validate_confidence(self.confidence)?;
        validate_max_iterations(self.max_iterations)
    }
}

/// Parameters for the least-median-of-squares estimator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LmedsParams {
    /// Desired probability that at least one sample set is outlier-free.
    pub confidence: f64,
    /// Maximum number of LMedS iterations.
    pub max_iterations: usize,
}

impl Default for LmedsParams {
    fn default() -> Self {
        Self {
            confidence: 0.99,
            max_iterations: 2000,
        }
    }
}

impl LmedsParams {
    pub(crate) fn validate(&self) -> Result<(), RobustError> {
        validate_confidence(self.confidence)?;
        validate_max_iterations(self.max_iterations)
    }
}

/// The robust strategy used to estimate a model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum RobustMethod {
    /// Random sample consensus: keep the model with the most inliers.
    Ransac(RansacParams),
    /// Least median of squares: keep the model with the smallest median residual.
    Lmeds(LmedsParams),
}

impl Default for RobustMethod {
    fn default() -> Self {
        RobustMethod::Ransac(RansacParams::default())
    }
}

/// Sampling configuration of an [`Estimator`](crate::Estimator).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Validate every prefix of a sample while drawing it instead of only the
    /// complete sample.
    pub check_partial_subsets: bool,
    /// Maximum consecutive failed draws before giving up on a sample.
    pub max_sample_attempts: usize,
    /// Optional fixed seed for reproducible sampling.
    pub random_seed: Option<u64>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            check_partial_subsets: true,
            max_sample_attempts: 300,
            random_seed: None,
        }
    }
}

fn validate_confidence(confidence: f64) -> Result<(), RobustError> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(RobustError::InvalidConfidence(confidence));
    }
    Ok(())
}

fn validate_max_iterations(max_iterations: usize) -> Result<(), RobustError> {
    if max_iterations == 0 {
        return Err(RobustError::InvalidMaxIterations);
    }
    Ok(())
}
