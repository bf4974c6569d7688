use crate::budget::iterations_needed;
use crate::error::{ensure_same_len, RobustError};
use crate::kernel::ModelKernel;
use crate::model::ModelMatrix;
use crate::params::{EstimatorConfig, LmedsParams, RansacParams, RobustMethod};
use crate::sampler::{is_valid_subset, MinimalSample, RandomSampler};
use crate::scoring::{find_inliers, median};
use log::{debug, trace, warn};

/// Outlier ratio assumed when sizing the LMedS iteration budget.
const LMEDS_OUTLIER_RATIO: f64 = 0.45;

/// Smallest noise scale used to threshold the final LMedS residuals.
const LMEDS_MIN_SIGMA: f64 = f32::EPSILON as f64 * 100.0;

/// Outcome of one robust estimation run.
#[derive(Clone, Debug, PartialEq)]
pub struct EstimateSummary {
    /// Whether a model was found. The output model and mask are only written
    /// when this is `true`.
    pub success: bool,
    /// Number of trials that produced a minimal sample.
    pub trials: usize,
    /// Number of inliers of the best model.
    pub inlier_count: usize,
    /// Smallest median residual seen, for LMedS runs that fitted a model.
    pub min_median: Option<f64>,
}

impl EstimateSummary {
    fn failure(trials: usize) -> Self {
        Self {
            success: false,
            trials,
            inlier_count: 0,
            min_median: None,
        }
    }
}

/// Per-run scratch space, sized once and reused by every trial.
struct RunBuffers<P> {
    sample: MinimalSample<P>,
    models: Vec<ModelMatrix>,
    errors: Vec<f64>,
    mask: Vec<bool>,
}

impl<P: Copy> RunBuffers<P> {
    fn new(count: usize, model_points: usize, max_solutions: usize) -> Self {
        Self {
            sample: MinimalSample::with_capacity(model_points),
            models: Vec::with_capacity(max_solutions),
            errors: vec![0.0; count],
            mask: vec![false; count],
        }
    }
}

/// Generic robust estimator driving a [`ModelKernel`].
///
/// The estimator draws random minimal samples, lets the kernel fit candidate
/// models and scores every candidate against the whole correspondence set.
/// Each instance owns its random generator, so concurrent runs need separate
/// estimators.
pub struct Estimator<K: ModelKernel> {
    kernel: K,
    sampler: RandomSampler,
    check_partial_subsets: bool,
    max_sample_attempts: usize,
}

impl<K: ModelKernel> Estimator<K> {
    /// Creates an estimator with the default configuration and a random seed.
    pub fn new(kernel: K) -> Self {
        Self::with_config(kernel, &EstimatorConfig::default())
    }

    /// Creates an estimator from an explicit configuration.
    pub fn with_config(kernel: K, config: &EstimatorConfig) -> Self {
        let sampler = match config.random_seed {
            Some(seed) => RandomSampler::from_seed(seed),
            None => RandomSampler::from_entropy(),
        };
        Self {
            kernel,
            sampler,
            check_partial_subsets: config.check_partial_subsets,
            max_sample_attempts: config.max_sample_attempts,
        }
    }

    /// Reseeds the random generator.
    pub fn set_seed(&mut self, seed: u64) {
        self.sampler.reseed(seed);
    }

    /// Chooses between validating sample prefixes while drawing and validating
    /// only complete samples.
    pub fn set_check_partial_subsets(&mut self, enabled: bool) {
        self.check_partial_subsets = enabled;
    }

    /// The model kernel.
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Runs the estimation strategy selected by `method`.
    pub fn run(
        &mut self,
        source: &[K::Point],
        target: &[K::Point],
        model: &mut ModelMatrix,
        mask: &mut [bool],
        method: &RobustMethod,
    ) -> Result<EstimateSummary, RobustError> {
        match method {
            RobustMethod::Ransac(params) => self.run_ransac(source, target, model, mask, params),
            RobustMethod::Lmeds(params) => self.run_lmeds(source, target, model, mask, params),
        }
    }

    /// Estimates a model with random sample consensus.
    ///
    /// The model with the largest number of correspondences within
    /// `params.reproj_threshold` wins. The iteration budget shrinks every time
    /// a better model is found, according to the observed outlier ratio.
    ///
    /// * `source` - The source points with shape (N,).
    /// * `target` - The target points with shape (N,).
    /// * `model` - The output model, with the shape declared by the kernel.
    /// * `mask` - The output inlier mask with shape (N,).
    /// * `params` - The RANSAC parameters.
    ///
    /// # Returns
    ///
    /// A summary of the run. `model` and `mask` are only written on success.
    ///
    /// # Errors
    ///
    /// Returns an error if the inputs have inconsistent lengths or shapes, or
    /// if the parameters are out of range.
    pub fn run_ransac(
        &mut self,
        source: &[K::Point],
        target: &[K::Point],
        model: &mut ModelMatrix,
        mask: &mut [bool],
        params: &RansacParams,
    ) -> Result<EstimateSummary, RobustError> {
        params.validate()?;
        self.check_inputs(source, target, model, mask)?;

        let count = source.len();
        let model_points = self.kernel.model_points();
        if count < model_points {
            debug!("RANSAC: {count} correspondences, need at least {model_points}");
            return Ok(EstimateSummary::failure(0));
        }

        let whole_set = count == model_points;
        let mut niters = if whole_set { 1 } else { params.max_iterations };
        debug!(
            "RANSAC: {count} correspondences, {model_points}-point samples, up to {niters} iterations"
        );

        let mut buffers = RunBuffers::new(count, model_points, self.kernel.max_solutions());
        let mut best_mask = vec![false; count];
        let mut best_model: Option<ModelMatrix> = None;
        let mut max_good_count = 0;
        let mut trials = 0;

        while trials < niters {
            if !self.sample_and_fit(
                source,
                target,
                whole_set,
                &mut buffers.sample,
                &mut buffers.models,
            ) {
                if trials == 0 {
                    debug!("RANSAC: no valid minimal sample could be drawn");
                    return Ok(EstimateSummary::failure(0));
                }
                debug!("RANSAC: sampling exhausted after {trials} trials");
                break;
            }
            trials += 1;

            for candidate in buffers.models.iter() {
                let good_count = find_inliers(
                    &self.kernel,
                    source,
                    target,
                    candidate,
                    &mut buffers.errors,
                    &mut buffers.mask,
                    params.reproj_threshold,
                );

                if good_count > max_good_count.max(model_points - 1) {
                    std::mem::swap(&mut buffers.mask, &mut best_mask);
                    match best_model.as_mut() {
                        Some(best) => best.copy_from(candidate),
                        None => best_model = Some(candidate.clone()),
                    }
                    max_good_count = good_count;
                    niters = iterations_needed(
                        params.confidence,
                        (count - good_count) as f64 / count as f64,
                        model_points,
                        niters,
                    )?;
                    trace!(
                        "RANSAC: trial {trials}: {good_count}/{count} inliers, budget {niters}"
                    );
                }
            }
        }

        let Some(best) = best_model else {
            debug!("RANSAC: no model found in {trials} trials");
            return Ok(EstimateSummary::failure(trials));
        };

        mask.copy_from_slice(&best_mask);
        model.copy_from(&best);
        debug!("RANSAC: {max_good_count}/{count} inliers after {trials} trials");

        Ok(EstimateSummary {
            success: true,
            trials,
            inlier_count: max_good_count,
            min_median: None,
        })
    }

    /// Estimates a model with least median of squares.
    ///
    /// The model with the smallest median residual wins. The inlier threshold
    /// is then derived from a robust estimate of the noise scale, so no
    /// threshold needs to be supplied. This works as long as less than half
    /// of the correspondences are outliers.
    ///
    /// * `source` - The source points with shape (N,).
    /// * `target` - The target points with shape (N,).
    /// * `model` - The output model, with the shape declared by the kernel.
    /// * `mask` - The output inlier mask with shape (N,).
    /// * `params` - The LMedS parameters.
    ///
    /// # Returns
    ///
    /// A summary of the run. `model` and `mask` are only written on success.
    ///
    /// # Errors
    ///
    /// Returns an error if the inputs have inconsistent lengths or shapes, or
    /// if the parameters are out of range.
    pub fn run_lmeds(
        &mut self,
        source: &[K::Point],
        target: &[K::Point],
        model: &mut ModelMatrix,
        mask: &mut [bool],
        params: &LmedsParams,
    ) -> Result<EstimateSummary, RobustError> {
        params.validate()?;
        self.check_inputs(source, target, model, mask)?;

        let count = source.len();
        let model_points = self.kernel.model_points();
        if count < model_points {
            debug!("LMedS: {count} correspondences, need at least {model_points}");
            return Ok(EstimateSummary::failure(0));
        }

        let whole_set = count == model_points;
        let niters = if whole_set {
            1
        } else {
            iterations_needed(
                params.confidence,
                LMEDS_OUTLIER_RATIO,
                model_points,
                params.max_iterations,
            )?
            .max(3)
            .min(params.max_iterations)
        };
        debug!(
            "LMedS: {count} correspondences, {model_points}-point samples, {niters} iterations"
        );

        let mut buffers = RunBuffers::new(count, model_points, self.kernel.max_solutions());
        let mut best_model: Option<ModelMatrix> = None;
        let mut min_median = f64::MAX;
        let mut trials = 0;

        while trials < niters {
            if !self.sample_and_fit(
                source,
                target,
                whole_set,
                &mut buffers.sample,
                &mut buffers.models,
            ) {
                if trials == 0 {
                    debug!("LMedS: no valid minimal sample could be drawn");
                    return Ok(EstimateSummary::failure(0));
                }
                debug!("LMedS: sampling exhausted after {trials} trials");
                break;
            }
            trials += 1;

            for candidate in buffers.models.iter() {
                self.kernel
                    .reprojection_error(source, target, candidate, &mut buffers.errors);
                let Some(med) = median(&mut buffers.errors) else {
                    continue;
                };

                if med < min_median {
                    min_median = med;
                    match best_model.as_mut() {
                        Some(best) => best.copy_from(candidate),
                        None => best_model = Some(candidate.clone()),
                    }
                    trace!("LMedS: trial {trials}: median residual {med}");
                }
            }
        }

        let Some(best) = best_model else {
            debug!("LMedS: no model found in {trials} trials");
            return Ok(EstimateSummary::failure(trials));
        };

        // robust standard deviation with a small-sample correction
        let dof = (count - model_points).max(1) as f64;
        let sigma = (2.5 * 1.4826 * (1.0 + 5.0 / dof) * min_median.sqrt()).max(LMEDS_MIN_SIGMA);

        let good_count = find_inliers(
            &self.kernel,
            source,
            target,
            &best,
            &mut buffers.errors,
            &mut buffers.mask,
            sigma,
        );

        let mut summary = EstimateSummary {
            success: false,
            trials,
            inlier_count: good_count,
            min_median: Some(min_median),
        };

        if good_count < model_points {
            debug!("LMedS: only {good_count} inliers within sigma {sigma}");
            return Ok(summary);
        }

        mask.copy_from_slice(&buffers.mask);
        model.copy_from(&best);
        summary.success = true;
        debug!("LMedS: {good_count}/{count} inliers within sigma {sigma} after {trials} trials");

        Ok(summary)
    }

    fn check_inputs(
        &self,
        source: &[K::Point],
        target: &[K::Point],
        model: &ModelMatrix,
        mask: &[bool],
    ) -> Result<(), RobustError> {
        let model_points = self.kernel.model_points();
        if model_points == 0 {
            return Err(RobustError::InvalidSampleSize(model_points));
        }
        if self.kernel.max_solutions() == 0 {
            return Err(RobustError::InvalidMaxSolutions);
        }
        if self.max_sample_attempts == 0 {
            return Err(RobustError::InvalidSampleAttempts);
        }
        ensure_same_len("source", source.len(), "target", target.len())?;
        ensure_same_len("source", source.len(), "mask", mask.len())?;

        let expected = self.kernel.model_shape();
        if model.shape() != expected {
            return Err(RobustError::ModelShapeMismatch {
                expected,
                actual: model.shape(),
            });
        }
        Ok(())
    }

    /// Draws the sample of one trial and fits its candidate models.
    ///
    /// Returns `false` when no valid sample could be found. When `whole_set`
    /// is set the full correspondence set is the only possible sample.
    /// Candidates of the wrong shape or with non-finite parameters are dropped.
    fn sample_and_fit(
        &mut self,
        source: &[K::Point],
        target: &[K::Point],
        whole_set: bool,
        sample: &mut MinimalSample<K::Point>,
        models: &mut Vec<ModelMatrix>,
    ) -> bool {
        models.clear();
        if whole_set {
            if !is_valid_subset(&self.kernel, source, target) {
                return false;
            }
            self.kernel.fit(source, target, models);
        } else {
            if !self.sampler.draw_subset(
                &self.kernel,
                source,
                target,
                sample,
                self.max_sample_attempts,
                self.check_partial_subsets,
            ) {
                return false;
            }
            self.kernel.fit(sample.source(), sample.target(), models);
        }

        let max_solutions = self.kernel.max_solutions();
        if models.len() > max_solutions {
            warn!(
                "kernel produced {} models, more than the declared {max_solutions}",
                models.len()
            );
            models.truncate(max_solutions);
        }

        let shape = self.kernel.model_shape();
        models.retain(|m| {
            if m.shape() != shape {
                warn!("discarding model of shape {:?}, expected {shape:?}", m.shape());
                return false;
            }
            if !m.is_finite() {
                debug!("discarding model with non-finite parameters");
                return false;
            }
            true
        });

        true
    }
}
