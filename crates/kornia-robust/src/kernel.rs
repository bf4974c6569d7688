use crate::model::ModelMatrix;

/// Capability set of a model plug-in.
///
/// A kernel owns the model-specific mathematics: how many correspondences a
/// minimal sample needs, how to fit candidate models from such a sample and
/// how to measure the residual of every correspondence under a model. The
/// [`Estimator`](crate::Estimator) owns everything else.
pub trait ModelKernel {
    /// The point type of both sides of a correspondence, e.g. `[f64; 2]`.
    type Point: Copy;

    /// Number of correspondences in a minimal sample.
    fn model_points(&self) -> usize;

    /// Shape of one candidate model as (rows, cols).
    fn model_shape(&self) -> (usize, usize);

    /// Maximum number of candidate models a single minimal sample may produce.
    fn max_solutions(&self) -> usize;

    /// Fits candidate models from a sample and pushes them into `models`.
    ///
    /// `source` and `target` hold the sampled correspondences. Pushing nothing
    /// means the sample could not be fitted and the trial is skipped.
    fn fit(&self, source: &[Self::Point], target: &[Self::Point], models: &mut Vec<ModelMatrix>);

    /// Writes the squared residual of every correspondence under `model`.
    ///
    /// `errors` has the same length as `source` and `target`. The result must
    /// be deterministic and non-negative.
    fn reprojection_error(
        &self,
        source: &[Self::Point],
        target: &[Self::Point],
        model: &ModelMatrix,
        errors: &mut [f64],
    );

    /// Decides whether the last point of `sample` is in general position with
    /// respect to the previous ones.
    ///
    /// Called with growing prefixes of a sample, so it should only check the
    /// newest point. Kernels without degenerate configurations keep the default.
    fn check_subset(&self, sample: &[Self::Point]) -> bool {
        let _ = sample;
        true
    }
}
