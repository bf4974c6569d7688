use kornia_robust::RobustError;

/// Errors returned by the affine estimation entry points.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AffineError {
    /// Not enough correspondences to fit a single model.
    #[error("Need at least {required} correspondences, got {actual}")]
    InsufficientCorrespondences {
        /// Minimum number of correspondences for the model.
        required: usize,
        /// Actual number of correspondences provided.
        actual: usize,
    },
    /// The robust estimator rejected its inputs.
    #[error("Robust estimation error: {0}")]
    Robust(#[from] RobustError),
    /// The robust estimator did not find a model supported by the data.
    #[error("Robust estimation failed to find a valid model")]
    NotFound,
}
