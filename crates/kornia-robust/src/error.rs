use thiserror::Error;

/// Errors raised by the robust estimators when their inputs are malformed.
///
/// These are precondition violations and are reported before any sampling
/// begins. Failing to find a model is not an error, see
/// [`EstimateSummary::success`](crate::EstimateSummary::success).
#[derive(Debug, Error, PartialEq)]
pub enum RobustError {
    /// Two slices that must describe the same correspondences differ in length.
    #[error("Mismatched array lengths: {left_name} ({left_len}) != {right_name} ({right_len})")]
    MismatchedArrayLengths {
        /// Label for the left-hand slice.
        left_name: &'static str,
        /// Length of the left-hand slice.
        left_len: usize,
        /// Label for the right-hand slice.
        right_name: &'static str,
        /// Length of the right-hand slice.
        right_len: usize,
    },

    /// The output model does not have the shape declared by the kernel.
    #[error("Model shape mismatch: expected {expected:?}, got {actual:?}")]
    ModelShapeMismatch {
        /// Shape declared by the kernel as (rows, cols).
        expected: (usize, usize),
        /// Shape of the provided output model as (rows, cols).
        actual: (usize, usize),
    },

    /// The minimal sample size is zero.
    #[error("The number of model points should be positive, got {0}")]
    InvalidSampleSize(usize),

    /// The kernel declares that a sample yields no model at all.
    #[error("The maximum number of solutions per sample should be positive")]
    InvalidMaxSolutions,

    /// The bound on failed sample draws is zero, so no sample can ever be drawn.
    #[error("The maximum number of sample attempts should be positive")]
    InvalidSampleAttempts,

    /// The reprojection threshold is not a positive finite number.
    #[error("The reprojection threshold should be positive, got {0}")]
    InvalidThreshold(f64),

    /// The confidence is not in the open interval (0, 1).
    #[error("The confidence should be in (0, 1), got {0}")]
    InvalidConfidence(f64),

    /// The maximum number of iterations is zero.
    #[error("The maximum number of iterations should be positive")]
    InvalidMaxIterations,
}

/// Checks that two slices have the same length.
pub(crate) fn ensure_same_len(
    left_name: &'static str,
    left_len: usize,
    right_name: &'static str,
    right_len: usize,
) -> Result<(), RobustError> {
    if left_len != right_len {
        return Err(RobustError::MismatchedArrayLengths {
            left_name,
            left_len,
            right_name,
            right_len,
        });
    }
    Ok(())
}
