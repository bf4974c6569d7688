use crate::kernel::ModelKernel;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Pseudo-random index generator owned by a single estimator.
#[derive(Clone, Debug)]
pub struct RandomSampler {
    rng: StdRng,
}

impl RandomSampler {
    /// Creates a sampler with a fixed seed for reproducible runs.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a sampler seeded from the thread-local generator.
    pub fn from_entropy() -> Self {
        let mut tr = rand::rng();
        Self {
            rng: StdRng::from_rng(&mut tr),
        }
    }

    /// Restarts the generator from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Draws an index uniformly from `[0, n)`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero.
    pub fn next_index(&mut self, n: usize) -> usize {
        self.rng.random_range(0..n)
    }

    /// Draws a minimal sample of distinct correspondences into `sample`.
    ///
    /// With `check_partial_subsets` every prefix of the sample is validated by
    /// the kernel as soon as a point is accepted and a rejected point is
    /// redrawn. Otherwise the complete sample is validated once and drawn again
    /// from scratch when it is degenerate.
    ///
    /// `max_attempts` bounds the consecutive failed draws for one slot and the
    /// number of full restarts. Returns `false` when no valid sample was found
    /// within that bound, in which case `sample` is left empty.
    pub fn draw_subset<K: ModelKernel>(
        &mut self,
        kernel: &K,
        source: &[K::Point],
        target: &[K::Point],
        sample: &mut MinimalSample<K::Point>,
        max_attempts: usize,
        check_partial_subsets: bool,
    ) -> bool {
        let m = kernel.model_points();
        let count = source.len().min(target.len());
        sample.clear();
        if m == 0 || count < m {
            return false;
        }

        let mut restarts = 0;
        loop {
            sample.clear();
            let mut attempts = 0;
            while sample.len() < m && attempts < max_attempts {
                attempts += 1;
                let idx = self.next_index(count);
                if sample.indices.contains(&idx) {
                    continue;
                }
                sample.push(idx, source[idx], target[idx]);
                if check_partial_subsets
                    && !(kernel.check_subset(&sample.source) && kernel.check_subset(&sample.target))
                {
                    sample.pop();
                    continue;
                }
                attempts = 0;
            }

            if sample.len() < m {
                sample.clear();
                return false;
            }

            if !check_partial_subsets && !sample.is_valid(kernel) {
                restarts += 1;
                if restarts >= max_attempts {
                    sample.clear();
                    return false;
                }
                continue;
            }

            return true;
        }
    }
}

/// Reusable buffer holding one minimal sample: the drawn indices and the
/// gathered source and target points.
#[derive(Clone, Debug)]
pub struct MinimalSample<P> {
    indices: Vec<usize>,
    source: Vec<P>,
    target: Vec<P>,
}

impl<P: Copy> MinimalSample<P> {
    /// Creates an empty sample able to hold `capacity` correspondences without reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: Vec::with_capacity(capacity),
            source: Vec::with_capacity(capacity),
            target: Vec::with_capacity(capacity),
        }
    }

    /// Indices of the sampled correspondences, in draw order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Sampled source points.
    pub fn source(&self) -> &[P] {
        &self.source
    }

    /// Sampled target points.
    pub fn target(&self) -> &[P] {
        &self.target
    }

    /// Number of correspondences currently in the sample.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the sample is empty.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    fn clear(&mut self) {
        self.indices.clear();
        self.source.clear();
        self.target.clear();
    }

    fn push(&mut self, idx: usize, source: P, target: P) {
        self.indices.push(idx);
        self.source.push(source);
        self.target.push(target);
    }

    fn pop(&mut self) {
        self.indices.pop();
        self.source.pop();
        self.target.pop();
    }

    fn is_valid<K: ModelKernel<Point = P>>(&self, kernel: &K) -> bool {
        is_valid_subset(kernel, &self.source, &self.target)
    }
}

/// Validates every prefix of both sides of a sample with the kernel predicate.
pub(crate) fn is_valid_subset<K: ModelKernel>(
    kernel: &K,
    source: &[K::Point],
    target: &[K::Point],
) -> bool {
    (1..=source.len().min(target.len()))
        .all(|k| kernel.check_subset(&source[..k]) && kernel.check_subset(&target[..k]))
}
