/// A dense row-major matrix holding the parameters of one candidate model.
///
/// The shape is fixed by the kernel that produced it, e.g. 2x3 for a 2D affine
/// transform or 3x4 for a 3D affine transform.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl ModelMatrix {
    /// Creates a zero-filled matrix with the given shape.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Creates a matrix from fixed-size rows.
    ///
    /// # Example
    ///
    /// ```rust
    /// use kornia_robust::ModelMatrix;
    ///
    /// let m = ModelMatrix::from_rows(&[[1.0, 0.0, 2.0], [0.0, 1.0, 3.0]]);
    /// assert_eq!(m.shape(), (2, 3));
    /// assert_eq!(m.get(1, 2), 3.0);
    /// ```
    pub fn from_rows<const C: usize>(rows: &[[f64; C]]) -> Self {
        Self {
            rows: rows.len(),
            cols: C,
            data: rows.iter().flatten().copied().collect(),
        }
    }

    /// The shape of the matrix as (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns the element at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows && col < self.cols);
        self.data[row * self.cols + col]
    }

    /// The parameters in row-major order.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Returns row `row` as a slice.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Overwrites this matrix with the contents of `other`, reusing the allocation.
    pub fn copy_from(&mut self, other: &ModelMatrix) {
        self.rows = other.rows;
        self.cols = other.cols;
        self.data.clear();
        self.data.extend_from_slice(&other.data);
    }

    /// Whether every parameter is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}
