//! Thomas algorithm for tridiagonal systems with fixed end values.
//!
//! Unknowns are y[0..=N]. y[0] and y[N] are prescribed; each interior row
//! i in 1..N reads
//!
//! ```text
//! A_i * y[i-1] - B_i * y[i] + C_i * y[i+1] = F_i
//! ```
//!
//! The forward sweep writes y[i] = alpha[i] * y[i+1] + beta[i] with
//! alpha[0] = 0, beta[0] = y[0]:
//!
//! ```text
//! denom    = B_i - A_i * alpha[i-1]
//! alpha[i] = C_i / denom
//! beta[i]  = (A_i * beta[i-1] - F_i) / denom
//! ```
//!
//! and the backward sweep recovers y[N-1], ..., y[1]. No pivoting is done:
//! rows must be diagonally dominant, |B_i| >= |A_i| + |C_i| with strict
//! inequality somewhere, or `denom` can vanish. Dominance is not checked.

/// Coefficients (A_i, B_i, C_i) of interior row i.
pub trait RowCoefficients {
    fn row(&self, i: usize) -> (f64, f64, f64);
}

/// Same coefficients on every interior row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformRows {
    pub lower: f64,
    pub diagonal: f64,
    pub upper: f64,
}

impl RowCoefficients for UniformRows {
    #[inline]
    fn row(&self, _i: usize) -> (f64, f64, f64) {
        (self.lower, self.diagonal, self.upper)
    }
}

/// Per-row coefficients indexed by node; entries 0 and N are ignored.
#[derive(Debug, Clone, Copy)]
pub struct BandedRows<'a> {
    pub lower: &'a [f64],
    pub diagonal: &'a [f64],
    pub upper: &'a [f64],
}

impl RowCoefficients for BandedRows<'_> {
    #[inline]
    fn row(&self, i: usize) -> (f64, f64, f64) {
        (self.lower[i], self.diagonal[i], self.upper[i])
    }
}

/// Reusable sweep buffers for systems of a fixed size.
#[derive(Debug, Clone)]
pub struct TridiagonalSolver {
    alpha: Vec<f64>,
    beta: Vec<f64>,
}

impl TridiagonalSolver {
    /// Solver for unknowns y[0..=intervals].
    pub fn new(intervals: usize) -> Self {
        Self {
            alpha: vec![0.0; intervals + 1],
            beta: vec![0.0; intervals + 1],
        }
    }

    /// Number of unknowns, boundaries included.
    pub fn len(&self) -> usize {
        self.alpha.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alpha.is_empty()
    }

    /// Solves into `out`, which must have `len()` entries.
    ///
    /// `rhs` is indexed by node like `out`; only its interior entries are
    /// read. `out[0]` ends up as `left` and `out[N]` as `right`.
    pub fn solve(
        &mut self,
        rows: &impl RowCoefficients,
        rhs: &[f64],
        left: f64,
        right: f64,
        out: &mut [f64],
    ) {
        assert_eq!(out.len(), self.alpha.len(), "solution buffer size mismatch");
        assert_eq!(rhs.len(), self.alpha.len(), "right-hand side size mismatch");
        let n = out.len() - 1;

        self.alpha[0] = 0.0;
        self.beta[0] = left;
        for i in 1..n {
            let (a, b, c) = rows.row(i);
            let denom = b - a * self.alpha[i - 1];
            self.alpha[i] = c / denom;
            self.beta[i] = (a * self.beta[i - 1] - rhs[i]) / denom;
        }

        out[n] = right;
        out[0] = left;
        for i in (1..n).rev() {
            out[i] = self.alpha[i] * out[i + 1] + self.beta[i];
        }
    }

    /// Allocating convenience wrapper around [`TridiagonalSolver::solve`].
    pub fn solve_to_vec(
        &mut self,
        rows: &impl RowCoefficients,
        rhs: &[f64],
        left: f64,
        right: f64,
    ) -> Vec<f64> {
        let mut out = vec![0.0; self.alpha.len()];
        self.solve(rows, rhs, left, right, &mut out);
        out
    }
}
