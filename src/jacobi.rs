//! Jacobi eigenvalue algorithm for dense symmetric matrices.
//!
//! Each step picks the largest off-diagonal entry A[p,q] (the pivot) and
//! applies the plane rotation J that zeroes it:
//!
//! ```text
//! θ = (A[q,q] - A[p,p]) / (2 A[p,q])
//! t = sign(θ) / (|θ| + sqrt(θ² + 1))      (t = 1 when θ = 0)
//! c = 1 / sqrt(t² + 1),  s = t c
//!
//! A ← Jᵀ A J,   V ← V J
//! ```
//!
//! Rotations preserve eigenvalues, so once the off-diagonal mass is gone the
//! diagonal of A holds the eigenvalues and the columns of V (the product of
//! all rotations) the matching orthonormal eigenvectors.
//!
//! Pivot search is an exhaustive O(n²) scan per rotation. That is fine for
//! the few hundred vertices a dense Laplacian is practical for.

use crate::matrix::{alloc_matrix, alloc_vector, identity, Matrix, Vector};
use crate::{ensure_finite, ensure_square, Error, Result};

/// Stopping rules for [`jacobi_eval_evec`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct JacobiConfig {
    /// Maximum number of rotations (each eliminates one off-diagonal pair).
    ///
    /// Reaching the cap is not an error: the solver returns the current
    /// decomposition with `converged == false`.
    pub max_sweeps: usize,
    /// Absolute threshold on the off-diagonal sum of squares, and on the
    /// decrease a single rotation must achieve to keep going.
    pub convergence_epsilon: f64,
}

impl Default for JacobiConfig {
    fn default() -> Self {
        Self {
            max_sweeps: 100,
            convergence_epsilon: 1e-15,
        }
    }
}

/// Eigenvalues with their eigenvectors stored as columns.
///
/// `eigenvalues[i]` belongs to `eigenvectors.column(i)`. Order is whatever
/// the pivot sequence produced; use [`EigenDecomposition::sorted`] for an
/// ascending spectrum.
#[derive(Debug, Clone, PartialEq)]
pub struct EigenDecomposition {
    pub eigenvalues: Vector,
    pub eigenvectors: Matrix,
    /// Rotations applied.
    pub rotations: usize,
    /// False if the solver stopped on `max_sweeps`.
    pub converged: bool,
}

impl EigenDecomposition {
    pub fn len(&self) -> usize {
        self.eigenvalues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eigenvalues.is_empty()
    }

    /// Copy with eigenpairs ordered by ascending eigenvalue.
    ///
    /// The sort is stable, so equal eigenvalues keep solver order.
    pub fn sorted(&self) -> Result<Self> {
        let n = self.len();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&i, &j| self.eigenvalues[i].total_cmp(&self.eigenvalues[j]));

        let mut eigenvalues = alloc_vector(n)?;
        let mut eigenvectors = alloc_matrix(n, n)?;
        for (out_col, &src) in order.iter().enumerate() {
            eigenvalues[out_col] = self.eigenvalues[src];
            eigenvectors
                .column_mut(out_col)
                .assign(&self.eigenvectors.column(src));
        }

        Ok(Self {
            eigenvalues,
            eigenvectors,
            rotations: self.rotations,
            converged: self.converged,
        })
    }

    /// Flip eigenvectors so each one's largest-magnitude coordinate is positive.
    ///
    /// Ties go to the lowest row index.
    pub fn canonicalize_signs(&mut self) {
        for mut col in self.eigenvectors.columns_mut() {
            let mut pivot = 0.0f64;
            for &x in col.iter() {
                if x.abs() > pivot.abs() {
                    pivot = x;
                }
            }
            if pivot < 0.0 {
                col.mapv_inplace(|x| -x);
            }
        }
    }

    /// `(n + 1) × n` layout: eigenvalues in row 0, eigenvectors below.
    pub fn to_stacked(&self) -> Result<Matrix> {
        let n = self.len();
        let mut out = alloc_matrix(n + 1, n)?;
        out.row_mut(0).assign(&self.eigenvalues);
        for i in 0..n {
            out.row_mut(i + 1).assign(&self.eigenvectors.row(i));
        }
        Ok(out)
    }

    /// V · diag(λ) · Vᵀ.
    ///
    /// A check on the decomposition rather than a builder; the product
    /// allocates through ndarray directly.
    pub fn reconstruct(&self) -> Matrix {
        let scaled = &self.eigenvectors * &self.eigenvalues;
        scaled.dot(&self.eigenvectors.t())
    }
}

/// Full eigendecomposition of a symmetric matrix by Jacobi rotations.
///
/// `a` is copied; the caller's matrix is never modified. Symmetry is assumed,
/// not verified: only the upper triangle is searched for pivots, so an
/// asymmetric input yields a meaningless result. See
/// [`jacobi_eval_evec_checked`].
///
/// # Example
///
/// ```rust
/// use spkm::{jacobi_eval_evec, JacobiConfig};
/// use ndarray::array;
///
/// let a = array![[2.0, 1.0], [1.0, 2.0]];
/// let eig = jacobi_eval_evec(&a, &JacobiConfig::default()).unwrap().sorted().unwrap();
/// assert!((eig.eigenvalues[0] - 1.0).abs() < 1e-12);
/// assert!((eig.eigenvalues[1] - 3.0).abs() < 1e-12);
/// ```
pub fn jacobi_eval_evec(a: &Matrix, cfg: &JacobiConfig) -> Result<EigenDecomposition> {
    let n = ensure_square(a)?;
    if n == 0 {
        return Err(Error::EmptyInput("matrix"));
    }
    ensure_finite(a)?;

    let mut d = alloc_matrix(n, n)?;
    d.assign(a);
    let mut v = identity(n)?;

    let mut off = off_diagonal_sq(&d);
    let mut rotations = 0usize;
    let mut converged = false;

    while rotations < cfg.max_sweeps {
        if off < cfg.convergence_epsilon {
            converged = true;
            break;
        }

        let (p, q, max) = find_pivot(&d);
        if max == 0.0 {
            converged = true;
            break;
        }
        log::trace!("rotation {rotations}: pivot ({p}, {q}) = {max:e}");

        rotate(&mut d, &mut v, p, q);
        rotations += 1;

        let next = off_diagonal_sq(&d);
        let decrease = off - next;
        off = next;
        if decrease <= cfg.convergence_epsilon {
            converged = true;
            break;
        }
    }

    if !converged && off < cfg.convergence_epsilon {
        converged = true;
    }
    if !converged {
        log::warn!(
            "jacobi stopped after {rotations} rotations with off-diagonal mass {off:e}"
        );
    }
    log::debug!("jacobi on {n} x {n}: {rotations} rotations, converged={converged}");

    Ok(EigenDecomposition {
        eigenvalues: d.diag().to_owned(),
        eigenvectors: v,
        rotations,
        converged,
    })
}

/// [`jacobi_eval_evec`], but rejects asymmetric input.
///
/// Entries are compared with a tolerance of 1e-12 scaled by their magnitude.
pub fn jacobi_eval_evec_checked(a: &Matrix, cfg: &JacobiConfig) -> Result<EigenDecomposition> {
    let n = ensure_square(a)?;
    for i in 0..n {
        for j in (i + 1)..n {
            let (x, y) = (a[[i, j]], a[[j, i]]);
            let scale = x.abs().max(y.abs()).max(1.0);
            if (x - y).abs() > 1e-12 * scale {
                return Err(Error::NotSymmetric { row: i, col: j });
            }
        }
    }
    jacobi_eval_evec(a, cfg)
}

/// Σ_{i≠j} A[i,j]².
fn off_diagonal_sq(a: &Matrix) -> f64 {
    a.indexed_iter()
        .filter(|((i, j), _)| i != j)
        .map(|(_, x)| x * x)
        .sum()
}

/// Largest-magnitude entry of the strict upper triangle: `(p, q, |A[p,q]|)`.
fn find_pivot(a: &Matrix) -> (usize, usize, f64) {
    let n = a.nrows();
    let mut p = 0usize;
    let mut q = 1usize;
    let mut max = 0.0f64;
    for i in 0..n {
        for j in (i + 1)..n {
            let val = a[[i, j]].abs();
            if val > max {
                max = val;
                p = i;
                q = j;
            }
        }
    }
    (p, q, max)
}

/// Plane rotation J chosen to annihilate one off-diagonal pair.
///
/// J is the identity except J[p,p] = J[q,q] = c, J[p,q] = s, J[q,p] = -s.
/// Right-multiplying by J maps columns (x_p, x_q) to (c·x_p - s·x_q, s·x_p + c·x_q).
#[derive(Debug, Clone, Copy, PartialEq)]
struct Rotation {
    c: f64,
    s: f64,
    t: f64,
}

impl Rotation {
    /// Rotation zeroing `apq`, taking the smaller root `t = tan φ` so |φ| ≤ π/4.
    fn annihilating(app: f64, aqq: f64, apq: f64) -> Self {
        let theta = (aqq - app) / (2.0 * apq);
        let sign = if theta >= 0.0 { 1.0 } else { -1.0 };
        let t = sign / (theta.abs() + theta.hypot(1.0));
        let c = 1.0 / t.hypot(1.0);
        Self { c, s: t * c, t }
    }

    #[inline]
    fn apply(self, xp: f64, xq: f64) -> (f64, f64) {
        (self.c * xp - self.s * xq, self.s * xp + self.c * xq)
    }
}

/// d ← Jᵀ d J and v ← v J for the rotation zeroing `d[p,q]`.
fn rotate(d: &mut Matrix, v: &mut Matrix, p: usize, q: usize) {
    let apq = d[[p, q]];
    let rot = Rotation::annihilating(d[[p, p]], d[[q, q]], apq);

    for i in (0..d.nrows()).filter(|&i| i != p && i != q) {
        let (dip, diq) = rot.apply(d[[i, p]], d[[i, q]]);
        d[[i, p]] = dip;
        d[[p, i]] = dip;
        d[[i, q]] = diq;
        d[[q, i]] = diq;
    }

    // Closed form of the 2×2 block once A[p,q] is gone.
    d[[p, p]] -= rot.t * apq;
    d[[q, q]] += rot.t * apq;
    d[[p, q]] = 0.0;
    d[[q, p]] = 0.0;

    for mut row in v.rows_mut() {
        let (vp, vq) = rot.apply(row[p], row[q]);
        row[p] = vp;
        row[q] = vq;
    }
}
