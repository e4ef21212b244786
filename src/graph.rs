//! Similarity graph, degree and normalized Laplacian matrices.
//!
//! ```text
//! W[i,j] = exp(-‖x_i - x_j‖ / 2)   (i ≠ j),   W[i,i] = 0
//! D[i,i] = Σ_j W[i,j]
//! L      = I - D^{-1/2} W D^{-1/2}
//! ```
//!
//! All builders are pure: they read their inputs and allocate a fresh
//! result the caller owns.

use crate::distance::squared_euclid_dist;
use crate::matrix::{alloc_matrix, alloc_vector, Matrix, Vector};
use crate::{ensure_finite, ensure_square, Error, Result};
use ndarray::Axis;

/// Maps a pairwise distance to an edge weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SimilarityKernel {
    /// exp(-distance / 2). Weights lie in (0, 1].
    #[default]
    Gaussian,
}

impl SimilarityKernel {
    #[inline]
    pub fn weight(self, distance: f64) -> f64 {
        match self {
            SimilarityKernel::Gaussian => (-distance / 2.0).exp(),
        }
    }
}

/// Weighted adjacency matrix of the fully connected similarity graph.
///
/// `obs` is `n × d` (one observation per row). The result is symmetric
/// `n × n` with a zero diagonal; a single observation gives `[[0.0]]`.
///
/// # Example
///
/// ```rust
/// use spkm::weighted_adj_mat;
/// use ndarray::array;
///
/// let obs = array![[0.0, 0.0], [2.0, 0.0]];
/// let w = weighted_adj_mat(&obs).unwrap();
/// assert_eq!(w[[0, 0]], 0.0);
/// assert!((w[[0, 1]] - (-1.0f64).exp()).abs() < 1e-12);
/// ```
pub fn weighted_adj_mat(obs: &Matrix) -> Result<Matrix> {
    weighted_adj_mat_with_kernel(obs, SimilarityKernel::Gaussian)
}

/// [`weighted_adj_mat`] with an explicit kernel.
pub fn weighted_adj_mat_with_kernel(obs: &Matrix, kernel: SimilarityKernel) -> Result<Matrix> {
    let (n, d) = obs.dim();
    if n == 0 {
        return Err(Error::EmptyInput("observations"));
    }
    if d == 0 {
        return Err(Error::EmptyInput("observation dimension"));
    }
    ensure_finite(obs)?;

    let mut w = alloc_matrix(n, n)?;
    for i in 0..n {
        for j in (i + 1)..n {
            let dist = squared_euclid_dist(obs.row(i), obs.row(j)).sqrt();
            let weight = kernel.weight(dist);
            w[[i, j]] = weight;
            w[[j, i]] = weight;
        }
    }

    log::debug!("built {n} x {n} weighted adjacency from {d}-dimensional observations");
    Ok(w)
}

/// Row sums of the adjacency matrix.
pub fn degree_vector(w: &Matrix) -> Result<Vector> {
    let mut degrees = alloc_vector(w.nrows())?;
    for (dst, row) in degrees.iter_mut().zip(w.axis_iter(Axis(0))) {
        *dst = row.sum();
    }
    Ok(degrees)
}

/// Diagonal degree matrix: D[i,i] = Σ_j W[i,j].
pub fn diag_deg_mat(w: &Matrix) -> Result<Matrix> {
    let n = ensure_square(w)?;
    if n == 0 {
        return Err(Error::EmptyInput("adjacency"));
    }
    ensure_finite(w)?;

    let degrees = degree_vector(w)?;
    if let Some((idx, _)) = degrees.iter().enumerate().find(|(_, deg)| !deg.is_finite()) {
        return Err(Error::DegreeOverflow(idx));
    }

    let mut d = alloc_matrix(n, n)?;
    d.diag_mut().assign(&degrees);
    Ok(d)
}

/// Normalized degree matrix: D[i,i] = (Σ_j W[i,j])^{-1/2}.
///
/// An isolated vertex (row sum ≤ 0) has no inverse square root and is
/// reported as [`Error::ZeroDegree`]; a row sum that overflows is
/// [`Error::DegreeOverflow`] rather than a silent zero.
pub fn diag_deg_mat_inv_sqrt(w: &Matrix) -> Result<Matrix> {
    let n = ensure_square(w)?;
    if n == 0 {
        return Err(Error::EmptyInput("adjacency"));
    }
    ensure_finite(w)?;

    let degrees = degree_vector(w)?;
    for (idx, &deg) in degrees.iter().enumerate() {
        if !deg.is_finite() {
            return Err(Error::DegreeOverflow(idx));
        }
        if deg <= 0.0 {
            return Err(Error::ZeroDegree(idx));
        }
    }

    let mut d = alloc_matrix(n, n)?;
    for (dst, deg) in d.diag_mut().iter_mut().zip(degrees.iter()) {
        *dst = 1.0 / deg.sqrt();
    }
    Ok(d)
}

/// Symmetric normalized Laplacian: L = I - D W D.
///
/// `d` is the normalized degree matrix from [`diag_deg_mat_inv_sqrt`]; only
/// its diagonal is read. L is symmetric positive semidefinite with
/// eigenvalues in [0, 2] when W is a valid adjacency matrix.
pub fn norm_graph_lap(w: &Matrix, d: &Matrix) -> Result<Matrix> {
    let n = ensure_square(w)?;
    let m = ensure_square(d)?;
    if n != m {
        return Err(Error::DimensionMismatch {
            expected: n,
            found: m,
        });
    }
    if n == 0 {
        return Err(Error::EmptyInput("adjacency"));
    }
    ensure_finite(w)?;
    ensure_finite(d)?;

    let scale = d.diag();
    let mut l = alloc_matrix(n, n)?;
    for i in 0..n {
        for j in 0..n {
            let delta = if i == j { 1.0 } else { 0.0 };
            l[[i, j]] = delta - scale[i] * w[[i, j]] * scale[j];
        }
    }

    log::debug!("built {n} x {n} normalized Laplacian");
    Ok(l)
}

/// Observations straight to the normalized Laplacian.
///
/// Intermediate W and D^{-1/2} are released before returning.
pub fn normalized_laplacian(obs: &Matrix) -> Result<Matrix> {
    let w = weighted_adj_mat(obs)?;
    let d = diag_deg_mat_inv_sqrt(&w)?;
    norm_graph_lap(&w, &d)
}
