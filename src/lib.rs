//! # spkm
//!
//! Dense building blocks for normalized spectral clustering: similarity
//! graphs, degree matrices, the symmetric normalized Laplacian, and a
//! Jacobi eigensolver for symmetric matrices.
//!
//! ## The Pipeline
//!
//! ```text
//! observations (n × d)
//!     → weighted adjacency W      (Gaussian kernel on Euclidean distance)
//!     → degree matrix D^{-1/2}    (inverse square roots of row sums)
//!     → L_norm = I - D^{-1/2} W D^{-1/2}
//!     → Jacobi eigendecomposition (eigenvalues, orthonormal eigenvectors)
//!     → (external) spectral embedding + k-means
//! ```
//!
//! ## Key Functions
//!
//! | Function | Purpose |
//! |----------|---------|
//! | [`euclid_dist`] | Euclidean distance between two vectors |
//! | [`weighted_adj_mat`] | W[i,j] = exp(-‖x_i - x_j‖ / 2), zero diagonal |
//! | [`diag_deg_mat`] | D[i,i] = Σ_j W[i,j] |
//! | [`diag_deg_mat_inv_sqrt`] | D[i,i] = (Σ_j W[i,j])^{-1/2} |
//! | [`norm_graph_lap`] | L = I - D W D |
//! | [`jacobi_eval_evec`] | Eigenvalues + eigenvectors of a symmetric matrix |
//! | [`free_matrix`] | Release a matrix |
//!
//! ## Quick Start
//!
//! ```rust
//! use spkm::{diag_deg_mat_inv_sqrt, jacobi_eval_evec, norm_graph_lap, weighted_adj_mat, JacobiConfig};
//! use ndarray::array;
//!
//! let obs = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
//!
//! let w = weighted_adj_mat(&obs)?;
//! let d = diag_deg_mat_inv_sqrt(&w)?;
//! let l = norm_graph_lap(&w, &d)?;
//!
//! let eig = jacobi_eval_evec(&l, &JacobiConfig::default())?.sorted()?;
//! assert!(eig.eigenvalues[0].abs() < 1e-8);
//! # Ok::<(), spkm::Error>(())
//! ```
//!
//! ## Ordering
//!
//! The solver returns eigenpairs in the order its pivot sequence leaves them
//! on the diagonal. Sorting is explicit: call [`EigenDecomposition::sorted`]
//! before any eigengap-based selection. [`spectral_embedding`] sorts for you.
//!
//! ## What Can Go Wrong
//!
//! 1. **Isolated vertex**: a zero row sum makes D^{-1/2} undefined; surfaced as
//!    [`Error::ZeroDegree`]. The Gaussian kernel never produces one for n ≥ 2
//!    unless distances overflow.
//! 2. **Asymmetric input**: [`jacobi_eval_evec`] assumes symmetry and silently
//!    returns garbage otherwise. Use [`jacobi_eval_evec_checked`] when unsure.
//! 3. **Iteration cap**: the solver stops after `max_sweeps` rotations and
//!    returns what it has. Check [`EigenDecomposition::converged`].
//! 4. **Eigenvector signs** are arbitrary; see
//!    [`EigenDecomposition::canonicalize_signs`].
//!
//! ## References
//!
//! - Jacobi (1846). "Über ein leichtes Verfahren..."
//! - Ng, Jordan, Weiss (2001). "On Spectral Clustering"
//! - von Luxburg (2007). "A Tutorial on Spectral Clustering"

use thiserror::Error;

pub mod distance;
pub mod goal;
pub mod graph;
pub mod jacobi;
pub mod matrix;
pub mod spectral;

pub use distance::{euclid_dist, squared_euclid_dist};
pub use goal::{run_goal, Goal};
pub use graph::{
    degree_vector, diag_deg_mat, diag_deg_mat_inv_sqrt, normalized_laplacian, norm_graph_lap,
    weighted_adj_mat, weighted_adj_mat_with_kernel, SimilarityKernel,
};
pub use jacobi::{jacobi_eval_evec, jacobi_eval_evec_checked, EigenDecomposition, JacobiConfig};
pub use matrix::{
    alloc_matrix, alloc_vector, free_matrix, identity, observations_from_rows, Matrix, Vector,
};
pub use spectral::{eigengap_k, embedding_from_decomposition, spectral_embedding, EmbeddingConfig};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("failed to allocate a {rows} x {cols} matrix")]
    Allocation { rows: usize, cols: usize },

    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("observation {row} has {found} coordinates, expected {expected}")]
    RaggedObservations {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("matrix is not square: {0} x {1}")]
    NotSquare(usize, usize),

    #[error("matrix is not symmetric at ({row}, {col})")]
    NotSymmetric { row: usize, col: usize },

    #[error("zero degree node at index {0}")]
    ZeroDegree(usize),

    #[error("degree of node {0} overflows to infinity")]
    DegreeOverflow(usize),

    #[error("non-finite entry at ({row}, {col})")]
    NonFinite { row: usize, col: usize },

    #[error("invalid embedding dimension k={k} for n={n}")]
    InvalidEmbeddingDim { k: usize, n: usize },

    #[error("unknown goal {0:?}, expected one of wam, ddg, lnorm, jacobi")]
    UnknownGoal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn ensure_square(a: &Matrix) -> Result<usize> {
    let (n, m) = a.dim();
    if n != m {
        return Err(Error::NotSquare(n, m));
    }
    Ok(n)
}

pub(crate) fn ensure_finite(a: &Matrix) -> Result<()> {
    match a.indexed_iter().find(|(_, v)| !v.is_finite()) {
        Some(((row, col), _)) => Err(Error::NonFinite { row, col }),
        None => Ok(()),
    }
}
