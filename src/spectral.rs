//! From eigendecomposition to the spectral embedding consumed by k-means.
//!
//! 1. Sort eigenpairs of L_norm by ascending eigenvalue.
//! 2. Choose k (given, or by the eigengap heuristic).
//! 3. Stack the first k eigenvectors as columns of U (n × k).
//! 4. Normalize each row of U to unit length.
//!
//! Clustering the rows of U is left to the caller.

use crate::graph::normalized_laplacian;
use crate::jacobi::{jacobi_eval_evec, EigenDecomposition, JacobiConfig};
use crate::matrix::{alloc_matrix, Matrix};
use crate::{Error, Result};
use ndarray::ArrayView1;

/// Configuration for [`spectral_embedding`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EmbeddingConfig {
    /// Embedding dimension. `None` picks it with [`eigengap_k`].
    pub k: Option<usize>,
    /// Whether to scale every row of the embedding to unit length.
    pub row_normalize: bool,
    /// Solver settings for the Laplacian eigendecomposition.
    pub jacobi: JacobiConfig,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            k: None,
            row_normalize: true,
            jacobi: JacobiConfig::default(),
        }
    }
}

/// Eigengap heuristic.
///
/// `eigenvalues` must be sorted ascending. Returns the 1-based index `k`
/// maximizing λ_k - λ_{k-1} over the first ⌊n/2⌋ gaps; the first maximum
/// wins ties.
///
/// # Example
///
/// ```rust
/// use spkm::eigengap_k;
/// use ndarray::array;
///
/// let lambdas = array![0.0, 0.01, 0.02, 0.9, 1.0, 1.1];
/// assert_eq!(eigengap_k(lambdas.view()).unwrap(), 3);
/// ```
pub fn eigengap_k(eigenvalues: ArrayView1<'_, f64>) -> Result<usize> {
    let n = eigenvalues.len();
    if n < 2 {
        return Err(Error::InvalidEmbeddingDim { k: 0, n });
    }

    let mut best = 0usize;
    let mut best_gap = f64::NEG_INFINITY;
    for i in 0..n / 2 {
        let gap = (eigenvalues[i + 1] - eigenvalues[i]).abs();
        if gap > best_gap {
            best_gap = gap;
            best = i;
        }
    }
    Ok(best + 1)
}

/// Spectral embedding of observations.
///
/// Builds L_norm, diagonalizes it and hands off to
/// [`embedding_from_decomposition`].
pub fn spectral_embedding(obs: &Matrix, cfg: &EmbeddingConfig) -> Result<Matrix> {
    let lap = normalized_laplacian(obs)?;
    let eig = jacobi_eval_evec(&lap, &cfg.jacobi)?;
    embedding_from_decomposition(&eig, cfg)
}

/// Embedding from an existing decomposition of L_norm (any order).
pub fn embedding_from_decomposition(
    eig: &EigenDecomposition,
    cfg: &EmbeddingConfig,
) -> Result<Matrix> {
    let sorted = eig.sorted()?;
    let n = sorted.len();

    let k = match cfg.k {
        Some(k) if k == 0 || k > n => return Err(Error::InvalidEmbeddingDim { k, n }),
        Some(k) => k,
        None => eigengap_k(sorted.eigenvalues.view())?,
    };
    log::debug!("spectral embedding: n={n}, k={k}");

    let mut u = alloc_matrix(n, k)?;
    for col in 0..k {
        u.column_mut(col).assign(&sorted.eigenvectors.column(col));
    }

    if cfg.row_normalize {
        for mut row in u.rows_mut() {
            let norm_sq: f64 = row.iter().map(|x| x * x).sum();
            let norm = norm_sq.sqrt();
            if norm > 0.0 {
                for x in row.iter_mut() {
                    *x /= norm;
                }
            }
        }
    }

    Ok(u)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::euclid_dist;
    use ndarray::array;

    fn two_blobs() -> Matrix {
        array![
            [0.0, 0.0],
            [0.1, 0.0],
            [0.0, 0.1],
            [10.0, 10.0],
            [10.1, 10.0],
            [10.0, 10.1],
        ]
    }

    #[test]
    fn test_eigengap_picks_largest_gap() {
        let lambdas = array![0.0, 0.1, 0.9, 1.0];
        assert_eq!(eigengap_k(lambdas.view()).unwrap(), 2);
    }

    #[test]
    fn test_eigengap_only_scans_first_half() {
        // The big jump at the end is outside the first ⌊n/2⌋ gaps.
        let lambdas = array![0.0, 0.2, 0.3, 0.4, 5.0];
        assert_eq!(eigengap_k(lambdas.view()).unwrap(), 1);
    }

    #[test]
    fn test_eigengap_ties_take_first() {
        let lambdas = array![0.0, 1.0, 2.0, 3.0];
        assert_eq!(eigengap_k(lambdas.view()).unwrap(), 1);
    }

    #[test]
    fn test_eigengap_rejects_short_spectrum() {
        let lambdas = array![0.0];
        assert_eq!(
            eigengap_k(lambdas.view()),
            Err(Error::InvalidEmbeddingDim { k: 0, n: 1 })
        );
    }

    #[test]
    fn test_embedding_separates_blobs() {
        let u = spectral_embedding(&two_blobs(), &EmbeddingConfig::default()).unwrap();
        assert_eq!(u.dim(), (6, 2));

        for i in 0..6 {
            let norm: f64 = u.row(i).iter().map(|x| x * x).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-10);
        }

        let dist = |i: usize, j: usize| euclid_dist(u.row(i), u.row(j)).unwrap();
        for (a, b) in [(0, 1), (0, 2), (3, 4), (3, 5)] {
            assert!(dist(a, b) < 0.1, "same blob {a},{b}: {}", dist(a, b));
        }
        for (a, b) in [(0, 3), (1, 4), (2, 5)] {
            assert!(dist(a, b) > 1.0, "different blobs {a},{b}: {}", dist(a, b));
        }
    }

    #[test]
    fn test_embedding_explicit_k_without_normalization() {
        let cfg = EmbeddingConfig {
            k: Some(3),
            row_normalize: false,
            ..Default::default()
        };
        let u = spectral_embedding(&two_blobs(), &cfg).unwrap();
        assert_eq!(u.dim(), (6, 3));

        // Unnormalized columns are eigenvectors, hence unit length.
        for col in u.columns() {
            let norm: f64 = col.iter().map(|x| x * x).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_embedding_rejects_bad_k() {
        let eig = EigenDecomposition {
            eigenvalues: array![0.0, 1.0],
            eigenvectors: array![[1.0, 0.0], [0.0, 1.0]],
            rotations: 0,
            converged: true,
        };
        for k in [0, 3] {
            let cfg = EmbeddingConfig {
                k: Some(k),
                ..Default::default()
            };
            assert_eq!(
                embedding_from_decomposition(&eig, &cfg),
                Err(Error::InvalidEmbeddingDim { k, n: 2 })
            );
        }
    }

    #[test]
    fn test_embedding_sorts_unordered_decomposition() {
        let eig = EigenDecomposition {
            eigenvalues: array![2.0, 0.5],
            eigenvectors: array![[1.0, 0.0], [0.0, 1.0]],
            rotations: 0,
            converged: true,
        };
        let cfg = EmbeddingConfig {
            k: Some(1),
            row_normalize: false,
            ..Default::default()
        };
        let u = embedding_from_decomposition(&eig, &cfg).unwrap();
        assert_eq!(u, array![[0.0], [1.0]]);
    }
}
