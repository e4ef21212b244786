//! Dense matrix storage and its lifecycle.
//!
//! Every matrix in this crate is an [`ndarray::Array2<f64>`]: one contiguous
//! row-major buffer that owns its storage. Builders allocate through
//! [`alloc_matrix`], which reports allocation failure as
//! [`Error::Allocation`] instead of aborting, so no caller ever sees a
//! partially built matrix.
//!
//! Release is ownership: [`free_matrix`] takes the matrix by value, so a
//! second release (or any use after release) does not compile.

use crate::{Error, Result};
use ndarray::{Array1, Array2};

/// Dense row-major matrix of `f64`.
pub type Matrix = Array2<f64>;

/// Dense vector of `f64`.
pub type Vector = Array1<f64>;

/// Allocate a zero-filled `rows × cols` matrix.
///
/// Storage is reserved fallibly; an impossible size (overflowing
/// `rows * cols`) or an allocator refusal yields [`Error::Allocation`].
pub fn alloc_matrix(rows: usize, cols: usize) -> Result<Matrix> {
    let fail = || Error::Allocation { rows, cols };
    let len = rows.checked_mul(cols).ok_or_else(fail)?;

    let mut buf: Vec<f64> = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| fail())?;
    buf.resize(len, 0.0);

    Array2::from_shape_vec((rows, cols), buf).map_err(|_| fail())
}

/// Allocate a zero-filled vector of length `len`, fallibly.
pub fn alloc_vector(len: usize) -> Result<Vector> {
    let mut buf: Vec<f64> = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Error::Allocation { rows: len, cols: 1 })?;
    buf.resize(len, 0.0);
    Ok(Vector::from_vec(buf))
}

/// Allocate the `n × n` identity matrix.
pub fn identity(n: usize) -> Result<Matrix> {
    let mut m = alloc_matrix(n, n)?;
    m.diag_mut().fill(1.0);
    Ok(m)
}

/// Release a matrix and return its storage to the allocator.
///
/// Dropping the value has the same effect; this exists so call sites can
/// mark the end of a matrix's life explicitly.
pub fn free_matrix(m: Matrix) {
    log::trace!("releasing {} x {} matrix", m.nrows(), m.ncols());
    drop(m);
}

/// Copy row-oriented host data into an `n × d` observation matrix.
///
/// Every row must have the same non-zero length as the first.
pub fn observations_from_rows(rows: &[Vec<f64>]) -> Result<Matrix> {
    let first = rows.first().ok_or(Error::EmptyInput("observations"))?;
    let d = first.len();
    if d == 0 {
        return Err(Error::EmptyInput("observation dimension"));
    }

    let mut obs = alloc_matrix(rows.len(), d)?;
    for (i, row) in rows.iter().enumerate() {
        if row.len() != d {
            return Err(Error::RaggedObservations {
                row: i,
                expected: d,
                found: row.len(),
            });
        }
        for (dst, &src) in obs.row_mut(i).iter_mut().zip(row) {
            *dst = src;
        }
    }
    Ok(obs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_alloc_matrix_zeroed() {
        let m = alloc_matrix(3, 2).unwrap();
        assert_eq!(m.dim(), (3, 2));
        assert!(m.iter().all(|&x| x == 0.0));
        assert!(m.is_standard_layout());
    }

    #[test]
    fn test_alloc_matrix_overflow_is_reported() {
        let err = alloc_matrix(usize::MAX, 2).unwrap_err();
        assert_eq!(
            err,
            Error::Allocation {
                rows: usize::MAX,
                cols: 2
            }
        );
    }

    #[test]
    fn test_alloc_matrix_refused_by_allocator() {
        // Element count fits in usize, byte count exceeds isize::MAX.
        let rows = 1usize << 40;
        let err = alloc_matrix(rows, 1 << 20).unwrap_err();
        assert!(matches!(err, Error::Allocation { .. }));
    }

    #[test]
    fn test_alloc_vector() {
        assert_eq!(alloc_vector(3).unwrap(), array![0.0, 0.0, 0.0]);
        assert!(matches!(
            alloc_vector(usize::MAX),
            Err(Error::Allocation { .. })
        ));
    }

    #[test]
    fn test_identity() {
        let i = identity(3).unwrap();
        assert_eq!(i, array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
    }

    #[test]
    fn test_free_matrix_leaves_other_matrices_intact() {
        let a = array![[1.0, 2.0], [3.0, 4.0]];
        let b = a.clone();
        free_matrix(a);
        assert_eq!(b, array![[1.0, 2.0], [3.0, 4.0]]);
    }

    #[test]
    fn test_observations_from_rows() {
        let obs = observations_from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        assert_eq!(obs, array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
    }

    #[test]
    fn test_observations_from_rows_rejects_ragged() {
        let err = observations_from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            Error::RaggedObservations {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_observations_from_rows_rejects_empty() {
        assert!(matches!(
            observations_from_rows(&[]),
            Err(Error::EmptyInput(_))
        ));
        assert!(matches!(
            observations_from_rows(&[vec![], vec![]]),
            Err(Error::EmptyInput(_))
        ));
    }
}
