//! Euclidean distance between observation vectors.

use crate::{Error, Result};
use ndarray::ArrayView1;

/// Euclidean distance: sqrt(Σ_k (x_k - y_k)²).
///
/// Both vectors must be non-empty and of equal length.
///
/// # Example
///
/// ```rust
/// use spkm::euclid_dist;
/// use ndarray::array;
///
/// let x = array![0.0, 0.0];
/// let y = array![3.0, 4.0];
/// assert!((euclid_dist(x.view(), y.view()).unwrap() - 5.0).abs() < 1e-12);
/// ```
pub fn euclid_dist(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Result<f64> {
    if x.is_empty() {
        return Err(Error::EmptyInput("vector"));
    }
    if x.len() != y.len() {
        return Err(Error::DimensionMismatch {
            expected: x.len(),
            found: y.len(),
        });
    }
    Ok(squared_euclid_dist(x, y).sqrt())
}

/// Squared Euclidean distance without length checks.
///
/// Extra coordinates of the longer vector are ignored.
#[inline]
pub fn squared_euclid_dist(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
    x.iter()
        .zip(y.iter())
        .map(|(a, b)| {
            let diff = a - b;
            diff * diff
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};
    use proptest::prelude::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        let x = array![1.5, -2.0, 7.25];
        assert_eq!(euclid_dist(x.view(), x.view()).unwrap(), 0.0);
    }

    #[test]
    fn test_distance_known_value() {
        let x = array![1.0, 2.0, 3.0];
        let y = array![4.0, 6.0, 3.0];
        assert!((euclid_dist(x.view(), y.view()).unwrap() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_rejects_empty() {
        let x = Array1::<f64>::zeros(0);
        assert_eq!(
            euclid_dist(x.view(), x.view()),
            Err(Error::EmptyInput("vector"))
        );
    }

    #[test]
    fn test_distance_rejects_length_mismatch() {
        let x = array![1.0, 2.0];
        let y = array![1.0];
        assert_eq!(
            euclid_dist(x.view(), y.view()),
            Err(Error::DimensionMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    proptest! {
        #[test]
        fn prop_distance_is_symmetric_and_nonnegative(
            pairs in prop::collection::vec((-1e3f64..1e3, -1e3f64..1e3), 1..16),
        ) {
            let x: Array1<f64> = pairs.iter().map(|p| p.0).collect();
            let y: Array1<f64> = pairs.iter().map(|p| p.1).collect();

            let dxy = euclid_dist(x.view(), y.view()).unwrap();
            let dyx = euclid_dist(y.view(), x.view()).unwrap();
            prop_assert_eq!(dxy, dyx);
            prop_assert!(dxy >= 0.0);
        }
    }
}
