//! Coefficient shrinkage: quantile cutoff derivation plus hard and soft
//! thresholding of wavelet coefficients.
//!
//! The cutoff is data-driven: the caller names a keep-percentage and the
//! cutoff is read off the sorted magnitude distribution of the whole
//! coefficient bundle (approximation band included). Hard thresholding
//! zeroes everything strictly below the cutoff; soft thresholding also
//! shrinks the survivors toward zero by the cutoff amount, which trades a
//! small bias for much smoother reconstructions.

use ndarray::{Array2, ArrayView2};

use crate::error::{DenoiseError, Result};
use crate::transforms::CoefficientBundle;

/// Shrinkage rule applied to coefficients against a magnitude cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdKind {
    /// Keep-or-kill: values with magnitude at or above the cutoff pass
    /// through unchanged, the rest become zero.
    Hard,
    /// Shrink every value's magnitude by the cutoff, clamping at zero.
    Soft,
}

#[inline]
fn hard_shrink(value: f64, cutoff: f64) -> f64 {
    if value.abs() >= cutoff {
        value
    } else {
        0.0
    }
}

#[inline]
fn soft_shrink(value: f64, cutoff: f64) -> f64 {
    value.signum() * (value.abs() - cutoff).max(0.0)
}

/// Hard-threshold a coefficient plane against `cutoff`.
pub fn hard_threshold(coeffs: ArrayView2<'_, f64>, cutoff: f64) -> Array2<f64> {
    coeffs.mapv(|v| hard_shrink(v, cutoff))
}

/// Soft-threshold a coefficient plane against `cutoff`.
pub fn soft_threshold(coeffs: ArrayView2<'_, f64>, cutoff: f64) -> Array2<f64> {
    coeffs.mapv(|v| soft_shrink(v, cutoff))
}

/// Apply a shrinkage rule to every band of a coefficient bundle in place.
pub fn apply_to_bundle(bundle: &mut CoefficientBundle, kind: ThresholdKind, cutoff: f64) {
    match kind {
        ThresholdKind::Hard => bundle.map_coefficients(|v| hard_shrink(v, cutoff)),
        ThresholdKind::Soft => bundle.map_coefficients(|v| soft_shrink(v, cutoff)),
    }
}

/// Derive a magnitude cutoff from the coefficient distribution.
///
/// `percent` is the share of coefficients to keep, clamped to `[0, 100]`.
/// The cutoff is the magnitude ranked `floor((N - 1) * (100 - percent) / 100)`
/// in ascending order, so `percent = 100` yields the smallest magnitude
/// (everything survives a hard threshold) and `percent = 0` the largest.
pub fn quantile_cutoff(mut magnitudes: Vec<f64>, percent: f64) -> Result<f64> {
    if magnitudes.is_empty() {
        return Err(DenoiseError::EmptyInput("coefficient magnitudes"));
    }
    let percent = percent.clamp(0.0, 100.0);
    magnitudes.sort_unstable_by(|a, b| a.total_cmp(b));
    let rank = ((magnitudes.len() - 1) as f64 * (100.0 - percent) / 100.0) as usize;
    Ok(magnitudes[rank])
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_quantile_rank_formula() {
        let mags = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        // rank = floor(4 * 40 / 100) = 1
        let cut = quantile_cutoff(mags.clone(), 60.0).unwrap();
        assert_eq!(cut, 2.0);

        assert_eq!(quantile_cutoff(mags.clone(), 100.0).unwrap(), 1.0);
        assert_eq!(quantile_cutoff(mags.clone(), 0.0).unwrap(), 5.0);
    }

    #[test]
    fn test_quantile_cutoff_clamps_percent() {
        let mags = vec![1.0, 2.0, 3.0];
        assert_eq!(quantile_cutoff(mags.clone(), 150.0).unwrap(), 1.0);
        assert_eq!(quantile_cutoff(mags, -20.0).unwrap(), 3.0);
    }

    #[test]
    fn test_quantile_cutoff_monotone_in_percent() {
        let mags: Vec<f64> = (0..100).map(|i| (i as f64 * 0.731).sin().abs()).collect();
        let mut last = f64::INFINITY;
        for p in [0.0, 25.0, 50.0, 75.0, 100.0] {
            let cut = quantile_cutoff(mags.clone(), p).unwrap();
            assert!(
                cut <= last,
                "cutoff must not increase as keep-percent grows: p={} cut={} last={}",
                p,
                cut,
                last
            );
            last = cut;
        }
    }

    #[test]
    fn test_quantile_cutoff_empty() {
        let err = quantile_cutoff(Vec::new(), 50.0).unwrap_err();
        assert!(matches!(err, DenoiseError::EmptyInput(_)));
    }

    #[test]
    fn test_hard_threshold_keeps_at_cutoff() {
        let coeffs = array![[1.0, -2.0], [0.5, -0.5]];
        let out = hard_threshold(coeffs.view(), 1.0);
        assert_eq!(out, array![[1.0, -2.0], [0.0, 0.0]]);
    }

    #[test]
    fn test_soft_threshold_shrinks_survivors() {
        let coeffs = array![[3.0, -3.0], [0.5, -0.5]];
        let out = soft_threshold(coeffs.view(), 1.0);
        assert_eq!(out, array![[2.0, -2.0], [0.0, 0.0]]);
    }

    #[test]
    fn test_soft_threshold_preserves_sign() {
        let coeffs = array![[-4.0, 4.0]];
        let out = soft_threshold(coeffs.view(), 1.5);
        assert!(out[[0, 0]] < 0.0 && out[[0, 1]] > 0.0);
        assert_eq!(out[[0, 0]], -out[[0, 1]]);
    }

    #[test]
    fn test_hard_nonzero_count_non_increasing_in_cutoff() {
        let coeffs = array![[0.1, -0.4, 0.9, -1.6, 2.5, 0.0, 3.3, -0.7]];
        let mut last = usize::MAX;
        for cutoff in [0.0, 0.5, 1.0, 2.0, 4.0] {
            let count = hard_threshold(coeffs.view(), cutoff)
                .iter()
                .filter(|&&v| v != 0.0)
                .count();
            assert!(
                count <= last,
                "nonzero count grew from {} to {} at cutoff {}",
                last,
                count,
                cutoff
            );
            last = count;
        }
    }

    #[test]
    fn test_soft_magnitude_non_increasing_in_cutoff() {
        let coeffs = array![[0.1, -0.4, 0.9, -1.6, 2.5, 0.0, 3.3, -0.7]];
        let mut last = soft_threshold(coeffs.view(), 0.0);
        for cutoff in [0.5, 1.0, 2.0, 4.0] {
            let cur = soft_threshold(coeffs.view(), cutoff);
            for (a, b) in cur.iter().zip(last.iter()) {
                assert!(
                    a.abs() <= b.abs(),
                    "magnitude grew under larger cutoff: {} vs {}",
                    a,
                    b
                );
            }
            last = cur;
        }
    }

    #[test]
    fn test_hard_threshold_idempotent() {
        let coeffs = array![[2.0, 0.3, -1.7, 0.0, 5.1]];
        let once = hard_threshold(coeffs.view(), 1.0);
        let twice = hard_threshold(once.view(), 1.0);
        assert_eq!(once, twice);
    }
}
