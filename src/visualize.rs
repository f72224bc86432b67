//! Log-magnitude rendering of coefficient planes for display.
//!
//! Wavelet coefficient magnitudes span several orders of magnitude; a linear
//! grayscale mapping shows only the approximation band. The log compression
//! `ln(|x| + 1)` pulls the detail bands into view while keeping zero at zero.

use ndarray::{Array2, ArrayView2};

use crate::error::{DenoiseError, Result};

/// Render a coefficient plane as an 8-bit grayscale image.
///
/// Each value is mapped through `ln(|x| + 1)`, normalized by the plane
/// maximum, and scaled to `[0, 255]`. An all-zero plane renders as all-zero
/// output rather than dividing by zero.
pub fn visualize(coeffs: ArrayView2<'_, f64>) -> Result<Array2<u8>> {
    if coeffs.is_empty() {
        return Err(DenoiseError::EmptyInput("coefficient plane"));
    }

    let log_mag = coeffs.mapv(|v| (v.abs() + 1.0).ln());
    let max = log_mag.iter().fold(0.0_f64, |m, &v| m.max(v));
    if max == 0.0 {
        return Ok(Array2::zeros(coeffs.raw_dim()));
    }

    Ok(log_mag.mapv(|v| (v / max * 255.0) as u8))
}
