//! End-to-end denoising pipeline.
//!
//! Orchestrates the full pass: promote the input to f64, run the forward
//! transform, derive a quantile cutoff from the coefficient magnitude
//! distribution, shrink, render the thresholded coefficient plane for
//! display, invert, and demote back to the caller's precision.

use ndarray::{Array2, ArrayView2};
use tracing::debug;

use crate::error::{DenoiseError, Result};
use crate::float_trait::WaveletFloat;
use crate::thresholding::{apply_to_bundle, quantile_cutoff, ThresholdKind};
use crate::transforms::{
    forward_decimated, forward_undecimated, inverse_decimated, inverse_undecimated,
};
use crate::visualize::visualize;
use crate::wavelets::WaveletFilterSet;

// =============================================================================
// Configuration
// =============================================================================

/// Parameters for a denoising run.
#[derive(Debug, Clone)]
pub struct DenoiseConfig {
    /// Registry name of the wavelet to use.
    pub wavelet: String,
    /// Decomposition depth.
    pub levels: usize,
    /// Share of coefficients to keep, in percent. Values outside `[0, 100]`
    /// are clamped.
    pub threshold_percent: f64,
    /// Shrinkage rule applied against the derived cutoff.
    pub threshold_kind: ThresholdKind,
    /// Use the undecimated (shift-robust, redundant) transform instead of
    /// the decimated one. Lifts the power-of-two divisibility requirement
    /// on the input dimensions.
    pub undecimated: bool,
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        Self {
            wavelet: "haar".to_string(),
            levels: 1,
            threshold_percent: 5.0,
            threshold_kind: ThresholdKind::Soft,
            undecimated: false,
        }
    }
}

impl DenoiseConfig {
    /// Validate parameters that are not checked downstream.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold_percent.is_finite() {
            return Err(DenoiseError::InvalidConfig(format!(
                "threshold_percent must be finite, got {}",
                self.threshold_percent
            )));
        }
        // Resolves the wavelet name eagerly so a bad name fails here rather
        // than mid-pipeline.
        WaveletFilterSet::for_name(&self.wavelet)?;
        Ok(())
    }
}

/// Output of a denoising run.
#[derive(Debug, Clone)]
pub struct DenoiseResult<F: WaveletFloat> {
    /// Reconstructed image, same shape and precision as the input.
    pub denoised: Array2<F>,
    /// 8-bit log-magnitude rendering of the thresholded coefficient plane.
    pub coefficient_view: Array2<u8>,
}

// =============================================================================
// Pipeline
// =============================================================================

/// Denoise a 2D image by wavelet-domain quantile thresholding.
pub fn denoise<F: WaveletFloat>(
    input: ArrayView2<'_, F>,
    config: &DenoiseConfig,
) -> Result<DenoiseResult<F>> {
    config.validate()?;
    let filters = WaveletFilterSet::for_name(&config.wavelet)?;

    let promoted: Array2<f64> = input.mapv(|v| v.to_f64_lossy());

    let mut bundle = if config.undecimated {
        forward_undecimated(promoted.view(), &filters, config.levels)?
    } else {
        forward_decimated(promoted.view(), &filters, config.levels)?
    };
    debug!(
        mode = ?bundle.mode,
        levels = bundle.levels,
        coefficients = bundle.coefficient_count(),
        "forward transform complete"
    );

    let cutoff = quantile_cutoff(bundle.magnitudes(), config.threshold_percent)?;
    debug!(
        wavelet = %config.wavelet,
        threshold_percent = config.threshold_percent,
        cutoff,
        "derived quantile cutoff"
    );

    apply_to_bundle(&mut bundle, config.threshold_kind, cutoff);
    let coefficient_view = visualize(bundle.packed().view())?;

    let reconstructed = if config.undecimated {
        inverse_undecimated(&bundle, &filters)?
    } else {
        inverse_decimated(&bundle, &filters)?
    };
    debug!(shape = ?reconstructed.dim(), "inverse transform complete");

    Ok(DenoiseResult {
        denoised: reconstructed.mapv(F::from_f64_lossy),
        coefficient_view,
    })
}

/// Convenience wrapper: denoise with an explicit wavelet, depth, and
/// keep-percentage, soft shrinkage, decimated transform.
pub fn denoise_with<F: WaveletFloat>(
    input: ArrayView2<'_, F>,
    wavelet: &str,
    levels: usize,
    threshold_percent: f64,
) -> Result<DenoiseResult<F>> {
    let config = DenoiseConfig {
        wavelet: wavelet.to_string(),
        levels,
        threshold_percent,
        ..Default::default()
    };
    denoise(input, &config)
}
