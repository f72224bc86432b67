//! Transform engine: multi-level 2D discrete wavelet transforms.
//!
//! Two variants are provided:
//! - **Decimated** (classic DWT): each level filters rows then columns and
//!   downsamples by 2 per axis, recursing on the approximation quadrant.
//!   Non-redundant; total coefficient count equals the input sample count.
//! - **Undecimated** (a trous): no downsampling; the filters are dilated by
//!   `2^level` instead, so every subband stays input-sized (redundant,
//!   shift-robust).
//!
//! All convolutions use **periodic (circular) boundary extension**. This is
//! load-bearing: with the registry's orthonormal, time-reversed filter pairs
//! the periodized analysis operator is orthogonal (decimated) or a tight
//! frame with constant 2 per axis (undecimated), which is what guarantees
//! exact reconstruction at image edges. Synthesis applies the reconstruction
//! filters as the adjoint of the analysis pass; the undecimated synthesis
//! averages the two branch contributions per axis.
//!
//! All arithmetic is f64; callers with f32 data go through the pipeline,
//! which promotes on entry and demotes on exit.

use ndarray::{s, Array2, ArrayView2, Axis};
use rayon::iter::{ParallelBridge, ParallelIterator};

use crate::error::{DenoiseError, Result};
use crate::wavelets::WaveletFilterSet;

/// Decomposition depth cap; keeps `2^levels` comfortably inside usize.
const MAX_LEVELS: usize = 32;

// =============================================================================
// Coefficient bundle
// =============================================================================

/// Which transform produced a coefficient bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformMode {
    Decimated,
    Undecimated,
}

/// The three detail subbands of one 2D decomposition level.
///
/// `horizontal` is high-pass along rows / low-pass along columns,
/// `vertical` the transpose orientation, `diagonal` high-pass along both.
#[derive(Debug, Clone)]
pub struct DetailBands {
    pub horizontal: Array2<f64>,
    pub vertical: Array2<f64>,
    pub diagonal: Array2<f64>,
}

impl DetailBands {
    fn dim(&self) -> (usize, usize) {
        self.horizontal.dim()
    }

    fn consistent(&self) -> bool {
        self.horizontal.dim() == self.vertical.dim()
            && self.horizontal.dim() == self.diagonal.dim()
    }
}

/// Result of a forward transform: the deepest approximation band plus one
/// set of detail bands per level, finest level first.
///
/// Applying the matching inverse to an unmodified bundle reproduces the
/// original signal within floating-point tolerance.
#[derive(Debug, Clone)]
pub struct CoefficientBundle {
    pub mode: TransformMode,
    pub levels: usize,
    pub approx: Array2<f64>,
    pub details: Vec<DetailBands>,
}

impl CoefficientBundle {
    /// Flatten the magnitudes of every coefficient in the bundle,
    /// approximation band included. Feed to quantile cutoff derivation.
    pub fn magnitudes(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.coefficient_count());
        out.extend(self.approx.iter().map(|v| v.abs()));
        for bands in &self.details {
            out.extend(bands.horizontal.iter().map(|v| v.abs()));
            out.extend(bands.vertical.iter().map(|v| v.abs()));
            out.extend(bands.diagonal.iter().map(|v| v.abs()));
        }
        out
    }

    /// Total number of coefficients across all bands.
    pub fn coefficient_count(&self) -> usize {
        self.approx.len()
            + self
                .details
                .iter()
                .map(|b| b.horizontal.len() + b.vertical.len() + b.diagonal.len())
                .sum::<usize>()
    }

    /// Apply an elementwise function to every coefficient array in place.
    pub fn map_coefficients<G: Fn(f64) -> f64>(&mut self, g: G) {
        self.approx.mapv_inplace(&g);
        for bands in &mut self.details {
            bands.horizontal.mapv_inplace(&g);
            bands.vertical.mapv_inplace(&g);
            bands.diagonal.mapv_inplace(&g);
        }
    }

    /// Single displayable coefficient plane.
    ///
    /// Decimated bundles are packed into the classic quadrant mosaic
    /// (approximation top-left at the deepest level, each level's detail
    /// bands filling out the remaining quadrants). Undecimated bundles have
    /// no canonical mosaic; the approximation plane is returned instead.
    pub fn packed(&self) -> Array2<f64> {
        match self.mode {
            TransformMode::Undecimated => self.approx.clone(),
            TransformMode::Decimated => {
                let (ar, ac) = self.approx.dim();
                let mut canvas = Array2::zeros((ar << self.levels, ac << self.levels));
                canvas.slice_mut(s![..ar, ..ac]).assign(&self.approx);
                let (mut r, mut c) = (ar, ac);
                for bands in self.details.iter().rev() {
                    canvas.slice_mut(s![..r, c..2 * c]).assign(&bands.horizontal);
                    canvas.slice_mut(s![r..2 * r, ..c]).assign(&bands.vertical);
                    canvas
                        .slice_mut(s![r..2 * r, c..2 * c])
                        .assign(&bands.diagonal);
                    r *= 2;
                    c *= 2;
                }
                canvas
            }
        }
    }
}

// =============================================================================
// 1D filter kernels (periodic boundary)
// =============================================================================

/// One decimated analysis step: periodic correlation with the decomposition
/// pair, downsampled by 2. `approx`/`detail` each hold `input.len() / 2`.
fn analyze_periodic(
    input: &[f64],
    dec_lo: &[f64],
    dec_hi: &[f64],
    approx: &mut [f64],
    detail: &mut [f64],
) {
    let n = input.len();
    for i in 0..n / 2 {
        let mut a = 0.0;
        let mut d = 0.0;
        for (k, (&lo, &hi)) in dec_lo.iter().zip(dec_hi.iter()).enumerate() {
            let x = input[(2 * i + k) % n];
            a += lo * x;
            d += hi * x;
        }
        approx[i] = a;
        detail[i] = d;
    }
}

/// One decimated synthesis step: upsample-by-2 and convolve with the
/// reconstruction pair, summing both branches. Implemented as the adjoint
/// scatter of `analyze_periodic`, which for time-reversed reconstruction
/// filters is the exact inverse.
fn synthesize_periodic(
    approx: &[f64],
    detail: &[f64],
    rec_lo: &[f64],
    rec_hi: &[f64],
    output: &mut [f64],
) {
    let n = output.len();
    let flen = rec_lo.len();
    output.fill(0.0);
    for i in 0..n / 2 {
        for k in 0..flen {
            let idx = (2 * i + k) % n;
            output[idx] += approx[i] * rec_lo[flen - 1 - k] + detail[i] * rec_hi[flen - 1 - k];
        }
    }
}

/// One undecimated analysis step with the filter dilated by `step`:
/// periodic correlation at stride `step`, no downsampling.
fn analyze_dilated(
    input: &[f64],
    dec_lo: &[f64],
    dec_hi: &[f64],
    step: usize,
    approx: &mut [f64],
    detail: &mut [f64],
) {
    let n = input.len();
    for i in 0..n {
        let mut a = 0.0;
        let mut d = 0.0;
        for (k, (&lo, &hi)) in dec_lo.iter().zip(dec_hi.iter()).enumerate() {
            let x = input[(i + (step * k) % n) % n];
            a += lo * x;
            d += hi * x;
        }
        approx[i] = a;
        detail[i] = d;
    }
}

/// One undecimated synthesis step: dilated reconstruction convolution,
/// averaging the low and high branches (factor 1/2 per axis). Together with
/// the analysis stride this inverts the redundant frame exactly.
fn synthesize_dilated(
    approx: &[f64],
    detail: &[f64],
    rec_lo: &[f64],
    rec_hi: &[f64],
    step: usize,
    output: &mut [f64],
) {
    let n = output.len();
    let flen = rec_lo.len();
    for (m, out) in output.iter_mut().enumerate() {
        let mut acc = 0.0;
        for k in 0..flen {
            let idx = (m + n - (step * k) % n) % n;
            acc += approx[idx] * rec_lo[flen - 1 - k] + detail[idx] * rec_hi[flen - 1 - k];
        }
        *out = 0.5 * acc;
    }
}

// =============================================================================
// 2D axis passes (lane-parallel)
// =============================================================================

/// Decimated analysis along one axis; each lane becomes `[approx | detail]`
/// halves packed in place.
fn analyze_axis(input: &Array2<f64>, axis: Axis, filters: &WaveletFilterSet) -> Array2<f64> {
    let mut output = Array2::zeros(input.raw_dim());
    input
        .lanes(axis)
        .into_iter()
        .zip(output.lanes_mut(axis))
        .par_bridge()
        .for_each(|(src, mut dst)| {
            let lane = src.to_vec();
            let half = lane.len() / 2;
            let mut approx = vec![0.0; half];
            let mut detail = vec![0.0; half];
            analyze_periodic(&lane, filters.dec_lo(), filters.dec_hi(), &mut approx, &mut detail);
            for (i, v) in approx.iter().chain(detail.iter()).enumerate() {
                dst[i] = *v;
            }
        });
    output
}

/// Decimated synthesis along one axis; each input lane is `[approx | detail]`
/// halves, each output lane the reconstructed full-length signal.
fn synthesize_axis(packed: &Array2<f64>, axis: Axis, filters: &WaveletFilterSet) -> Array2<f64> {
    let mut output = Array2::zeros(packed.raw_dim());
    packed
        .lanes(axis)
        .into_iter()
        .zip(output.lanes_mut(axis))
        .par_bridge()
        .for_each(|(src, mut dst)| {
            let lane = src.to_vec();
            let half = lane.len() / 2;
            let mut rec = vec![0.0; lane.len()];
            synthesize_periodic(
                &lane[..half],
                &lane[half..],
                filters.rec_lo(),
                filters.rec_hi(),
                &mut rec,
            );
            for (i, v) in rec.iter().enumerate() {
                dst[i] = *v;
            }
        });
    output
}

/// Undecimated analysis along one axis at the given dilation step; returns
/// the full-size (approx, detail) pair.
fn analyze_axis_dilated(
    input: &Array2<f64>,
    axis: Axis,
    filters: &WaveletFilterSet,
    step: usize,
) -> (Array2<f64>, Array2<f64>) {
    let mut approx = Array2::zeros(input.raw_dim());
    let mut detail = Array2::zeros(input.raw_dim());
    input
        .lanes(axis)
        .into_iter()
        .zip(approx.lanes_mut(axis))
        .zip(detail.lanes_mut(axis))
        .par_bridge()
        .for_each(|((src, mut a_dst), mut d_dst)| {
            let lane = src.to_vec();
            let mut a = vec![0.0; lane.len()];
            let mut d = vec![0.0; lane.len()];
            analyze_dilated(&lane, filters.dec_lo(), filters.dec_hi(), step, &mut a, &mut d);
            for (i, v) in a.iter().enumerate() {
                a_dst[i] = *v;
            }
            for (i, v) in d.iter().enumerate() {
                d_dst[i] = *v;
            }
        });
    (approx, detail)
}

/// Undecimated synthesis along one axis at the given dilation step.
fn synthesize_axis_dilated(
    approx: &Array2<f64>,
    detail: &Array2<f64>,
    axis: Axis,
    filters: &WaveletFilterSet,
    step: usize,
) -> Array2<f64> {
    let mut output = Array2::zeros(approx.raw_dim());
    approx
        .lanes(axis)
        .into_iter()
        .zip(detail.lanes(axis))
        .zip(output.lanes_mut(axis))
        .par_bridge()
        .for_each(|((a_src, d_src), mut dst)| {
            let a = a_src.to_vec();
            let d = d_src.to_vec();
            let mut rec = vec![0.0; a.len()];
            synthesize_dilated(&a, &d, filters.rec_lo(), filters.rec_hi(), step, &mut rec);
            for (i, v) in rec.iter().enumerate() {
                dst[i] = *v;
            }
        });
    output
}

// =============================================================================
// Validation helpers
// =============================================================================

fn check_levels(rows: usize, cols: usize, levels: usize) -> Result<()> {
    if levels == 0 || levels > MAX_LEVELS {
        return Err(DenoiseError::InvalidDimensions { rows, cols, levels });
    }
    Ok(())
}

fn check_signal(signal: &ArrayView2<f64>) -> Result<()> {
    if signal.is_empty() {
        return Err(DenoiseError::EmptyInput("transform input signal"));
    }
    Ok(())
}

// =============================================================================
// Forward / inverse transforms
// =============================================================================

/// Multi-level decimated 2D DWT.
///
/// Fails with `InvalidDimensions` unless both extents are divisible by
/// `2^levels` (the periodized transform needs even length at every level).
pub fn forward_decimated(
    signal: ArrayView2<f64>,
    filters: &WaveletFilterSet,
    levels: usize,
) -> Result<CoefficientBundle> {
    check_signal(&signal)?;
    let (rows, cols) = signal.dim();
    check_levels(rows, cols, levels)?;
    let factor = 1usize << levels;
    if rows % factor != 0 || cols % factor != 0 {
        return Err(DenoiseError::InvalidDimensions { rows, cols, levels });
    }

    let mut current = signal.to_owned();
    let mut details = Vec::with_capacity(levels);
    for _ in 0..levels {
        let packed = analyze_axis(&analyze_axis(&current, Axis(1), filters), Axis(0), filters);
        let (r2, c2) = (packed.nrows() / 2, packed.ncols() / 2);
        details.push(DetailBands {
            horizontal: packed.slice(s![..r2, c2..]).to_owned(),
            vertical: packed.slice(s![r2.., ..c2]).to_owned(),
            diagonal: packed.slice(s![r2.., c2..]).to_owned(),
        });
        current = packed.slice(s![..r2, ..c2]).to_owned();
    }

    Ok(CoefficientBundle {
        mode: TransformMode::Decimated,
        levels,
        approx: current,
        details,
    })
}

/// Inverse of [`forward_decimated`]; exact for unmodified bundles.
pub fn inverse_decimated(
    bundle: &CoefficientBundle,
    filters: &WaveletFilterSet,
) -> Result<Array2<f64>> {
    if bundle.mode != TransformMode::Decimated {
        return Err(DenoiseError::InvalidConfig(
            "decimated inverse applied to an undecimated bundle".to_string(),
        ));
    }
    if bundle.levels != bundle.details.len() || bundle.levels == 0 {
        let (rows, cols) = bundle.approx.dim();
        return Err(DenoiseError::InvalidDimensions {
            rows,
            cols,
            levels: bundle.levels,
        });
    }

    let mut current = bundle.approx.clone();
    for bands in bundle.details.iter().rev() {
        if !bands.consistent() || bands.dim() != current.dim() {
            let (rows, cols) = current.dim();
            return Err(DenoiseError::InvalidDimensions {
                rows,
                cols,
                levels: bundle.levels,
            });
        }
        let (r, c) = current.dim();
        let mut packed = Array2::zeros((2 * r, 2 * c));
        packed.slice_mut(s![..r, ..c]).assign(&current);
        packed.slice_mut(s![..r, c..]).assign(&bands.horizontal);
        packed.slice_mut(s![r.., ..c]).assign(&bands.vertical);
        packed.slice_mut(s![r.., c..]).assign(&bands.diagonal);
        // undo column pass first, then row pass
        current = synthesize_axis(&synthesize_axis(&packed, Axis(0), filters), Axis(1), filters);
    }
    Ok(current)
}

/// Multi-level undecimated (a trous) 2D transform. Every output array is
/// input-sized; any non-empty extent is accepted.
pub fn forward_undecimated(
    signal: ArrayView2<f64>,
    filters: &WaveletFilterSet,
    levels: usize,
) -> Result<CoefficientBundle> {
    check_signal(&signal)?;
    let (rows, cols) = signal.dim();
    check_levels(rows, cols, levels)?;

    let mut current = signal.to_owned();
    let mut details = Vec::with_capacity(levels);
    for level in 0..levels {
        let step = 1usize << level;
        let (lo_r, hi_r) = analyze_axis_dilated(&current, Axis(1), filters, step);
        let (ll, vertical) = analyze_axis_dilated(&lo_r, Axis(0), filters, step);
        let (horizontal, diagonal) = analyze_axis_dilated(&hi_r, Axis(0), filters, step);
        details.push(DetailBands {
            horizontal,
            vertical,
            diagonal,
        });
        current = ll;
    }

    Ok(CoefficientBundle {
        mode: TransformMode::Undecimated,
        levels,
        approx: current,
        details,
    })
}

/// Inverse of [`forward_undecimated`]; exact for unmodified bundles.
pub fn inverse_undecimated(
    bundle: &CoefficientBundle,
    filters: &WaveletFilterSet,
) -> Result<Array2<f64>> {
    if bundle.mode != TransformMode::Undecimated {
        return Err(DenoiseError::InvalidConfig(
            "undecimated inverse applied to a decimated bundle".to_string(),
        ));
    }
    if bundle.levels != bundle.details.len() || bundle.levels == 0 {
        let (rows, cols) = bundle.approx.dim();
        return Err(DenoiseError::InvalidDimensions {
            rows,
            cols,
            levels: bundle.levels,
        });
    }

    let mut current = bundle.approx.clone();
    for (level, bands) in bundle.details.iter().enumerate().rev() {
        if !bands.consistent() || bands.dim() != current.dim() {
            let (rows, cols) = current.dim();
            return Err(DenoiseError::InvalidDimensions {
                rows,
                cols,
                levels: bundle.levels,
            });
        }
        let step = 1usize << level;
        let lo_r = synthesize_axis_dilated(&current, &bands.vertical, Axis(0), filters, step);
        let hi_r = synthesize_axis_dilated(&bands.horizontal, &bands.diagonal, Axis(0), filters, step);
        current = synthesize_axis_dilated(&lo_r, &hi_r, Axis(1), filters, step);
    }
    Ok(current)
}
