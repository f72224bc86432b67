//! Wavelet-domain 2D image denoising.
//!
//! The crate decomposes an image with a multi-level 2D discrete wavelet
//! transform (decimated or undecimated, periodic boundary handling),
//! derives a magnitude cutoff from a caller-chosen quantile of the
//! coefficient distribution, shrinks the coefficients (hard or soft), and
//! reconstructs. A log-magnitude rendering of the thresholded coefficient
//! plane is returned alongside the denoised image for inspection.
//!
//! # Quick start
//!
//! ```
//! use ndarray::Array2;
//! use wavelet_denoise::{denoise, DenoiseConfig, ThresholdKind};
//!
//! let image = Array2::<f64>::from_shape_fn((64, 64), |(r, c)| {
//!     ((r as f64) * 0.1).sin() + ((c as f64) * 0.1).cos()
//! });
//! let config = DenoiseConfig {
//!     wavelet: "db4".to_string(),
//!     levels: 3,
//!     threshold_percent: 20.0,
//!     threshold_kind: ThresholdKind::Soft,
//!     undecimated: false,
//! };
//! let result = denoise(image.view(), &config).unwrap();
//! assert_eq!(result.denoised.dim(), image.dim());
//! ```
//!
//! The transform layer is usable on its own via [`forward_decimated`] /
//! [`forward_undecimated`] and the matching inverses, for callers that want
//! to manipulate coefficients directly.

pub mod error;
pub mod float_trait;
pub mod pipeline;
pub mod thresholding;
pub mod transforms;
pub mod visualize;
pub mod wavelets;

pub use error::{DenoiseError, Result};
pub use float_trait::WaveletFloat;
pub use pipeline::{denoise, denoise_with, DenoiseConfig, DenoiseResult};
pub use thresholding::{
    apply_to_bundle, hard_threshold, quantile_cutoff, soft_threshold, ThresholdKind,
};
pub use transforms::{
    forward_decimated, forward_undecimated, inverse_decimated, inverse_undecimated,
    CoefficientBundle, DetailBands, TransformMode,
};
pub use visualize::visualize;
pub use wavelets::{list_wavelets, WaveletFilterSet};
