//! Float trait abstraction for f32/f64 input support.
//!
//! The transform engine always computes in f64. This trait lets callers pass
//! single-precision images: inputs are promoted to f64 on entry and results
//! cast back to the caller's precision on exit.

use num_traits::{Float, FromPrimitive, NumAssign, ToPrimitive};
use std::fmt::Debug;
use std::iter::Sum;

/// Trait alias for floating point types accepted at the API boundary.
///
/// Combines the bounds needed by the denoising pipeline:
/// - Basic float operations (Float, NumAssign)
/// - Conversion to/from f64 for internal double-precision arithmetic
/// - Iteration support (Sum)
/// - Debug printing
pub trait WaveletFloat:
    Float + FromPrimitive + ToPrimitive + NumAssign + Sum + Debug + Send + Sync + 'static
{
    /// Widen to f64 for internal processing.
    fn to_f64_lossy(self) -> f64;

    /// Narrow an f64 result back to the caller's precision.
    fn from_f64_lossy(val: f64) -> Self;
}

impl WaveletFloat for f32 {
    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64_lossy(val: f64) -> Self {
        val as f32
    }
}

impl WaveletFloat for f64 {
    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64_lossy(val: f64) -> Self {
        val
    }
}
