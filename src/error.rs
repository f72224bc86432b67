//! Error types for the wavelet denoising library.
//!
//! Every failure is detected synchronously at the violated precondition and
//! returned to the caller; nothing in this crate panics on bad input.

use thiserror::Error;

/// Result type for wavelet denoising operations.
pub type Result<T> = std::result::Result<T, DenoiseError>;

/// Errors that can occur during wavelet transforms and denoising.
#[derive(Error, Debug)]
pub enum DenoiseError {
    /// Requested wavelet name is not in the filter bank registry.
    #[error("unknown wavelet '{0}'")]
    UnknownWavelet(String),

    /// Filter coefficient data failed load-time validation.
    #[error("invalid filter set '{name}': {reason}")]
    InvalidFilterSet { name: String, reason: String },

    /// Signal size is incompatible with the requested decomposition depth,
    /// or a coefficient bundle's subband shapes are inconsistent.
    #[error("dimensions {rows}x{cols} incompatible with {levels} decomposition level(s)")]
    InvalidDimensions {
        rows: usize,
        cols: usize,
        levels: usize,
    },

    /// A zero-length array was passed where a reduction is required.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// Pipeline configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DenoiseError::UnknownWavelet("db99".to_string());
        assert_eq!(err.to_string(), "unknown wavelet 'db99'");

        let err = DenoiseError::InvalidDimensions {
            rows: 7,
            cols: 8,
            levels: 2,
        };
        assert!(err.to_string().contains("7x8"));
        assert!(err.to_string().contains("2 decomposition"));
    }
}
