//! Filter bank registry: named orthonormal wavelet filter sets.
//!
//! Each registry entry is derived from a tabulated scaling (low-pass) filter
//! via the standard alternating-flip construction, yielding the four filters
//! `(dec_lo, dec_hi, rec_lo, rec_hi)` used by the transform engine. The
//! reconstruction filters are time-reversed decomposition filters; together
//! with the quadrature-mirror high-pass this is exactly the orthonormality
//! condition that makes the periodized transform invertible.

use crate::error::{DenoiseError, Result};

// =============================================================================
// Scaling filter tables
// =============================================================================

const HAAR: [f64; 2] = [std::f64::consts::FRAC_1_SQRT_2, std::f64::consts::FRAC_1_SQRT_2];

const DB2: [f64; 4] = [
    0.48296291314469025,
    0.836516303737469,
    0.22414386804185735,
    -0.12940952255092145,
];

const DB3: [f64; 6] = [
    0.3326705529509569,
    0.8068915093133388,
    0.4598775021193313,
    -0.13501102001039084,
    -0.08544127388224149,
    0.035226291882100656,
];

const DB4: [f64; 8] = [
    0.23037781330885523,
    0.7148465705525415,
    0.6308807679295904,
    -0.02798376941698385,
    -0.18703481171888114,
    0.030841381835986965,
    0.032883011666982945,
    -0.010597401784997278,
];

const SYM4: [f64; 8] = [
    -0.07576571478927333,
    -0.02963552764599851,
    0.49761866763201545,
    0.8037387518059161,
    0.29785779560527736,
    -0.09921954357684722,
    -0.012603967262037833,
    0.0322231006040427,
];

const COIF1: [f64; 6] = [
    -0.01565572813546454,
    -0.0727326195128539,
    0.38486484686420286,
    0.8525720202122554,
    0.3378976624578092,
    -0.0727326195128539,
];

const COIF2: [f64; 12] = [
    -0.0007205494453645122,
    -0.0018232088707029932,
    0.0056114348193944995,
    0.023680171946334084,
    -0.0594344186464569,
    -0.0764885990783064,
    0.41700518442169254,
    0.8127236354455423,
    0.3861100668211622,
    -0.06737255472196302,
    -0.04146493678175915,
    0.016387336463522112,
];

/// Registry order is stable; hosts use it to populate wavelet selectors.
const WAVELET_NAMES: &[&str] = &["haar", "db2", "db3", "db4", "sym4", "coif1", "coif2"];

/// Ordered list of wavelet names known to the registry.
pub fn list_wavelets() -> &'static [&'static str] {
    WAVELET_NAMES
}

// =============================================================================
// Filter set
// =============================================================================

/// An immutable four-filter wavelet set.
///
/// Invariants (checked at construction): all filters non-empty with even
/// length, and the decomposition/reconstruction pairs have matching lengths.
#[derive(Debug, Clone)]
pub struct WaveletFilterSet {
    name: String,
    dec_lo: Vec<f64>,
    dec_hi: Vec<f64>,
    rec_lo: Vec<f64>,
    rec_hi: Vec<f64>,
}

impl WaveletFilterSet {
    /// Look up a wavelet by registry name.
    pub fn for_name(name: &str) -> Result<Self> {
        let scaling: &[f64] = match name {
            "haar" => &HAAR,
            "db2" => &DB2,
            "db3" => &DB3,
            "db4" => &DB4,
            "sym4" => &SYM4,
            "coif1" => &COIF1,
            "coif2" => &COIF2,
            _ => return Err(DenoiseError::UnknownWavelet(name.to_string())),
        };
        Self::from_scaling(name, scaling)
    }

    /// Build an orthonormal filter set from a scaling (low-pass) filter.
    ///
    /// `dec_hi` is the alternating-flip quadrature mirror of `dec_lo`;
    /// `rec_lo`/`rec_hi` are the time-reversed decomposition filters.
    pub fn from_scaling(name: &str, scaling: &[f64]) -> Result<Self> {
        let dec_lo = scaling.to_vec();
        let dec_hi: Vec<f64> = scaling
            .iter()
            .enumerate()
            .map(|(i, &c)| if i % 2 == 0 { -c } else { c })
            .rev()
            .collect();
        let rec_lo: Vec<f64> = dec_lo.iter().rev().copied().collect();
        let rec_hi: Vec<f64> = dec_hi.iter().rev().copied().collect();
        Self::new(name, dec_lo, dec_hi, rec_lo, rec_hi)
    }

    /// Construct from explicit filters, validating the data-model invariants.
    pub fn new(
        name: &str,
        dec_lo: Vec<f64>,
        dec_hi: Vec<f64>,
        rec_lo: Vec<f64>,
        rec_hi: Vec<f64>,
    ) -> Result<Self> {
        let invalid = |reason: &str| DenoiseError::InvalidFilterSet {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        for (label, filter) in [
            ("dec_lo", &dec_lo),
            ("dec_hi", &dec_hi),
            ("rec_lo", &rec_lo),
            ("rec_hi", &rec_hi),
        ] {
            if filter.is_empty() {
                return Err(invalid(&format!("{label} is empty")));
            }
            if filter.len() % 2 != 0 {
                return Err(invalid(&format!("{label} has odd length {}", filter.len())));
            }
            if filter.iter().any(|v| !v.is_finite()) {
                return Err(invalid(&format!("{label} contains non-finite values")));
            }
        }
        if dec_lo.len() != dec_hi.len() {
            return Err(invalid("dec_lo/dec_hi length mismatch"));
        }
        if rec_lo.len() != rec_hi.len() {
            return Err(invalid("rec_lo/rec_hi length mismatch"));
        }

        Ok(Self {
            name: name.to_string(),
            dec_lo,
            dec_hi,
            rec_lo,
            rec_hi,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decomposition filter length (taps).
    pub fn filter_len(&self) -> usize {
        self.dec_lo.len()
    }

    pub fn dec_lo(&self) -> &[f64] {
        &self.dec_lo
    }

    pub fn dec_hi(&self) -> &[f64] {
        &self.dec_hi
    }

    pub fn rec_lo(&self) -> &[f64] {
        &self.rec_lo
    }

    pub fn rec_hi(&self) -> &[f64] {
        &self.rec_hi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_names_resolve() {
        for &name in list_wavelets() {
            let filters = WaveletFilterSet::for_name(name)
                .unwrap_or_else(|e| panic!("registry entry '{}' failed to load: {}", name, e));
            assert_eq!(filters.name(), name);
            assert!(filters.filter_len() >= 2);
            assert_eq!(filters.filter_len() % 2, 0, "{} has odd filter length", name);
        }
    }

    #[test]
    fn test_unknown_wavelet() {
        let err = WaveletFilterSet::for_name("db99").unwrap_err();
        assert!(matches!(err, DenoiseError::UnknownWavelet(_)));
    }

    #[test]
    fn test_registry_order_stable() {
        assert_eq!(
            list_wavelets(),
            &["haar", "db2", "db3", "db4", "sym4", "coif1", "coif2"]
        );
    }

    #[test]
    fn test_orthonormality() {
        // Scaling filters must have unit L2 norm, sum sqrt(2), and vanishing
        // autocorrelation at even shifts; the QMF high-pass must be orthogonal
        // to the low-pass at all even shifts. These are the conditions the
        // round-trip exactness rests on.
        for &name in list_wavelets() {
            let f = WaveletFilterSet::for_name(name).unwrap();
            let lo = f.dec_lo();
            let hi = f.dec_hi();
            let n = lo.len();

            let norm_sq: f64 = lo.iter().map(|v| v * v).sum();
            assert!(
                (norm_sq - 1.0).abs() < 1e-7,
                "{}: |dec_lo|^2 = {}, expected 1",
                name,
                norm_sq
            );

            let sum: f64 = lo.iter().sum();
            assert!(
                (sum - std::f64::consts::SQRT_2).abs() < 1e-7,
                "{}: sum(dec_lo) = {}, expected sqrt(2)",
                name,
                sum
            );

            for shift in (2..n).step_by(2) {
                let auto: f64 = (0..n - shift).map(|i| lo[i] * lo[i + shift]).sum();
                assert!(
                    auto.abs() < 1e-7,
                    "{}: autocorrelation at shift {} = {}",
                    name,
                    shift,
                    auto
                );
            }

            for shift in (0..n).step_by(2) {
                let fwd: f64 = (0..n - shift).map(|i| lo[i] * hi[i + shift]).sum();
                let rev: f64 = (0..n - shift).map(|i| lo[i + shift] * hi[i]).sum();
                assert!(
                    fwd.abs() < 1e-7 && rev.abs() < 1e-7,
                    "{}: lo/hi cross-correlation at shift {} = {}/{}",
                    name,
                    shift,
                    fwd,
                    rev
                );
            }
        }
    }

    #[test]
    fn test_reconstruction_filters_are_reversed() {
        let f = WaveletFilterSet::for_name("db4").unwrap();
        let reversed: Vec<f64> = f.dec_lo().iter().rev().copied().collect();
        assert_eq!(f.rec_lo(), reversed.as_slice());
        let reversed: Vec<f64> = f.dec_hi().iter().rev().copied().collect();
        assert_eq!(f.rec_hi(), reversed.as_slice());
    }

    #[test]
    fn test_invalid_filter_set_odd_length() {
        let err = WaveletFilterSet::from_scaling("bad", &[0.5, 0.5, 0.5]).unwrap_err();
        assert!(matches!(err, DenoiseError::InvalidFilterSet { .. }));
    }

    #[test]
    fn test_invalid_filter_set_empty() {
        let err = WaveletFilterSet::from_scaling("bad", &[]).unwrap_err();
        assert!(matches!(err, DenoiseError::InvalidFilterSet { .. }));
    }

    #[test]
    fn test_invalid_filter_set_non_finite() {
        let err = WaveletFilterSet::from_scaling("bad", &[f64::NAN, 0.5]).unwrap_err();
        assert!(matches!(err, DenoiseError::InvalidFilterSet { .. }));
    }

    #[test]
    fn test_mismatched_pair_lengths() {
        let err = WaveletFilterSet::new(
            "bad",
            vec![0.5, 0.5],
            vec![0.5, -0.5, 0.1, 0.1],
            vec![0.5, 0.5],
            vec![-0.5, 0.5],
        )
        .unwrap_err();
        assert!(matches!(err, DenoiseError::InvalidFilterSet { .. }));
    }
}
