//! Fourier basis for cyclical values.

use std::f64::consts::TAU;

use crate::MathError;

/// Sine and cosine columns for one harmonic.
#[derive(Debug, Clone, PartialEq)]
pub struct FourierPair {
    /// Harmonic order, starting at 1.
    pub order: usize,
    /// `sin(2 pi k v / cycle)` per value.
    pub sin: Vec<Option<f64>>,
    /// `cos(2 pi k v / cycle)` per value.
    pub cos: Vec<Option<f64>>,
}

/// Encode cyclical values as sine/cosine pairs for harmonics `1..=n_terms`.
///
/// # Errors
/// Returns `MathError::InvalidCycle` if `cycle` is not positive and finite,
/// and `MathError::NoHarmonics` if `n_terms` is zero.
pub fn fourier_terms(
    values: &[Option<f64>],
    cycle: f64,
    n_terms: usize,
) -> Result<Vec<FourierPair>, MathError> {
    if !(cycle.is_finite() && cycle > 0.0) {
        return Err(MathError::InvalidCycle(cycle));
    }
    if n_terms == 0 {
        return Err(MathError::NoHarmonics);
    }

    let pairs = (1..=n_terms)
        .map(|order| {
            let scale = TAU * order as f64 / cycle;
            let (sin, cos): (Vec<_>, Vec<_>) = values
                .iter()
                .map(|v| v.map(|v| (scale * v).sin_cos()).unzip())
                .unzip();
            FourierPair { order, sin, cos }
        })
        .collect();

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn quarter_cycle() {
        let pairs = fourier_terms(&[Some(6.0)], 24.0, 1).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_relative_eq!(pairs[0].sin[0].unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(pairs[0].cos[0].unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn second_harmonic_doubles_frequency() {
        let pairs = fourier_terms(&[Some(6.0), Some(0.0)], 24.0, 2).unwrap();
        assert_eq!(pairs[1].order, 2);
        assert_relative_eq!(pairs[1].sin[0].unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(pairs[1].cos[0].unwrap(), -1.0, epsilon = 1e-12);
        assert_relative_eq!(pairs[1].cos[1].unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn missing_values_propagate() {
        let pairs = fourier_terms(&[None, Some(12.0)], 24.0, 1).unwrap();
        assert_eq!(pairs[0].sin[0], None);
        assert_eq!(pairs[0].cos[0], None);
        assert_relative_eq!(pairs[0].cos[1].unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn invalid_arguments() {
        assert_eq!(fourier_terms(&[Some(1.0)], 0.0, 1), Err(MathError::InvalidCycle(0.0)));
        assert_eq!(fourier_terms(&[Some(1.0)], 24.0, 0), Err(MathError::NoHarmonics));
        assert!(fourier_terms(&[Some(1.0)], f64::INFINITY, 1).is_err());
    }
}
