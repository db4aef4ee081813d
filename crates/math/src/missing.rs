//! Missing-value normalisation.

/// Treat NaN and infinite observations as missing.
///
/// Every kernel keeps running state across a series; a non-finite value
/// admitted into that state would leak into every later result.
#[must_use]
pub fn finite_values(values: &[Option<f64>]) -> Vec<Option<f64>> {
    values.iter().map(|v| v.filter(|x| x.is_finite())).collect()
}
