//! Positional shifting.

/// Shift a series forward by `periods` positions.
///
/// Position `p` of the result holds `values[p - periods]`; the first
/// `periods` positions are `None`.
#[must_use]
pub fn shift(values: &[Option<f64>], periods: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let lead = periods.min(n);
    let mut out = vec![None; lead];
    out.extend_from_slice(&values[..n - lead]);
    out
}
