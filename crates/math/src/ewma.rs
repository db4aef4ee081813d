//! Exponentially weighted moving average.

use crate::{MathError, finite_values, shift};

/// Exponentially weighted moving average of the shifted series.
///
/// Uses the recursion without bias adjustment,
/// `y[r] = alpha * x[r] + (1 - alpha) * y[r - 1]`, seeded with the first
/// non-missing shifted value. Non-finite inputs count as missing. Positions
/// before the seed are `None`. A missing
/// value after the seed repeats the previous average, and the old average
/// keeps decaying across the gap so that the next observation is weighted
/// against `(1 - alpha)^gap`.
///
/// # Errors
/// Returns `MathError::InvalidAlpha` if `alpha` is not in (0, 1].
pub fn ewma(
    values: &[Option<f64>],
    alpha: f64,
    shift_by: usize,
) -> Result<Vec<Option<f64>>, MathError> {
    if !(alpha > 0.0 && alpha <= 1.0) {
        return Err(MathError::InvalidAlpha(alpha));
    }

    let decay = 1.0 - alpha;
    let mut out = Vec::with_capacity(values.len());
    let mut average: Option<f64> = None;
    let mut old_weight = 1.0;

    for value in shift(&finite_values(values), shift_by) {
        match (average, value) {
            (None, Some(x)) => {
                average = Some(x);
                old_weight = 1.0;
            }
            (Some(prev), Some(x)) => {
                old_weight *= decay;
                average = Some((old_weight * prev + alpha * x) / (old_weight + alpha));
                old_weight = 1.0;
            }
            (Some(_), None) => old_weight *= decay,
            (None, None) => {}
        }
        out.push(average);
    }

    Ok(out)
}
