//! Strided (seasonal) rolling aggregation.

use gridlag_primitives::AggKind;

use crate::{MathError, rolling};

/// Rolling aggregation over same-phase observations.
///
/// Position `p` of the result aggregates the `window` values at positions
/// `p - shift*period - j*period` for `j in 0..window`. The series is split into
/// `period` phase subsequences (position mod `period`); a contiguous rolling
/// pass with the same `shift` runs over each phase, so the whole computation is
/// linear in the series length.
///
/// # Errors
/// Returns `MathError::InvalidPeriod` for a zero period and
/// `MathError::InvalidWindow` for a zero window.
pub fn seasonal_rolling(
    values: &[Option<f64>],
    period: usize,
    window: usize,
    shift_by: usize,
    kind: AggKind,
) -> Result<Vec<Option<f64>>, MathError> {
    if period == 0 {
        return Err(MathError::InvalidPeriod(period));
    }
    if window == 0 {
        return Err(MathError::InvalidWindow(window));
    }

    let mut out = vec![None; values.len()];
    for phase in 0..period.min(values.len()) {
        let phase_values: Vec<Option<f64>> =
            values.iter().skip(phase).step_by(period).copied().collect();
        let rolled = rolling(&phase_values, window, shift_by, kind)?;
        for (j, value) in rolled.into_iter().enumerate() {
            out[phase + j * period] = value;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;

    use super::*;

    fn series(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn same_phase_members() {
        let values = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let out = seasonal_rolling(&values, 2, 2, 1, AggKind::Mean).unwrap();
        // position 5 draws from positions 3 and 1
        assert_relative_eq!(out[5].unwrap(), 3.0);
        assert_eq!(&out[..4], &[None, None, None, None]);
        assert_relative_eq!(out[4].unwrap(), 2.0);
        assert_relative_eq!(out[7].unwrap(), 5.0);
    }

    #[rstest]
    #[case(3, 2, 1, AggKind::Max)]
    #[case(4, 3, 1, AggKind::Min)]
    #[case(2, 3, 2, AggKind::Std)]
    #[case(5, 1, 1, AggKind::Mean)]
    fn matches_strided_rescan(
        #[case] period: usize,
        #[case] window: usize,
        #[case] shift_by: usize,
        #[case] kind: AggKind,
    ) {
        let values: Vec<Option<f64>> =
            (0..40).map(|i| Some(((i * 7919) % 31) as f64 * 0.25)).collect();
        let fast = seasonal_rolling(&values, period, window, shift_by, kind).unwrap();

        for (p, got) in fast.iter().enumerate() {
            let members: Option<Vec<f64>> = (0..window)
                .map(|j| {
                    let back = shift_by * period + j * period;
                    p.checked_sub(back).and_then(|idx| values[idx])
                })
                .collect();
            let expected = members.and_then(|m| {
                let n = m.len() as f64;
                match kind {
                    AggKind::Mean => Some(m.iter().sum::<f64>() / n),
                    AggKind::Std if m.len() < 2 => None,
                    AggKind::Std => {
                        let mean = m.iter().sum::<f64>() / n;
                        Some((m.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt())
                    }
                    AggKind::Min => m.iter().copied().reduce(f64::min),
                    AggKind::Max => m.iter().copied().reduce(f64::max),
                }
            });
            match (got, expected) {
                (Some(g), Some(e)) => assert_relative_eq!(*g, e, epsilon = 1e-9),
                (None, None) => {}
                other => panic!("position {p}: {other:?}"),
            }
        }
    }

    #[test]
    fn period_longer_than_series() {
        let values = series(&[1.0, 2.0, 3.0]);
        let out = seasonal_rolling(&values, 48, 2, 1, AggKind::Mean).unwrap();
        assert_eq!(out, vec![None, None, None]);
    }

    #[test]
    fn zero_parameters_error() {
        let values = series(&[1.0]);
        assert_eq!(
            seasonal_rolling(&values, 0, 2, 1, AggKind::Mean),
            Err(MathError::InvalidPeriod(0))
        );
        assert_eq!(
            seasonal_rolling(&values, 2, 0, 1, AggKind::Mean),
            Err(MathError::InvalidWindow(0))
        );
    }
}
