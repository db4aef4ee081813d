//! Trailing contiguous-window aggregation.

use std::collections::VecDeque;

use gridlag_primitives::AggKind;

use crate::{MathError, finite_values, shift};

/// A trailing-window reduction: result `i` covers positions `[i - window + 1, i]`.
type TrailingKernel = fn(&[Option<f64>], usize) -> Vec<Option<f64>>;

const fn trailing_kernel(kind: AggKind) -> TrailingKernel {
    match kind {
        AggKind::Mean => trailing_mean,
        AggKind::Std => trailing_std,
        AggKind::Min => trailing_min,
        AggKind::Max => trailing_max,
    }
}

/// Rolling aggregation over a contiguous trailing window.
///
/// Position `p` of the result aggregates `values[p - shift - window + 1 ..= p - shift]`.
/// A result is `None` when any member of the window is missing, non-finite, or
/// lies before the start of the series. Runs in linear time regardless of
/// window length.
///
/// # Errors
/// Returns `MathError::InvalidWindow` if `window` is zero.
pub fn rolling(
    values: &[Option<f64>],
    window: usize,
    shift_by: usize,
    kind: AggKind,
) -> Result<Vec<Option<f64>>, MathError> {
    if window == 0 {
        return Err(MathError::InvalidWindow(window));
    }
    let trailing = trailing_kernel(kind)(&finite_values(values), window);
    Ok(shift(&trailing, shift_by))
}

fn trailing_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    trailing_moments(values, window, |m| Some(m.pivot + m.sum / m.n))
}

fn trailing_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    trailing_moments(values, window, |m| {
        if m.n < AggKind::Std.min_count() as f64 {
            return None;
        }
        let var = (m.sum_sq - m.sum * m.sum / m.n) / (m.n - 1.0);
        if var.is_nan() {
            return None;
        }
        Some(var.max(0.0).sqrt())
    })
}

/// Centred window moments handed to a finishing function.
#[derive(Debug, Clone, Copy)]
struct Moments {
    /// Value subtracted from every observation before accumulating.
    pivot: f64,
    /// Sum of centred values.
    sum: f64,
    /// Sum of squared centred values.
    sum_sq: f64,
    /// Window length.
    n: f64,
}

/// Sliding first and second moments.
///
/// Observations are centred on a pivot, initially the first value of the
/// series. Once per window the sums are recomputed from the window members
/// and the pivot moves to the oldest of them, so rounding error from the
/// add/subtract updates never outlives one window and a level change in the
/// series does not degrade later variances.
fn trailing_moments(
    values: &[Option<f64>],
    window: usize,
    finish: impl Fn(Moments) -> Option<f64>,
) -> Vec<Option<f64>> {
    let pivot = values.iter().flatten().next().copied().unwrap_or(0.0);
    let mut acc = Moments { pivot, sum: 0.0, sum_sq: 0.0, n: window as f64 };
    let mut out = Vec::with_capacity(values.len());
    let mut missing = 0usize;

    for (i, value) in values.iter().enumerate() {
        match value {
            Some(x) => {
                let d = x - acc.pivot;
                acc.sum += d;
                acc.sum_sq += d * d;
            }
            None => missing += 1,
        }
        if i >= window {
            match values[i - window] {
                Some(x) => {
                    let d = x - acc.pivot;
                    acc.sum -= d;
                    acc.sum_sq -= d * d;
                }
                None => missing -= 1,
            }
        }
        if (i + 1) % window == 0 {
            acc.resum(&values[i + 1 - window..=i]);
        }

        let full = i + 1 >= window && missing == 0;
        out.push(if full { finish(acc) } else { None });
    }

    out
}

impl Moments {
    /// Recompute the sums over `members`, re-centred on the oldest present one.
    fn resum(&mut self, members: &[Option<f64>]) {
        if let Some(&first) = members.iter().flatten().next() {
            self.pivot = first;
        }
        let (sum, sum_sq) = members.iter().flatten().fold((0.0, 0.0), |(s, q), x| {
            let d = x - self.pivot;
            (s + d, q + d * d)
        });
        self.sum = sum;
        self.sum_sq = sum_sq;
    }
}

fn trailing_min(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    trailing_extreme(values, window, |kept, incoming| kept < incoming)
}

fn trailing_max(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    trailing_extreme(values, window, |kept, incoming| kept > incoming)
}

/// Sliding extreme with a monotonic deque of positions.
///
/// `keeps(a, b)` is true when an older value `a` still dominates a newer
/// value `b`; dominated entries are dropped from the back.
fn trailing_extreme(
    values: &[Option<f64>],
    window: usize,
    keeps: impl Fn(f64, f64) -> bool,
) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    let mut deque: VecDeque<(usize, f64)> = VecDeque::with_capacity(window);
    let mut missing = 0usize;

    for (i, value) in values.iter().enumerate() {
        match *value {
            Some(x) => {
                while deque.back().is_some_and(|&(_, kept)| !keeps(kept, x)) {
                    deque.pop_back();
                }
                deque.push_back((i, x));
            }
            None => missing += 1,
        }
        if i >= window && values[i - window].is_none() {
            missing -= 1;
        }
        while deque.front().is_some_and(|&(pos, _)| pos + window <= i) {
            deque.pop_front();
        }

        let full = i + 1 >= window && missing == 0;
        out.push(if full { deque.front().map(|&(_, x)| x) } else { None });
    }

    out
}
