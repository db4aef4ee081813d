//! Seasonal (strided) rolling-window statistics.

use gridlag_math::seasonal_rolling;
use gridlag_primitives::{AggKind, FeatureName, NumericWidth};
use gridlag_traits::{Augmented, FeatureError, GroupedSeriesView, SeriesTransform};
use polars::prelude::*;
use rayon::prelude::*;
use tracing::debug;

use crate::columns::{append_features, float_feature, positive_params, unique_in_order};

/// Configuration for seasonal rolling aggregation.
#[derive(Debug, Clone)]
pub struct SeasonalRollingConfig {
    /// Source column.
    pub column: String,
    /// Seasonal periods in rows (48 = daily, 336 = weekly for half-hourly data).
    pub periods: Vec<usize>,
    /// Number of same-phase observations per window.
    pub windows: Vec<usize>,
    /// Statistics computed for every (period, window).
    pub kinds: Vec<AggKind>,
    /// Seasons excluded at the end of each window.
    pub shift: usize,
    /// Storage width of the generated columns.
    pub width: NumericWidth,
}

impl Default for SeasonalRollingConfig {
    fn default() -> Self {
        Self {
            column: "energy".to_string(),
            periods: vec![48, 336],
            windows: vec![3],
            kinds: vec![AggKind::Mean, AggKind::Std],
            shift: 1,
            width: NumericWidth::Native,
        }
    }
}

/// Rolling statistics over observations one season apart.
///
/// `{column}_{S}_seasonal_rolling_{W}_{K}` at position `p` aggregates positions
/// `p - shift*S - j*S` for `j = 0..W` of the same series: "mean of the last
/// three Mondays at 18:30" for a weekly period.
#[derive(Debug, Clone)]
pub struct SeasonalRollingAggregator {
    config: SeasonalRollingConfig,
}

impl SeasonalRollingAggregator {
    /// Create a new aggregator with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SeasonalRollingConfig::default())
    }

    /// Create an aggregator with custom configuration.
    #[must_use]
    pub const fn with_config(config: SeasonalRollingConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &SeasonalRollingConfig {
        &self.config
    }

    /// Append one column per (period, window, kind) combination.
    ///
    /// # Errors
    /// Returns `FeatureError::MissingColumn` if the source column is absent and
    /// `FeatureError::InvalidParameter` for a zero period or window, or an
    /// empty kind list.
    pub fn aggregate(
        &self,
        df: DataFrame,
        view: &GroupedSeriesView,
    ) -> Result<Augmented, FeatureError> {
        let SeasonalRollingConfig { column, shift, width, .. } = &self.config;
        let periods = positive_params(&self.config.periods, "seasonal periods")?;
        let windows = positive_params(&self.config.windows, "seasonal windows")?;
        let kinds = unique_in_order(&self.config.kinds);
        if kinds.is_empty() {
            return Err(FeatureError::InvalidParameter("no seasonal kinds given".to_string()));
        }
        let values = view.values_f64(&df, column)?;

        let mut combos = Vec::with_capacity(periods.len() * windows.len() * kinds.len());
        for &period in &periods {
            for &window in &windows {
                combos.extend(kinds.iter().map(|&kind| (period, window, kind)));
            }
        }

        let features = combos
            .par_iter()
            .map(|&(period, window, kind)| {
                let rolled = view
                    .map_series(&values, |s| seasonal_rolling(s, period, window, *shift, kind))?;
                let name = FeatureName::seasonal_rolling(column, period, window, kind);
                float_feature(name.as_str(), rolled, *width)
            })
            .collect::<Result<Vec<Series>, FeatureError>>()?;

        debug!(
            column = column.as_str(),
            periods = ?periods,
            windows = ?windows,
            n_features = features.len(),
            "generated seasonal rolling features"
        );
        append_features(df, features)
    }
}

impl Default for SeasonalRollingAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesTransform for SeasonalRollingAggregator {
    fn name(&self) -> &str {
        "seasonal_rolling"
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![self.config.column.as_str()]
    }

    fn apply(&self, df: DataFrame, view: &GroupedSeriesView) -> Result<Augmented, FeatureError> {
        self.aggregate(df, view)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::testing::{f64_column, households, view, with_energy_at};

    fn aggregator(periods: Vec<usize>, windows: Vec<usize>, kinds: Vec<AggKind>) -> SeasonalRollingAggregator {
        SeasonalRollingAggregator::with_config(SeasonalRollingConfig {
            column: "energy".to_string(),
            periods,
            windows,
            kinds,
            shift: 1,
            width: NumericWidth::Native,
        })
    }

    #[test]
    fn every_other_reading_worked_example() {
        let df = households();
        let view = view(&df);
        let (out, names) =
            aggregator(vec![2], vec![2], vec![AggKind::Mean]).aggregate(df, &view).unwrap();
        assert_eq!(names, vec!["energy_2_seasonal_rolling_2_mean"]);

        // series A is 1..=8: position 5 averages positions 3 and 1
        let mean = f64_column(&out, &names[0]);
        assert_eq!(&mean[..4], &[None, None, None, None]);
        assert_relative_eq!(mean[4].unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(mean[5].unwrap(), 3.0, epsilon = 1e-12);
        assert_relative_eq!(mean[7].unwrap(), 5.0, epsilon = 1e-12);

        // series B (10..=50) restarts its history
        assert_eq!(&mean[8..12], &[None, None, None, None]);
        assert_relative_eq!(mean[12].unwrap(), 20.0, epsilon = 1e-12);
    }

    #[test]
    fn combinations_ordered_by_period_window_kind() {
        let df = households();
        let view = view(&df);
        let (out, names) = aggregator(vec![3, 2], vec![1], vec![AggKind::Max, AggKind::Min])
            .aggregate(df, &view)
            .unwrap();
        assert_eq!(
            names,
            vec![
                "energy_2_seasonal_rolling_1_max",
                "energy_2_seasonal_rolling_1_min",
                "energy_3_seasonal_rolling_1_max",
                "energy_3_seasonal_rolling_1_min",
            ]
        );
        // a one-wide seasonal window is the value one season back
        assert_eq!(f64_column(&out, "energy_3_seasonal_rolling_1_max")[6], Some(4.0));
    }

    #[test]
    fn series_shorter_than_period_is_all_null() {
        let df = households();
        let view = view(&df);
        let (out, names) =
            aggregator(vec![6], vec![1], vec![AggKind::Mean]).aggregate(df, &view).unwrap();
        let values = f64_column(&out, &names[0]);
        assert_eq!(values[6], Some(1.0));
        assert!(values[8..].iter().all(Option::is_none));
    }

    #[test]
    fn later_rows_do_not_leak_backwards() {
        let df = households();
        let view = view(&df);
        let agg = aggregator(vec![2, 3], vec![1, 2], vec![AggKind::Mean, AggKind::Std, AggKind::Max]);
        let (before, names) = agg.aggregate(df.clone(), &view).unwrap();
        let (after, _) = agg.aggregate(with_energy_at(&df, 5, 1e6), &view).unwrap();

        for name in &names {
            let (b, a) = (f64_column(&before, name), f64_column(&after, name));
            assert_eq!(&b[..=5], &a[..=5], "{name}");
            assert_eq!(&b[8..], &a[8..], "{name}");
        }
        // row 7 is one season of two after row 5
        assert_ne!(
            f64_column(&before, "energy_2_seasonal_rolling_1_max")[7],
            f64_column(&after, "energy_2_seasonal_rolling_1_max")[7]
        );
    }

    #[test]
    fn zero_period_rejected() {
        let df = households();
        let view = view(&df);
        let err = aggregator(vec![0], vec![2], vec![AggKind::Mean]).aggregate(df, &view).unwrap_err();
        assert!(matches!(err, FeatureError::InvalidParameter(_)));
    }
}
