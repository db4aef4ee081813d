//! Trailing rolling-window statistics.

use gridlag_math::rolling;
use gridlag_primitives::{AggKind, FeatureName, NumericWidth};
use gridlag_traits::{Augmented, FeatureError, GroupedSeriesView, SeriesTransform};
use polars::prelude::*;
use rayon::prelude::*;
use tracing::debug;

use crate::columns::{append_features, float_feature, positive_params, unique_in_order};

/// Configuration for rolling-window aggregation.
#[derive(Debug, Clone)]
pub struct RollingConfig {
    /// Source column.
    pub column: String,
    /// Window lengths in rows.
    pub windows: Vec<usize>,
    /// Statistics computed for every window.
    pub kinds: Vec<AggKind>,
    /// Rows excluded at the end of each window; 1 keeps the current value out.
    pub shift: usize,
    /// Storage width of the generated columns.
    pub width: NumericWidth,
}

impl Default for RollingConfig {
    fn default() -> Self {
        Self {
            column: "energy".to_string(),
            windows: vec![3, 6, 12, 48],
            kinds: vec![AggKind::Mean, AggKind::Std],
            shift: 1,
            width: NumericWidth::Native,
        }
    }
}

/// Rolling mean, standard deviation, minimum and maximum over trailing windows.
///
/// `{column}_rolling_{W}_{K}` at position `p` aggregates positions
/// `[p - shift - W + 1, p - shift]` of the same series, and is null whenever
/// any of those positions is missing.
#[derive(Debug, Clone)]
pub struct RollingAggregator {
    config: RollingConfig,
}

impl RollingAggregator {
    /// Create a new aggregator with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RollingConfig::default())
    }

    /// Create an aggregator with custom configuration.
    #[must_use]
    pub const fn with_config(config: RollingConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &RollingConfig {
        &self.config
    }

    /// Append one column per (window, kind) combination.
    ///
    /// Columns are ordered by window, then by kind in configuration order.
    ///
    /// # Errors
    /// Returns `FeatureError::MissingColumn` if the source column is absent and
    /// `FeatureError::InvalidParameter` for a zero window or an empty kind list.
    pub fn aggregate(
        &self,
        df: DataFrame,
        view: &GroupedSeriesView,
    ) -> Result<Augmented, FeatureError> {
        let RollingConfig { column, shift, width, .. } = &self.config;
        let windows = positive_params(&self.config.windows, "rolling windows")?;
        let kinds = unique_in_order(&self.config.kinds);
        if kinds.is_empty() {
            return Err(FeatureError::InvalidParameter("no rolling kinds given".to_string()));
        }
        let values = view.values_f64(&df, column)?;

        let combos: Vec<(usize, AggKind)> =
            windows.iter().flat_map(|&w| kinds.iter().map(move |&k| (w, k))).collect();
        let features = combos
            .par_iter()
            .map(|&(window, kind)| {
                let rolled = view.map_series(&values, |s| rolling(s, window, *shift, kind))?;
                float_feature(FeatureName::rolling(column, window, kind).as_str(), rolled, *width)
            })
            .collect::<Result<Vec<Series>, FeatureError>>()?;

        debug!(column = column.as_str(), windows = ?windows, n_features = features.len(), "generated rolling features");
        append_features(df, features)
    }
}

impl Default for RollingAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesTransform for RollingAggregator {
    fn name(&self) -> &str {
        "rolling"
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![self.config.column.as_str()]
    }

    fn apply(&self, df: DataFrame, view: &GroupedSeriesView) -> Result<Augmented, FeatureError> {
        self.aggregate(df, view)
    }
}
