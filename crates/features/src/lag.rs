//! Lag embedding.

use gridlag_primitives::{FeatureName, NumericWidth};
use gridlag_traits::{Augmented, FeatureError, GroupedSeriesView, SeriesTransform, require_column};
use gridlag_utils::narrow_numeric;
use polars::prelude::*;
use rayon::prelude::*;
use tracing::debug;

use crate::columns::{append_features, positive_params};

/// Configuration for lag embedding.
#[derive(Debug, Clone)]
pub struct LagConfig {
    /// Source column.
    pub column: String,
    /// Lag offsets in rows (half-hours for half-hourly data).
    pub lags: Vec<usize>,
    /// Storage width of the generated columns.
    pub width: NumericWidth,
}

impl Default for LagConfig {
    fn default() -> Self {
        Self {
            column: "energy".to_string(),
            lags: vec![1, 2, 3, 48, 336], // half-hour, hour, day, week
            width: NumericWidth::Native,
        }
    }
}

/// Shifted copies of a column within each series.
///
/// `{column}_lag_{L}` holds the value from `L` positions earlier in the same
/// series; the first `L` rows of every series are null. Any column type can be
/// lagged; only numeric columns are narrowed.
#[derive(Debug, Clone)]
pub struct LagEmbedder {
    config: LagConfig,
}

impl LagEmbedder {
    /// Create a new lag embedder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LagConfig::default())
    }

    /// Create a lag embedder with custom configuration.
    #[must_use]
    pub const fn with_config(config: LagConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &LagConfig {
        &self.config
    }

    /// Append one lagged column per configured lag.
    ///
    /// # Errors
    /// Returns `FeatureError::MissingColumn` if the source column is absent and
    /// `FeatureError::InvalidParameter` for a zero lag.
    pub fn embed(&self, df: DataFrame, view: &GroupedSeriesView) -> Result<Augmented, FeatureError> {
        view.check_frame(&df)?;
        let column = self.config.column.as_str();
        let lags = positive_params(&self.config.lags, "lags")?;
        let source = require_column(&df, column)?.as_materialized_series().clone();

        let features = lags
            .par_iter()
            .map(|&lag| {
                let name = FeatureName::lag(column, lag);
                let lagged = source.take(&view.lag_indices(lag))?.with_name(name.as_str().into());
                Ok(narrow_numeric(lagged, self.config.width)?)
            })
            .collect::<Result<Vec<Series>, FeatureError>>()?;

        debug!(column, lags = ?lags, "generated lag features");
        append_features(df, features)
    }
}

impl Default for LagEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesTransform for LagEmbedder {
    fn name(&self) -> &str {
        "lag"
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![self.config.column.as_str()]
    }

    fn apply(&self, df: DataFrame, view: &GroupedSeriesView) -> Result<Augmented, FeatureError> {
        self.embed(df, view)
    }
}
