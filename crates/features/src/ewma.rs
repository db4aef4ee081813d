//! Exponentially weighted moving averages.

use gridlag_math::ewma;
use gridlag_primitives::{DecaySpec, FeatureName, NumericWidth};
use gridlag_traits::{Augmented, FeatureError, GroupedSeriesView, SeriesTransform};
use polars::prelude::*;
use rayon::prelude::*;
use tracing::debug;

use crate::columns::{append_features, float_feature};

/// Configuration for EWMA embedding.
#[derive(Debug, Clone)]
pub struct EwmaConfig {
    /// Source column.
    pub column: String,
    /// Decay factors or spans.
    pub decay: DecaySpec,
    /// Rows excluded before smoothing; 1 keeps the current value out.
    pub shift: usize,
    /// Storage width of the generated columns.
    pub width: NumericWidth,
}

impl Default for EwmaConfig {
    fn default() -> Self {
        Self {
            column: "energy".to_string(),
            decay: DecaySpec::Span(vec![48.0, 336.0]),
            shift: 1,
            width: NumericWidth::Native,
        }
    }
}

/// Per-series exponentially weighted moving averages of a shifted column.
#[derive(Debug, Clone)]
pub struct EwmaEmbedder {
    config: EwmaConfig,
}

impl EwmaEmbedder {
    /// Create a new embedder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EwmaConfig::default())
    }

    /// Create an embedder with custom configuration.
    #[must_use]
    pub const fn with_config(config: EwmaConfig) -> Self {
        Self { config }
    }

    /// Build an embedder from optional alpha and span sets.
    ///
    /// # Errors
    /// Returns `FeatureError::ConflictingParameter` unless exactly one of
    /// `alphas` and `spans` is given, and `FeatureError::InvalidParameter` for
    /// an out-of-range value.
    pub fn from_options(
        column: impl Into<String>,
        alphas: Option<Vec<f64>>,
        spans: Option<Vec<f64>>,
        shift: usize,
        width: NumericWidth,
    ) -> Result<Self, FeatureError> {
        let decay = DecaySpec::from_options(alphas, spans)?;
        Ok(Self::with_config(EwmaConfig { column: column.into(), decay, shift, width }))
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &EwmaConfig {
        &self.config
    }

    /// Append one column per decay parameter, in configuration order.
    ///
    /// # Errors
    /// Returns `FeatureError::MissingColumn` if the source column is absent and
    /// `FeatureError::InvalidParameter` for an out-of-range alpha or span.
    pub fn embed(&self, df: DataFrame, view: &GroupedSeriesView) -> Result<Augmented, FeatureError> {
        let EwmaConfig { column, decay, shift, width } = &self.config;
        decay.validate()?;
        let values = view.values_f64(&df, column)?;
        let label = decay.label();

        let features = decay
            .params()
            .par_iter()
            .map(|&(param, alpha)| {
                let smoothed = view.map_series(&values, |s| ewma(s, alpha, *shift))?;
                float_feature(FeatureName::ewma(column, label, param).as_str(), smoothed, *width)
            })
            .collect::<Result<Vec<Series>, FeatureError>>()?;

        debug!(column = column.as_str(), label, n_features = features.len(), "generated ewma features");
        append_features(df, features)
    }
}

impl Default for EwmaEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesTransform for EwmaEmbedder {
    fn name(&self) -> &str {
        "ewma"
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![self.config.column.as_str()]
    }

    fn apply(&self, df: DataFrame, view: &GroupedSeriesView) -> Result<Augmented, FeatureError> {
        self.embed(df, view)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;

    use super::*;
    use crate::testing::{f64_column, households, view, with_energy_at};

    fn alphas(values: Vec<f64>) -> EwmaEmbedder {
        EwmaEmbedder::from_options("energy", Some(values), None, 1, NumericWidth::Native).unwrap()
    }

    #[test]
    fn half_decay_worked_example() {
        let df = households();
        let view = view(&df);
        let (out, names) = alphas(vec![0.5]).embed(df, &view).unwrap();
        assert_eq!(names, vec!["energy_ewma_alpha_0.5"]);

        // series B starts at row 8 with 10, 20, 30
        let smoothed = f64_column(&out, &names[0]);
        assert_eq!(smoothed[8], None);
        assert_relative_eq!(smoothed[9].unwrap(), 10.0, epsilon = 1e-12);
        assert_relative_eq!(smoothed[10].unwrap(), 15.0, epsilon = 1e-12);
        assert_relative_eq!(smoothed[11].unwrap(), 22.5, epsilon = 1e-12);
        assert_eq!(smoothed[0], None);
    }

    #[test]
    fn span_matches_equivalent_alpha() {
        let df = households();
        let view = view(&df);
        let by_span = EwmaEmbedder::from_options("energy", None, Some(vec![3.0]), 1, NumericWidth::Native)
            .unwrap();
        let (span_out, span_names) = by_span.embed(df.clone(), &view).unwrap();
        let (alpha_out, alpha_names) = alphas(vec![0.5]).embed(df, &view).unwrap();

        assert_eq!(span_names, vec!["energy_ewma_span_3"]);
        assert_eq!(
            f64_column(&span_out, &span_names[0]),
            f64_column(&alpha_out, &alpha_names[0])
        );
    }

    #[test]
    fn configuration_order_is_kept() {
        let df = households();
        let view = view(&df);
        let (_, names) = alphas(vec![0.9, 0.1]).embed(df, &view).unwrap();
        assert_eq!(names, vec!["energy_ewma_alpha_0.9", "energy_ewma_alpha_0.1"]);
    }

    #[test]
    fn later_rows_do_not_leak_backwards() {
        let df = households();
        let view = view(&df);
        let embedder = alphas(vec![0.5, 0.05]);
        let (before, names) = embedder.embed(df.clone(), &view).unwrap();
        let (after, _) = embedder.embed(with_energy_at(&df, 5, 1e6), &view).unwrap();

        for name in &names {
            let (b, a) = (f64_column(&before, name), f64_column(&after, name));
            assert_eq!(&b[..=5], &a[..=5], "{name}");
            assert_eq!(&b[8..], &a[8..], "{name}");
            assert_ne!(b[6], a[6], "{name}");
        }
    }

    #[rstest]
    #[case(Some(vec![0.5]), Some(vec![3.0]))]
    #[case(None, None)]
    fn both_or_neither_conflict(#[case] a: Option<Vec<f64>>, #[case] s: Option<Vec<f64>>) {
        let err = EwmaEmbedder::from_options("energy", a, s, 1, NumericWidth::Native).unwrap_err();
        assert!(matches!(err, FeatureError::ConflictingParameter(_)));
    }

    #[test]
    fn out_of_range_alpha_in_config() {
        let df = households();
        let view = view(&df);
        let embedder = EwmaEmbedder::with_config(EwmaConfig {
            decay: DecaySpec::Alpha(vec![1.5]),
            ..Default::default()
        });
        let err = embedder.embed(df, &view).unwrap_err();
        assert!(matches!(err, FeatureError::InvalidParameter(_)));
    }

    #[test]
    fn downcast_to_float32() {
        let df = households();
        let view = view(&df);
        let embedder =
            EwmaEmbedder::from_options("energy", Some(vec![0.3]), None, 1, NumericWidth::Bits32)
                .unwrap();
        let (out, names) = embedder.embed(df, &view).unwrap();
        assert_eq!(out.column(&names[0]).unwrap().dtype(), &DataType::Float32);
    }
}
