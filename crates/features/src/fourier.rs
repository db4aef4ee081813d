//! Fourier encoding of cyclical columns.

use gridlag_math::fourier_terms;
use gridlag_primitives::{FeatureName, NumericWidth};
use gridlag_traits::{Augmented, FeatureError, GroupedSeriesView, SeriesTransform, require_column};
use polars::prelude::*;
use rayon::prelude::*;
use tracing::debug;

use crate::columns::{append_features, float_feature};

/// One column to encode.
#[derive(Debug, Clone, PartialEq)]
pub struct FourierTerm {
    /// Cyclical source column, e.g. `timestamp_hour`.
    pub column: String,
    /// Cycle length: a value of `max_value` maps to the same angle as zero.
    pub max_value: f64,
    /// Number of harmonics.
    pub n_terms: usize,
}

impl FourierTerm {
    /// Create a term.
    #[must_use]
    pub fn new(column: impl Into<String>, max_value: f64, n_terms: usize) -> Self {
        Self { column: column.into(), max_value, n_terms }
    }
}

/// Configuration for Fourier encoding.
#[derive(Debug, Clone, Default)]
pub struct FourierConfig {
    /// Columns encoded by [`SeriesTransform::apply`].
    pub terms: Vec<FourierTerm>,
    /// Storage width of the generated columns.
    pub width: NumericWidth,
}

/// Sine/cosine basis for cyclical integer attributes such as hour or month.
#[derive(Debug, Clone, Default)]
pub struct FourierEncoder {
    config: FourierConfig,
}

impl FourierEncoder {
    /// Create an encoder with no configured terms.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an encoder with custom configuration.
    #[must_use]
    pub const fn with_config(config: FourierConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &FourierConfig {
        &self.config
    }

    /// Append `{column}_sin_{k}` and `{column}_cos_{k}` for `k = 1..=n_terms`.
    ///
    /// # Errors
    /// Returns `FeatureError::InvalidCycle` if `max_value` is not positive and
    /// finite or an observed value lies outside `[0, max_value]`, and
    /// `FeatureError::InvalidParameter` if `n_terms` is zero.
    pub fn encode_one(
        &self,
        df: DataFrame,
        column: &str,
        max_value: f64,
        n_terms: usize,
    ) -> Result<Augmented, FeatureError> {
        let features = self.term_columns(&df, column, max_value, n_terms)?;
        debug!(column, max_value, n_terms, "generated fourier features");
        append_features(df, features)
    }

    /// Encode several columns, pairing `columns[i]` with `max_values[i]`.
    ///
    /// # Errors
    /// Returns `FeatureError::InvalidParameter` if the slices differ in
    /// length, plus any error of [`Self::encode_one`].
    pub fn encode_many(
        &self,
        df: DataFrame,
        columns: &[&str],
        max_values: &[f64],
        n_terms: usize,
    ) -> Result<Augmented, FeatureError> {
        if columns.len() != max_values.len() {
            return Err(FeatureError::InvalidParameter(format!(
                "{} columns but {} max values",
                columns.len(),
                max_values.len()
            )));
        }
        let terms: Vec<FourierTerm> = columns
            .iter()
            .zip(max_values)
            .map(|(&column, &max_value)| FourierTerm::new(column, max_value, n_terms))
            .collect();
        self.encode_terms(df, &terms)
    }

    /// Encode every configured term.
    ///
    /// # Errors
    /// Returns the first error of [`Self::encode_one`] over the terms.
    pub fn encode(&self, df: DataFrame) -> Result<Augmented, FeatureError> {
        self.encode_terms(df, &self.config.terms)
    }

    fn encode_terms(&self, df: DataFrame, terms: &[FourierTerm]) -> Result<Augmented, FeatureError> {
        let per_term = terms
            .par_iter()
            .map(|t| self.term_columns(&df, &t.column, t.max_value, t.n_terms))
            .collect::<Result<Vec<_>, FeatureError>>()?;
        let features: Vec<Series> = per_term.into_iter().flatten().collect();

        debug!(n_columns = terms.len(), n_features = features.len(), "generated fourier features");
        append_features(df, features)
    }

    fn term_columns(
        &self,
        df: &DataFrame,
        column: &str,
        max_value: f64,
        n_terms: usize,
    ) -> Result<Vec<Series>, FeatureError> {
        if n_terms == 0 {
            return Err(FeatureError::InvalidParameter(format!(
                "n_terms for '{column}' must be positive"
            )));
        }
        let invalid = |reason: String| FeatureError::InvalidCycle { column: column.to_string(), reason };
        if !(max_value.is_finite() && max_value > 0.0) {
            return Err(invalid(format!("max_value {max_value} must be positive and finite")));
        }

        let cast = require_column(df, column)?.cast(&DataType::Float64)?;
        let values: Vec<Option<f64>> = cast.f64()?.into_iter().collect();
        if let Some(v) = values.iter().flatten().find(|&&v| !(0.0..=max_value).contains(&v)) {
            return Err(invalid(format!("observed value {v} outside [0, {max_value}]")));
        }

        let width = self.config.width;
        let mut features = Vec::with_capacity(2 * n_terms);
        for pair in fourier_terms(&values, max_value, n_terms)? {
            features.push(float_feature(FeatureName::fourier_sin(column, pair.order).as_str(), pair.sin, width)?);
            features.push(float_feature(FeatureName::fourier_cos(column, pair.order).as_str(), pair.cos, width)?);
        }
        Ok(features)
    }
}

impl SeriesTransform for FourierEncoder {
    fn name(&self) -> &str {
        "fourier"
    }

    fn required_columns(&self) -> Vec<&str> {
        self.config.terms.iter().map(|t| t.column.as_str()).collect()
    }

    fn apply(&self, df: DataFrame, view: &GroupedSeriesView) -> Result<Augmented, FeatureError> {
        view.check_frame(&df)?;
        self.encode(df)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;

    use super::*;

    fn hours() -> DataFrame {
        df! {
            "hour" => &[Some(0i64), Some(6), Some(12), None, Some(23)],
            "month" => &[1i64, 3, 6, 9, 12],
        }
        .unwrap()
    }

    fn column(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name).unwrap().cast(&DataType::Float64).unwrap().f64().unwrap().into_iter().collect()
    }

    #[test]
    fn six_oclock_is_a_quarter_turn() {
        let (out, names) = FourierEncoder::new().encode_one(hours(), "hour", 24.0, 2).unwrap();
        assert_eq!(names, vec!["hour_sin_1", "hour_cos_1", "hour_sin_2", "hour_cos_2"]);

        let (sin1, cos1) = (column(&out, "hour_sin_1"), column(&out, "hour_cos_1"));
        assert_relative_eq!(sin1[1].unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(cos1[1].unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(cos1[0].unwrap(), 1.0, epsilon = 1e-12);
        assert_eq!(sin1[3], None);

        // second harmonic at 6 o'clock is half a turn
        assert_relative_eq!(column(&out, "hour_cos_2")[1].unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn many_columns_in_order() {
        let (out, names) =
            FourierEncoder::new().encode_many(hours(), &["month", "hour"], &[12.0, 24.0], 1).unwrap();
        assert_eq!(names, vec!["month_sin_1", "month_cos_1", "hour_sin_1", "hour_cos_1"]);
        assert_relative_eq!(column(&out, "month_cos_1")[4].unwrap(), 1.0, epsilon = 1e-12);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-24.0)]
    #[case(f64::INFINITY)]
    #[case(20.0)]
    fn unusable_cycle(#[case] max_value: f64) {
        let err = FourierEncoder::new().encode_one(hours(), "hour", max_value, 1).unwrap_err();
        assert!(matches!(err, FeatureError::InvalidCycle { ref column, .. } if column == "hour"));
    }

    #[test]
    fn negative_observation_is_invalid_cycle() {
        let df = df! { "offset" => &[-1.0, 2.0] }.unwrap();
        let err = FourierEncoder::new().encode_one(df, "offset", 4.0, 1).unwrap_err();
        assert!(matches!(err, FeatureError::InvalidCycle { .. }));
    }

    #[test]
    fn parameter_errors() {
        let encoder = FourierEncoder::new();
        assert!(matches!(
            encoder.encode_one(hours(), "hour", 24.0, 0),
            Err(FeatureError::InvalidParameter(_))
        ));
        assert!(matches!(
            encoder.encode_many(hours(), &["hour", "month"], &[24.0], 1),
            Err(FeatureError::InvalidParameter(_))
        ));
    }

    #[test]
    fn configured_terms_narrow() {
        let encoder = FourierEncoder::with_config(FourierConfig {
            terms: vec![FourierTerm::new("month", 12.0, 1)],
            width: NumericWidth::Bits32,
        });
        let (out, names) = encoder.encode(hours()).unwrap();
        assert_eq!(encoder.required_columns(), vec!["month"]);
        assert_eq!(out.column(&names[0]).unwrap().dtype(), &DataType::Float32);
    }
}
