//! Feature transform trait definition.

use polars::prelude::*;

use crate::{FeatureError, GroupedSeriesView};

/// A table with appended feature columns and the names of those columns.
pub type Augmented = (DataFrame, Vec<String>);

/// A feature-generating transformation over a grouped series table.
///
/// Implementations append columns and never add, drop or reorder rows.
/// Components that are pure functions of a row's own values (calendar,
/// Fourier) may ignore the view.
pub trait SeriesTransform: Send + Sync {
    /// Returns the name of this transformation.
    fn name(&self) -> &str;

    /// Columns that must be present in the input table.
    fn required_columns(&self) -> Vec<&str>;

    /// Apply the transformation.
    ///
    /// # Errors
    /// Returns `FeatureError` if a required column is missing, a parameter is
    /// invalid, or the underlying computation fails.
    fn apply(&self, df: DataFrame, view: &GroupedSeriesView) -> Result<Augmented, FeatureError>;

    /// Check required columns are present.
    ///
    /// # Errors
    /// Returns `FeatureError::MissingColumn` for the first absent column.
    fn check_columns(&self, df: &DataFrame) -> Result<(), FeatureError> {
        for name in self.required_columns() {
            if df.get_column_index(name).is_none() {
                return Err(FeatureError::MissingColumn(name.to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Passthrough;

    impl SeriesTransform for Passthrough {
        fn name(&self) -> &str {
            "passthrough"
        }

        fn required_columns(&self) -> Vec<&str> {
            vec!["id", "kwh"]
        }

        fn apply(&self, df: DataFrame, view: &GroupedSeriesView) -> Result<Augmented, FeatureError> {
            self.check_columns(&df)?;
            view.check_frame(&df)?;
            Ok((df, Vec::new()))
        }
    }

    #[test]
    fn default_column_check() {
        let df = df! { "id" => &["A"], "kwh" => &[1.0] }.unwrap();
        let view = GroupedSeriesView::by_position(&df, "id").unwrap();
        assert!(Passthrough.apply(df, &view).is_ok());

        let df = df! { "id" => &["A"] }.unwrap();
        let err = Passthrough.check_columns(&df).unwrap_err();
        assert!(matches!(err, FeatureError::MissingColumn(c) if c == "kwh"));
        assert_eq!(Passthrough.name(), "passthrough");
    }
}
