//! Read-only grouped view over a series table.

use std::collections::HashMap;

use gridlag_primitives::SeriesId;
use polars::prelude::*;

use crate::{FeatureError, epoch_millis};

/// Rows of one series, in table (and therefore time) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesGroup {
    /// Series identifier.
    pub id: SeriesId,
    /// Row indices into the table, ascending.
    pub rows: Vec<IdxSize>,
}

impl SeriesGroup {
    /// Number of observations in the series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the series has no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Partition map from series id to ordered row indices.
///
/// Built once over a table sorted by (series id, timestamp) and shared by
/// every feature component. The view never reorders the table: components
/// gather a series' values through it, compute, and scatter results back to
/// the original row positions.
#[derive(Debug, Clone)]
pub struct GroupedSeriesView {
    series_column: String,
    height: usize,
    groups: Vec<SeriesGroup>,
}

/// Look up a column, mapping absence to `FeatureError::MissingColumn`.
///
/// # Errors
/// Returns `FeatureError::MissingColumn` if `name` is not in `df`.
pub fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, FeatureError> {
    df.column(name).map_err(|_| FeatureError::MissingColumn(name.to_string()))
}

impl GroupedSeriesView {
    /// Build a view and verify timestamps strictly increase inside each series.
    ///
    /// Null timestamps are skipped by the ordering check.
    ///
    /// # Errors
    /// Returns `FeatureError::UngroupedInput` if either column is absent, a
    /// series id is null, or a series' timestamps do not strictly increase in
    /// table order.
    pub fn new(df: &DataFrame, series_column: &str, time_column: &str) -> Result<Self, FeatureError> {
        let view = Self::by_position(df, series_column)?;
        let times = df.column(time_column).map_err(|_| {
            FeatureError::UngroupedInput(format!("timestamp column '{time_column}' not found"))
        })?;
        let millis = epoch_millis(times)?;

        for group in &view.groups {
            let mut last: Option<i64> = None;
            for &row in &group.rows {
                let Some(t) = millis[row as usize] else { continue };
                if last.is_some_and(|prev| t <= prev) {
                    return Err(FeatureError::UngroupedInput(format!(
                        "timestamps of series '{}' not strictly increasing at row {row}; \
                         sort by ({series_column}, {time_column}) first",
                        group.id
                    )));
                }
                last = Some(t);
            }
        }

        Ok(view)
    }

    /// Build a view that trusts table order as time order.
    ///
    /// # Errors
    /// Returns `FeatureError::UngroupedInput` if the series column is absent
    /// or contains nulls.
    pub fn by_position(df: &DataFrame, series_column: &str) -> Result<Self, FeatureError> {
        let ids = df.column(series_column).map_err(|_| {
            FeatureError::UngroupedInput(format!("series id column '{series_column}' not found"))
        })?;
        let ids = ids.cast(&DataType::String)?;

        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<SeriesGroup> = Vec::new();
        for (row, id) in ids.str()?.into_iter().enumerate() {
            let id = id.ok_or_else(|| {
                FeatureError::UngroupedInput(format!("null series id at row {row}"))
            })?;
            let slot = *index.entry(id).or_insert_with(|| {
                groups.push(SeriesGroup { id: SeriesId::from(id), rows: Vec::new() });
                groups.len() - 1
            });
            groups[slot].rows.push(row as IdxSize);
        }

        Ok(Self { series_column: series_column.to_string(), height: df.height(), groups })
    }

    /// Series in first-appearance order.
    #[must_use]
    pub fn groups(&self) -> &[SeriesGroup] {
        &self.groups
    }

    /// Number of series.
    #[must_use]
    pub fn n_groups(&self) -> usize {
        self.groups.len()
    }

    /// Number of rows in the viewed table.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Name of the series id column.
    #[must_use]
    pub fn series_column(&self) -> &str {
        &self.series_column
    }

    /// Verify `df` has the height the view was built for.
    ///
    /// Components append columns but never rows, so a height mismatch means
    /// the view belongs to a different table.
    ///
    /// # Errors
    /// Returns `FeatureError::InvalidParameter` on mismatch.
    pub fn check_frame(&self, df: &DataFrame) -> Result<(), FeatureError> {
        if df.height() == self.height {
            Ok(())
        } else {
            Err(FeatureError::InvalidParameter(format!(
                "view built for {} rows, table has {}",
                self.height,
                df.height()
            )))
        }
    }

    /// Values of a numeric column as `f64`, in table row order.
    ///
    /// NaN and infinite values are returned as missing.
    ///
    /// # Errors
    /// Returns `FeatureError::MissingColumn` if the column is absent, or a
    /// polars error if it cannot be cast to `Float64`.
    pub fn values_f64(&self, df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>, FeatureError> {
        self.check_frame(df)?;
        let cast = require_column(df, column)?.cast(&DataType::Float64)?;
        Ok(cast.f64()?.into_iter().map(|v| v.filter(|x| x.is_finite())).collect())
    }

    /// Apply a per-series kernel and scatter its output back to row order.
    ///
    /// `kernel` receives one series' values in time order and must return a
    /// vector of the same length.
    ///
    /// # Errors
    /// Propagates the first kernel error.
    pub fn map_series<E>(
        &self,
        values: &[Option<f64>],
        kernel: impl Fn(&[Option<f64>]) -> Result<Vec<Option<f64>>, E>,
    ) -> Result<Vec<Option<f64>>, E> {
        let mut out = vec![None; values.len()];
        for group in &self.groups {
            let result = kernel(&Self::gather(group, values))?;
            debug_assert_eq!(result.len(), group.len());
            Self::scatter(group, result, &mut out);
        }
        Ok(out)
    }

    /// One series' values, in time order, from a column in table row order.
    #[must_use]
    pub fn gather<T: Copy>(group: &SeriesGroup, values: &[T]) -> Vec<T> {
        group.rows.iter().map(|&row| values[row as usize]).collect()
    }

    /// Write one series' results back to their table rows.
    pub fn scatter<T>(group: &SeriesGroup, results: impl IntoIterator<Item = T>, out: &mut [T]) {
        for (&row, value) in group.rows.iter().zip(results) {
            out[row as usize] = value;
        }
    }

    /// Row index `lag` positions earlier in the same series, per row.
    ///
    /// The first `lag` rows of every series map to null, so gathering with
    /// these indices never crosses a series boundary.
    #[must_use]
    pub fn lag_indices(&self, lag: usize) -> IdxCa {
        let mut source: Vec<Option<IdxSize>> = vec![None; self.height];
        for group in &self.groups {
            for (pos, &row) in group.rows.iter().enumerate().skip(lag) {
                source[row as usize] = Some(group.rows[pos - lag]);
            }
        }
        IdxCa::from_iter_options("lag_source".into(), source.into_iter())
    }
}
