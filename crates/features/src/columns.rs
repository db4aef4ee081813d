//! Helpers shared by the feature components.

use gridlag_primitives::NumericWidth;
use gridlag_traits::{Augmented, FeatureError};
use gridlag_utils::narrow_numeric;
use polars::prelude::*;

/// Build a float feature column at the requested width.
pub(crate) fn float_feature(
    name: &str,
    values: Vec<Option<f64>>,
    width: NumericWidth,
) -> Result<Series, FeatureError> {
    Ok(narrow_numeric(Series::new(name.into(), values), width)?)
}

/// Append feature columns in order and report their names.
pub(crate) fn append_features(
    mut df: DataFrame,
    features: Vec<Series>,
) -> Result<Augmented, FeatureError> {
    let names: Vec<String> = features.iter().map(|s| s.name().to_string()).collect();
    for series in features {
        df.with_column(series)?;
    }
    Ok((df, names))
}

/// Sort and deduplicate positive integer parameters.
pub(crate) fn positive_params(
    values: &[usize],
    what: &str,
) -> Result<Vec<usize>, FeatureError> {
    if values.contains(&0) {
        return Err(FeatureError::InvalidParameter(format!("{what} must be positive")));
    }
    let mut params = values.to_vec();
    params.sort_unstable();
    params.dedup();
    Ok(params)
}

/// Deduplicate while keeping first-seen order.
pub(crate) fn unique_in_order<T: PartialEq + Copy>(values: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(values.len());
    for &v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}
