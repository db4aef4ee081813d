//! Storage-width narrowing for generated columns.

use gridlag_primitives::NumericWidth;
use polars::prelude::*;

/// Narrow a numeric series to 32 bits when requested.
///
/// Floating series become `Float32` and integer series `Int32`. Boolean,
/// string and temporal series keep their native type.
///
/// # Errors
/// Returns a polars error if the cast fails.
pub fn narrow_numeric(series: Series, width: NumericWidth) -> PolarsResult<Series> {
    if !width.is_narrow() {
        return Ok(series);
    }

    let dtype = series.dtype();
    if dtype.is_float() {
        series.cast(&DataType::Float32)
    } else if dtype.is_integer() {
        series.cast(&DataType::Int32)
    } else {
        Ok(series)
    }
}
