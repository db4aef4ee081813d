//! Timestamp extraction from polars columns.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use gridlag_primitives::Timestamp;
use polars::prelude::*;

use crate::FeatureError;

const MILLIS_PER_DAY: i64 = 86_400_000;

const DATETIME_FORMATS: [&str; 4] =
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"];

/// Read a temporal column as milliseconds since the Unix epoch.
///
/// Accepts `Datetime` (any unit; time zones are read as UTC instants), `Date`
/// and `String` columns. Nulls and unparseable strings become `None`.
///
/// # Errors
/// Returns `FeatureError::InvalidParameter` for any other dtype.
pub fn epoch_millis(column: &Column) -> Result<Vec<Option<i64>>, FeatureError> {
    match column.dtype() {
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            let physical = column.cast(&DataType::Int64)?;
            Ok(physical.i64()?.into_iter().map(|v| v.map(|v| to_millis(v, unit))).collect())
        }
        DataType::Date => {
            let physical = column.cast(&DataType::Int32)?;
            Ok(physical
                .i32()?
                .into_iter()
                .map(|days| days.map(|d| i64::from(d) * MILLIS_PER_DAY))
                .collect())
        }
        DataType::String => Ok(column
            .str()?
            .into_iter()
            .map(|s| s.and_then(parse_timestamp).map(|ts| ts.and_utc().timestamp_millis()))
            .collect()),
        other => Err(FeatureError::InvalidParameter(format!(
            "column '{}' has non-temporal dtype {other}",
            column.name()
        ))),
    }
}

const fn to_millis(value: i64, unit: TimeUnit) -> i64 {
    match unit {
        TimeUnit::Nanoseconds => value.div_euclid(1_000_000),
        TimeUnit::Microseconds => value.div_euclid(1_000),
        TimeUnit::Milliseconds => value,
    }
}

/// Parse an ISO-like timestamp string.
///
/// Accepts `YYYY-MM-DD[ T]HH:MM[:SS[.fff]]`, RFC 3339 with an offset
/// (converted to UTC), and bare dates (midnight).
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()))
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Convert epoch milliseconds back to a naive UTC timestamp.
#[must_use]
pub fn timestamp_from_millis(millis: i64) -> Option<Timestamp> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}
