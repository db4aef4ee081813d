//! Calendar decomposition of a timestamp column.

use gridlag_primitives::{CalendarAttribute, CalendarValue, FeatureName, NumericWidth, Timestamp};
use gridlag_traits::{
    Augmented, FeatureError, GroupedSeriesView, SeriesTransform, epoch_millis, require_column,
    timestamp_from_millis,
};
use gridlag_utils::narrow_numeric;
use polars::prelude::*;
use rayon::prelude::*;
use tracing::debug;

use crate::columns::{append_features, unique_in_order};

/// Configuration for calendar decomposition.
#[derive(Debug, Clone)]
pub struct CalendarConfig {
    /// Timestamp column.
    pub column: String,
    /// Attributes to extract.
    pub attributes: Vec<CalendarAttribute>,
    /// Column name prefix; `{column}_` when unset.
    pub prefix: Option<String>,
    /// Add whole seconds since the Unix epoch as `{prefix}elapsed`.
    pub add_elapsed: bool,
    /// Remove the timestamp column after decomposition.
    pub drop_source: bool,
    /// Storage width of integer attributes.
    pub width: NumericWidth,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            column: "timestamp".to_string(),
            attributes: CalendarAttribute::HALF_HOURLY.to_vec(),
            prefix: None,
            add_elapsed: false,
            drop_source: false,
            width: NumericWidth::Native,
        }
    }
}

impl CalendarConfig {
    /// Effective column name prefix.
    #[must_use]
    pub fn resolved_prefix(&self) -> String {
        self.prefix.clone().unwrap_or_else(|| format!("{}_", self.column))
    }
}

/// Splits a timestamp into discrete calendar attributes.
///
/// Integer attributes are `Int64` (`Int32` when narrowed), boundary flags are
/// `Boolean` and weekday names are strings. Missing or unparseable timestamps
/// give null attributes.
///
/// Time-zone-aware columns are decomposed in UTC, not in their local zone:
/// `hour` and the day-boundary flags of a local-time dataset shift by its UTC
/// offset. Convert to naive local time first to decompose in local time.
#[derive(Debug, Clone)]
pub struct CalendarDecomposer {
    config: CalendarConfig,
}

impl CalendarDecomposer {
    /// Create a new decomposer with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CalendarConfig::default())
    }

    /// Create a decomposer with custom configuration.
    #[must_use]
    pub const fn with_config(config: CalendarConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &CalendarConfig {
        &self.config
    }

    /// Append one column per attribute, then the elapsed column if requested.
    ///
    /// # Errors
    /// Returns `FeatureError::MissingColumn` if the timestamp column is absent
    /// and `FeatureError::InvalidParameter` if it is not a datetime, date or
    /// string column.
    pub fn decompose(&self, mut df: DataFrame) -> Result<Augmented, FeatureError> {
        let CalendarConfig { column, add_elapsed, drop_source, width, .. } = &self.config;
        let prefix = self.config.resolved_prefix();
        let millis = epoch_millis(require_column(&df, column)?)?;
        let stamps: Vec<Option<Timestamp>> =
            millis.iter().map(|m| m.and_then(timestamp_from_millis)).collect();

        let attributes = unique_in_order(&self.config.attributes);
        let mut features = attributes
            .par_iter()
            .map(|&attr| attribute_column(&FeatureName::calendar(&prefix, attr), attr, &stamps, *width))
            .collect::<Result<Vec<Series>, FeatureError>>()?;

        if *add_elapsed {
            let seconds: Vec<Option<i64>> =
                millis.iter().map(|m| m.map(|ms| ms.div_euclid(1000))).collect();
            features.push(Series::new(FeatureName::elapsed(&prefix).as_str().into(), seconds));
        }

        if *drop_source {
            df.drop_in_place(column)?;
        }

        debug!(column = column.as_str(), prefix = prefix.as_str(), n_features = features.len(), "generated calendar features");
        append_features(df, features)
    }
}

fn attribute_column(
    name: &FeatureName,
    attr: CalendarAttribute,
    stamps: &[Option<Timestamp>],
    width: NumericWidth,
) -> Result<Series, FeatureError> {
    let name: PlSmallStr = name.as_str().into();
    let values = stamps.iter().map(|ts| ts.as_ref().map(|ts| attr.extract(ts)));

    let series = if attr.is_flag() {
        let flags: Vec<Option<bool>> = values
            .map(|v| match v {
                Some(CalendarValue::Flag(b)) => Some(b),
                _ => None,
            })
            .collect();
        Series::new(name, flags)
    } else if attr.is_text() {
        let text: Vec<Option<&str>> = values
            .map(|v| match v {
                Some(CalendarValue::Text(s)) => Some(s),
                _ => None,
            })
            .collect();
        Series::new(name, text)
    } else {
        let ints: Vec<Option<i64>> = values
            .map(|v| match v {
                Some(CalendarValue::Int(i)) => Some(i),
                _ => None,
            })
            .collect();
        narrow_numeric(Series::new(name, ints), width)?
    };
    Ok(series)
}

impl Default for CalendarDecomposer {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesTransform for CalendarDecomposer {
    fn name(&self) -> &str {
        "calendar"
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![self.config.column.as_str()]
    }

    fn apply(&self, df: DataFrame, view: &GroupedSeriesView) -> Result<Augmented, FeatureError> {
        view.check_frame(&df)?;
        self.decompose(df)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::testing::households;

    fn decomposer(attributes: Vec<CalendarAttribute>, width: NumericWidth) -> CalendarDecomposer {
        CalendarDecomposer::with_config(CalendarConfig {
            column: "tstp".to_string(),
            attributes,
            width,
            ..Default::default()
        })
    }

    #[test]
    fn quarter_end_rollover() {
        let df = households();
        let (out, names) = decomposer(
            vec![
                CalendarAttribute::Hour,
                CalendarAttribute::Month,
                CalendarAttribute::IsQuarterEnd,
                CalendarAttribute::WeekdayName,
            ],
            NumericWidth::Native,
        )
        .decompose(df)
        .unwrap();
        assert_eq!(names, vec!["tstp_hour", "tstp_month", "tstp_is_quarter_end", "tstp_weekday_name"]);

        // row 3 is 2013-03-31 23:30, row 4 is 2013-04-01 00:00
        let hour = out.column("tstp_hour").unwrap().i64().unwrap();
        assert_eq!(hour.get(3), Some(23));
        assert_eq!(hour.get(4), Some(0));

        let month = out.column("tstp_month").unwrap().i64().unwrap();
        assert_eq!((month.get(3), month.get(4)), (Some(3), Some(4)));

        let flag = out.column("tstp_is_quarter_end").unwrap().bool().unwrap();
        assert_eq!((flag.get(0), flag.get(3), flag.get(4)), (Some(true), Some(true), Some(false)));

        let day = out.column("tstp_weekday_name").unwrap().str().unwrap();
        assert_eq!((day.get(3), day.get(4)), (Some("Sunday"), Some("Monday")));
    }

    #[rstest]
    #[case(NumericWidth::Native, DataType::Int64)]
    #[case(NumericWidth::Bits32, DataType::Int32)]
    fn integer_width(#[case] width: NumericWidth, #[case] expected: DataType) {
        let (out, _) = decomposer(vec![CalendarAttribute::DayOfYear, CalendarAttribute::IsMonthStart], width)
            .decompose(households())
            .unwrap();
        assert_eq!(out.column("tstp_day_of_year").unwrap().dtype(), &expected);
        assert_eq!(out.column("tstp_is_month_start").unwrap().dtype(), &DataType::Boolean);
    }

    #[test]
    fn elapsed_seconds_and_dropped_source() {
        let calendar = CalendarDecomposer::with_config(CalendarConfig {
            column: "tstp".to_string(),
            attributes: vec![CalendarAttribute::Minute],
            prefix: Some("ts_".to_string()),
            add_elapsed: true,
            drop_source: true,
            width: NumericWidth::Bits32,
        });
        let (out, names) = calendar.decompose(households()).unwrap();
        assert_eq!(names, vec!["ts_minute", "ts_elapsed"]);
        assert!(out.column("tstp").is_err());

        let elapsed = out.column("ts_elapsed").unwrap();
        assert_eq!(elapsed.dtype(), &DataType::Int64);
        // 2013-03-31 22:00:00 UTC
        assert_eq!(elapsed.i64().unwrap().get(0), Some(1_364_767_200));
        assert_eq!(elapsed.i64().unwrap().get(1), Some(1_364_769_000));
    }

    #[test]
    fn unparseable_timestamps_give_nulls() {
        let df = df! {
            "tstp" => &[Some("2013-06-01 12:00:00"), Some("not a time"), None],
        }
        .unwrap();
        let (out, _) = decomposer(vec![CalendarAttribute::Hour], NumericWidth::Native)
            .decompose(df)
            .unwrap();
        let hour = out.column("tstp_hour").unwrap().i64().unwrap();
        assert_eq!(hour.into_iter().collect::<Vec<_>>(), vec![Some(12), None, None]);
    }

    #[test]
    fn offset_timestamps_decompose_in_utc() {
        // local midnight on 1 June at +01:00 is 23:00 on 31 May in UTC
        let df = df! { "tstp" => &["2013-06-01T00:30:00+01:00"] }.unwrap();
        let (out, _) = decomposer(
            vec![CalendarAttribute::Hour, CalendarAttribute::IsMonthStart, CalendarAttribute::IsMonthEnd],
            NumericWidth::Native,
        )
        .decompose(df)
        .unwrap();
        assert_eq!(out.column("tstp_hour").unwrap().i64().unwrap().get(0), Some(23));
        assert_eq!(out.column("tstp_is_month_start").unwrap().bool().unwrap().get(0), Some(false));
        assert_eq!(out.column("tstp_is_month_end").unwrap().bool().unwrap().get(0), Some(true));
    }

    #[test]
    fn missing_timestamp_column() {
        let err = CalendarDecomposer::new().decompose(households()).unwrap_err();
        assert!(matches!(err, FeatureError::MissingColumn(c) if c == "timestamp"));
    }
}
