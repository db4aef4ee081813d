//! Calendar attributes derived from a timestamp.

use chrono::{Datelike, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// A discrete calendar attribute of a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarAttribute {
    /// Calendar year.
    Year,
    /// Month of year, 1-12.
    Month,
    /// Quarter of year, 1-4.
    Quarter,
    /// ISO week number, 1-53.
    Week,
    /// Day of month, 1-31.
    Day,
    /// Day of week, Monday = 0.
    DayOfWeek,
    /// English weekday name.
    WeekdayName,
    /// Day of year, 1-366.
    DayOfYear,
    /// Hour of day, 0-23.
    Hour,
    /// Minute of hour, 0-59.
    Minute,
    /// Second of minute, 0-59.
    Second,
    /// First day of the month.
    IsMonthStart,
    /// Last day of the month.
    IsMonthEnd,
    /// First day of a quarter.
    IsQuarterStart,
    /// Last day of a quarter.
    IsQuarterEnd,
    /// January 1st.
    IsYearStart,
    /// December 31st.
    IsYearEnd,
}

/// Value of a calendar attribute for one timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarValue {
    /// Integer-valued attribute.
    Int(i64),
    /// Boundary flag.
    Flag(bool),
    /// Textual attribute.
    Text(&'static str),
}

impl CalendarAttribute {
    /// Attributes meaningful for half-hourly data (nothing below minutes).
    pub const HALF_HOURLY: [Self; 14] = [
        Self::Month,
        Self::Quarter,
        Self::IsQuarterStart,
        Self::IsQuarterEnd,
        Self::IsYearStart,
        Self::IsYearEnd,
        Self::IsMonthStart,
        Self::IsMonthEnd,
        Self::WeekdayName,
        Self::DayOfWeek,
        Self::DayOfYear,
        Self::Week,
        Self::Hour,
        Self::Minute,
    ];

    /// Snake-case name used as the column suffix.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Week => "week",
            Self::Day => "day",
            Self::DayOfWeek => "day_of_week",
            Self::WeekdayName => "weekday_name",
            Self::DayOfYear => "day_of_year",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::IsMonthStart => "is_month_start",
            Self::IsMonthEnd => "is_month_end",
            Self::IsQuarterStart => "is_quarter_start",
            Self::IsQuarterEnd => "is_quarter_end",
            Self::IsYearStart => "is_year_start",
            Self::IsYearEnd => "is_year_end",
        }
    }

    /// Whether the attribute is a boolean boundary flag.
    #[must_use]
    pub const fn is_flag(&self) -> bool {
        matches!(
            self,
            Self::IsMonthStart
                | Self::IsMonthEnd
                | Self::IsQuarterStart
                | Self::IsQuarterEnd
                | Self::IsYearStart
                | Self::IsYearEnd
        )
    }

    /// Whether the attribute is textual.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::WeekdayName)
    }

    /// Extract the attribute from a timestamp.
    #[must_use]
    pub fn extract(&self, ts: &Timestamp) -> CalendarValue {
        let date = ts.date();
        let month = date.month();
        match self {
            Self::Year => CalendarValue::Int(i64::from(date.year())),
            Self::Month => CalendarValue::Int(i64::from(month)),
            Self::Quarter => CalendarValue::Int(i64::from(quarter_of(month))),
            Self::Week => CalendarValue::Int(i64::from(date.iso_week().week())),
            Self::Day => CalendarValue::Int(i64::from(date.day())),
            Self::DayOfWeek => {
                CalendarValue::Int(i64::from(date.weekday().num_days_from_monday()))
            }
            Self::WeekdayName => CalendarValue::Text(weekday_name(date.weekday())),
            Self::DayOfYear => CalendarValue::Int(i64::from(date.ordinal())),
            Self::Hour => CalendarValue::Int(i64::from(ts.hour())),
            Self::Minute => CalendarValue::Int(i64::from(ts.minute())),
            Self::Second => CalendarValue::Int(i64::from(ts.second())),
            Self::IsMonthStart => CalendarValue::Flag(date.day() == 1),
            Self::IsMonthEnd => CalendarValue::Flag(is_month_end(ts)),
            Self::IsQuarterStart => {
                CalendarValue::Flag(date.day() == 1 && matches!(month, 1 | 4 | 7 | 10))
            }
            Self::IsQuarterEnd => {
                CalendarValue::Flag(is_month_end(ts) && matches!(month, 3 | 6 | 9 | 12))
            }
            Self::IsYearStart => CalendarValue::Flag(month == 1 && date.day() == 1),
            Self::IsYearEnd => CalendarValue::Flag(month == 12 && date.day() == 31),
        }
    }
}

const fn quarter_of(month: u32) -> u32 {
    (month - 1) / 3 + 1
}

fn is_month_end(ts: &Timestamp) -> bool {
    ts.date().succ_opt().is_none_or(|next| next.day() == 1)
}

const fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
