//! Shared test fixtures.

use gridlag_traits::GroupedSeriesView;
use polars::prelude::*;

/// Two households: `A` with readings 1..=8, `B` with 10, 20, ..., 50.
pub(crate) fn households() -> DataFrame {
    let a_times = half_hours("2013-03-31", 22, 8);
    let b_times = half_hours("2013-03-31", 22, 5);
    let times: Vec<String> = a_times.into_iter().chain(b_times).collect();

    df! {
        "LCLid" => ["A"; 8].into_iter().chain(["B"; 5]).collect::<Vec<_>>(),
        "tstp" => times,
        "energy" => [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0, 20.0, 30.0, 40.0, 50.0],
    }
    .unwrap()
}

/// `n` half-hourly timestamps starting at `hour` on `date`.
pub(crate) fn half_hours(date: &str, hour: usize, n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            let minutes = hour * 60 + i * 30;
            let (day_offset, minutes) = (minutes / (24 * 60), minutes % (24 * 60));
            let day = if day_offset == 0 { date.to_string() } else { next_day(date) };
            format!("{day} {:02}:{:02}:00", minutes / 60, minutes % 60)
        })
        .collect()
}

fn next_day(date: &str) -> String {
    match date {
        "2013-03-31" => "2013-04-01".to_string(),
        other => panic!("fixture has no successor for {other}"),
    }
}

pub(crate) fn view(df: &DataFrame) -> GroupedSeriesView {
    GroupedSeriesView::new(df, "LCLid", "tstp").unwrap()
}

pub(crate) fn f64_column(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name).unwrap().cast(&DataType::Float64).unwrap().f64().unwrap().into_iter().collect()
}

/// Copy of `df` with `energy` replaced by `value` at `row`.
pub(crate) fn with_energy_at(df: &DataFrame, row: usize, value: f64) -> DataFrame {
    let energy: Vec<Option<f64>> = f64_column(df, "energy")
        .into_iter()
        .enumerate()
        .map(|(r, v)| if r == row { Some(value) } else { v })
        .collect();
    let mut out = df.clone();
    out.with_column(Series::new("energy".into(), energy)).unwrap();
    out
}
