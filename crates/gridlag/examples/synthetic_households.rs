//! Synthetic households example.
//!
//! Generates three weeks of half-hourly readings for a handful of households
//! with a daily profile, weekend uplift and noise, splits them by date into
//! train/val/test, and runs the standard half-hourly feature set in memory.

use chrono::{Datelike, Duration, NaiveDate, Timelike, Weekday};
use gridlag::{
    pipeline::{FeaturePipeline, MemorySink, PipelineConfig},
    primitives::PartitionName,
};
use polars::prelude::*;
use rand::Rng;

const HOUSEHOLDS: [&str; 3] = ["MAC000002", "MAC000033", "MAC000246"];
const DAYS: i64 = 21;
const SLOTS_PER_DAY: i64 = 48;

/// Evening-peaked daily profile in kWh per half hour.
fn profile(hour: f64) -> f64 {
    0.15 + 0.25 * (-(hour - 19.0).powi(2) / 8.0).exp() + 0.1 * (-(hour - 8.0).powi(2) / 4.0).exp()
}

fn generate(rng: &mut impl Rng) -> Vec<(PartitionName, DataFrame)> {
    let start = NaiveDate::from_ymd_opt(2013, 3, 4).unwrap().and_hms_opt(0, 0, 0).unwrap();
    let mut rows: [(Vec<&str>, Vec<String>, Vec<f64>); 3] = Default::default();

    for (h, &id) in HOUSEHOLDS.iter().enumerate() {
        let scale = 0.8 + 0.3 * h as f64;
        for slot in 0..DAYS * SLOTS_PER_DAY {
            let ts = start + Duration::minutes(30 * slot);
            let hour = f64::from(ts.hour()) + f64::from(ts.minute()) / 60.0;
            let weekend = matches!(ts.weekday(), Weekday::Sat | Weekday::Sun);
            let uplift = if weekend { 1.2 } else { 1.0 };
            let energy = (scale * uplift * profile(hour) + rng.gen_range(-0.03..0.03)).max(0.0);

            // two weeks of training, four days of validation, the rest for test
            let split = match (ts.date() - start.date()).num_days() {
                0..=13 => 0,
                14..=17 => 1,
                _ => 2,
            };
            rows[split].0.push(id);
            rows[split].1.push(ts.format("%Y-%m-%d %H:%M:%S").to_string());
            rows[split].2.push((energy * 1000.0).round() / 1000.0);
        }
    }

    let names = [PartitionName::TRAIN, PartitionName::VAL, PartitionName::TEST];
    names
        .into_iter()
        .zip(rows)
        .map(|(name, (ids, stamps, energy))| {
            let df = df! { "LCLid" => ids, "timestamp" => stamps, "energy" => energy }.unwrap();
            (PartitionName::new(name), df)
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("gridlag=info").init();

    println!("=== gridlag: synthetic households ===\n");

    let partitions = generate(&mut rand::thread_rng());
    for (name, df) in &partitions {
        println!("input {name:<5}: {} rows", df.height());
    }

    let config = PipelineConfig { use_32bit: true, ..PipelineConfig::half_hourly() };
    let pipeline = FeaturePipeline::new(config)?;
    println!("\nstages: {:?}", pipeline.stage_names());

    let mut sink = MemorySink::new();
    let output = pipeline.run(partitions, &mut sink)?;
    println!("generated {} feature columns\n", output.features.len());

    for (name, df) in sink.into_inner() {
        let weekly = df.column("energy_lag_336")?;
        println!(
            "{name:<5}: {} rows x {} columns, {} rows without a week of history",
            df.height(),
            df.width(),
            weekly.null_count()
        );
    }

    if let Some(val) = output.partition(PartitionName::VAL) {
        println!("\nfirst validation rows:");
        let preview = val.select(["LCLid", "timestamp", "energy", "energy_lag_48", "energy_ewma_span_48"])?;
        println!("{}", preview.head(Some(5)));
    }

    Ok(())
}
