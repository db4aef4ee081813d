//! Pipeline configuration.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use gridlag_features::{
    CalendarConfig, CalendarDecomposer, EwmaEmbedder, FourierConfig, FourierEncoder, FourierTerm,
    LagConfig, LagEmbedder, RollingAggregator, RollingConfig, SeasonalRollingAggregator,
    SeasonalRollingConfig,
};
use gridlag_primitives::{AggKind, CalendarAttribute, NumericWidth, PartitionName};
use gridlag_traits::SeriesTransform;
use serde::{Deserialize, Serialize};

use crate::{PARTITION_TAG, PipelineError};

const fn default_shift() -> usize {
    1
}

fn default_kinds() -> Vec<AggKind> {
    vec![AggKind::Mean]
}

fn default_attributes() -> Vec<CalendarAttribute> {
    CalendarAttribute::HALF_HOURLY.to_vec()
}

const fn default_terms() -> usize {
    1
}

/// Rolling-window stage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RollingSection {
    /// Window lengths.
    pub windows: Vec<usize>,
    /// Statistics per window.
    #[serde(default = "default_kinds")]
    pub kinds: Vec<AggKind>,
    /// Rows excluded at the end of each window.
    #[serde(default = "default_shift")]
    pub shift: usize,
}

/// Seasonal rolling stage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeasonalSection {
    /// Seasonal periods.
    pub periods: Vec<usize>,
    /// Same-phase observations per window.
    pub windows: Vec<usize>,
    /// Statistics per (period, window).
    #[serde(default = "default_kinds")]
    pub kinds: Vec<AggKind>,
    /// Seasons excluded at the end of each window.
    #[serde(default = "default_shift")]
    pub shift: usize,
}

/// EWMA stage settings: exactly one of `alphas` and `spans`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EwmaSection {
    /// Decay factors in (0, 1].
    pub alphas: Option<Vec<f64>>,
    /// Spans, each >= 1.
    pub spans: Option<Vec<f64>>,
    /// Rows excluded before smoothing.
    #[serde(default = "default_shift")]
    pub shift: usize,
}

/// Calendar stage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalendarSection {
    /// Attributes to extract.
    #[serde(default = "default_attributes")]
    pub attributes: Vec<CalendarAttribute>,
    /// Column name prefix; `{timestamp_column}_` when unset.
    pub prefix: Option<String>,
    /// Add seconds since the epoch.
    #[serde(default)]
    pub add_elapsed: bool,
    /// Drop the timestamp column afterwards.
    #[serde(default)]
    pub drop_source: bool,
}

/// One Fourier-encoded column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FourierSection {
    /// Cyclical column, usually a calendar attribute.
    pub column: String,
    /// Cycle length.
    pub max_value: f64,
    /// Number of harmonics.
    #[serde(default = "default_terms")]
    pub n_terms: usize,
}

/// A named input partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartitionSource {
    /// Partition name, also the output file stem.
    pub name: PartitionName,
    /// CSV file to read.
    pub path: PathBuf,
}

/// Configuration for a feature pipeline run.
///
/// A stage is disabled when its section is absent or empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Series identifier column.
    pub series_column: String,
    /// Timestamp column.
    pub timestamp_column: String,
    /// Consumption column the lag, rolling and EWMA stages read.
    pub target_column: String,
    /// Narrow generated numeric columns to 32 bits.
    pub use_32bit: bool,
    /// Lags in rows.
    pub lags: Vec<usize>,
    /// Rolling-window stage.
    pub rolling: Option<RollingSection>,
    /// Seasonal rolling stage.
    pub seasonal: Option<SeasonalSection>,
    /// EWMA stage.
    pub ewma: Option<EwmaSection>,
    /// Calendar stage.
    pub calendar: Option<CalendarSection>,
    /// Fourier stage.
    pub fourier: Vec<FourierSection>,
    /// Input partitions, in output order.
    pub partitions: Vec<PartitionSource>,
    /// Directory receiving `{partition}.csv`.
    pub output_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            series_column: "LCLid".to_string(),
            timestamp_column: "timestamp".to_string(),
            target_column: "energy".to_string(),
            use_32bit: false,
            lags: Vec::new(),
            rolling: None,
            seasonal: None,
            ewma: None,
            calendar: None,
            fourier: Vec::new(),
            partitions: Vec::new(),
            output_dir: PathBuf::from("features"),
        }
    }
}

impl PipelineConfig {
    /// A full half-hourly feature set: hour/day/week lags, short rolling
    /// windows, daily and weekly seasonal windows, day and week spans, and
    /// calendar attributes with Fourier terms for hour, day of week and month.
    #[must_use]
    pub fn half_hourly() -> Self {
        let prefix = "timestamp_";
        Self {
            lags: vec![1, 2, 3, 48, 336],
            rolling: Some(RollingSection {
                windows: vec![3, 6, 12, 48],
                kinds: vec![AggKind::Mean, AggKind::Std],
                shift: 1,
            }),
            seasonal: Some(SeasonalSection {
                periods: vec![48, 336],
                windows: vec![3],
                kinds: vec![AggKind::Mean, AggKind::Std],
                shift: 1,
            }),
            ewma: Some(EwmaSection { alphas: None, spans: Some(vec![48.0, 336.0]), shift: 1 }),
            calendar: Some(CalendarSection {
                attributes: default_attributes(),
                prefix: Some(prefix.to_string()),
                add_elapsed: true,
                drop_source: false,
            }),
            fourier: vec![
                FourierSection { column: format!("{prefix}hour"), max_value: 24.0, n_terms: 2 },
                FourierSection { column: format!("{prefix}day_of_week"), max_value: 7.0, n_terms: 1 },
                FourierSection { column: format!("{prefix}month"), max_value: 12.0, n_terms: 1 },
            ],
            ..Self::default()
        }
    }

    /// Parse a TOML document.
    ///
    /// # Errors
    /// Returns `PipelineError::Config` if the document is malformed or fails
    /// validation.
    pub fn from_toml_str(raw: &str) -> Result<Self, PipelineError> {
        let config: Self = toml::from_str(raw).map_err(|e| PipelineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    ///
    /// Relative partition paths and a relative `output_dir` are resolved
    /// against the file's directory.
    ///
    /// # Errors
    /// Returns `PipelineError::Io` if the file cannot be read and
    /// `PipelineError::Config` if it cannot be parsed.
    pub fn from_path(path: &Path) -> Result<Self, PipelineError> {
        let raw = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&raw)?;
        if let Some(base) = path.parent() {
            let resolve = |p: &mut PathBuf| {
                if p.is_relative() {
                    *p = base.join(&*p);
                }
            };
            config.partitions.iter_mut().for_each(|source| resolve(&mut source.path));
            resolve(&mut config.output_dir);
        }
        Ok(config)
    }

    /// Check column names and partition names.
    ///
    /// # Errors
    /// Returns `PipelineError::Config` describing the first problem.
    pub fn validate(&self) -> Result<(), PipelineError> {
        for (what, name) in [
            ("series_column", &self.series_column),
            ("timestamp_column", &self.timestamp_column),
            ("target_column", &self.target_column),
        ] {
            if name.is_empty() {
                return Err(PipelineError::Config(format!("{what} must not be empty")));
            }
            if name == PARTITION_TAG {
                return Err(PipelineError::Config(format!("{what} may not be '{PARTITION_TAG}'")));
            }
        }

        let mut seen = HashSet::new();
        for source in &self.partitions {
            if !seen.insert(source.name.as_str()) {
                return Err(PipelineError::Config(format!(
                    "partition '{}' listed twice",
                    source.name
                )));
            }
        }
        Ok(())
    }

    /// Storage width for generated columns.
    #[must_use]
    pub const fn width(&self) -> NumericWidth {
        NumericWidth::from_flag(self.use_32bit)
    }

    /// Build the enabled stages in execution order.
    ///
    /// # Errors
    /// Returns `PipelineError::Stage` naming the stage whose settings are
    /// rejected, e.g. an EWMA section giving both or neither of alphas and
    /// spans.
    pub fn build_stages(&self) -> Result<Vec<Box<dyn SeriesTransform>>, PipelineError> {
        let width = self.width();
        let target = &self.target_column;
        let mut stages: Vec<Box<dyn SeriesTransform>> = Vec::new();

        if !self.lags.is_empty() {
            stages.push(Box::new(LagEmbedder::with_config(LagConfig {
                column: target.clone(),
                lags: self.lags.clone(),
                width,
            })));
        }

        if let Some(rolling) = self.rolling.as_ref().filter(|r| !r.windows.is_empty()) {
            stages.push(Box::new(RollingAggregator::with_config(RollingConfig {
                column: target.clone(),
                windows: rolling.windows.clone(),
                kinds: rolling.kinds.clone(),
                shift: rolling.shift,
                width,
            })));
        }

        if let Some(seasonal) = self.seasonal.as_ref().filter(|s| !s.periods.is_empty()) {
            stages.push(Box::new(SeasonalRollingAggregator::with_config(SeasonalRollingConfig {
                column: target.clone(),
                periods: seasonal.periods.clone(),
                windows: seasonal.windows.clone(),
                kinds: seasonal.kinds.clone(),
                shift: seasonal.shift,
                width,
            })));
        }

        if let Some(ewma) = &self.ewma {
            let embedder = EwmaEmbedder::from_options(
                target.clone(),
                ewma.alphas.clone(),
                ewma.spans.clone(),
                ewma.shift,
                width,
            )
            .map_err(|source| PipelineError::stage("ewma", source))?;
            if !embedder.config().decay.is_empty() {
                stages.push(Box::new(embedder));
            }
        }

        if let Some(calendar) =
            self.calendar.as_ref().filter(|c| !c.attributes.is_empty() || c.add_elapsed)
        {
            stages.push(Box::new(CalendarDecomposer::with_config(CalendarConfig {
                column: self.timestamp_column.clone(),
                attributes: calendar.attributes.clone(),
                prefix: calendar.prefix.clone(),
                add_elapsed: calendar.add_elapsed,
                drop_source: calendar.drop_source,
                width,
            })));
        }

        if !self.fourier.is_empty() {
            let terms = self
                .fourier
                .iter()
                .map(|f| FourierTerm::new(f.column.clone(), f.max_value, f.n_terms))
                .collect();
            stages.push(Box::new(FourierEncoder::with_config(FourierConfig { terms, width })));
        }

        Ok(stages)
    }
}
