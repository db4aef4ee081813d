//! Partition-aware feature pipeline.

use std::time::Instant;

use gridlag_primitives::PartitionName;
use gridlag_traits::{GroupedSeriesView, SeriesTransform};
use gridlag_utils::read_partition;
use polars::prelude::*;
use tracing::{debug, info, info_span};

use crate::{CsvSink, PartitionSink, PipelineConfig, PipelineError};

/// Column tagging each row with its source partition while partitions are
/// processed together.
pub const PARTITION_TAG: &str = "__partition";

/// Featurized partitions and the names of the generated columns.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Partitions in input order, rows sorted by (series id, timestamp).
    pub partitions: Vec<(PartitionName, DataFrame)>,
    /// Generated feature columns, in stage order.
    pub features: Vec<String>,
}

impl PipelineOutput {
    /// Look up a partition by name.
    #[must_use]
    pub fn partition(&self, name: &str) -> Option<&DataFrame> {
        self.partitions.iter().find(|(n, _)| n.as_str() == name).map(|(_, df)| df)
    }
}

/// Runs feature stages over several partitions of one dataset.
///
/// Partitions are concatenated before any feature is computed, so a lag or
/// window in a later partition (validation, test) is filled from the tail of
/// an earlier one (train) instead of starting empty.
pub struct FeaturePipeline {
    config: PipelineConfig,
    stages: Vec<Box<dyn SeriesTransform>>,
}

impl std::fmt::Debug for FeaturePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeaturePipeline")
            .field("config", &self.config)
            .field("stages", &self.stage_names())
            .finish()
    }
}

impl FeaturePipeline {
    /// Build a pipeline with the stages enabled in `config`.
    ///
    /// # Errors
    /// Returns `PipelineError::Config` for an invalid configuration and
    /// `PipelineError::Stage` for rejected stage settings.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let stages = config.build_stages()?;
        Ok(Self { config, stages })
    }

    /// Append a custom stage after the configured ones.
    #[must_use]
    pub fn with_stage(mut self, stage: Box<dyn SeriesTransform>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Names of the stages in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Featurize partitions without persisting them.
    ///
    /// # Errors
    /// Returns `PipelineError::NoPartitions` for empty input,
    /// `PipelineError::SchemaMismatch` if partitions disagree on columns, and
    /// `PipelineError::Stage` naming the first failing stage.
    pub fn transform(
        &self,
        partitions: Vec<(PartitionName, DataFrame)>,
    ) -> Result<PipelineOutput, PipelineError> {
        let names: Vec<PartitionName> = partitions.iter().map(|(n, _)| n.clone()).collect();
        let combined = self.combine(partitions)?;
        let (df, features) = self.run_stages(combined)?;
        let partitions = split_partitions(&df, &names)?;
        Ok(PipelineOutput { partitions, features })
    }

    /// Featurize partitions and hand each to `sink`.
    ///
    /// Nothing is written unless every stage succeeds.
    ///
    /// # Errors
    /// Returns any error of [`Self::transform`], or the sink's error.
    pub fn run(
        &self,
        partitions: Vec<(PartitionName, DataFrame)>,
        sink: &mut dyn PartitionSink,
    ) -> Result<PipelineOutput, PipelineError> {
        let mut output = self.transform(partitions)?;
        for (name, df) in &mut output.partitions {
            sink.write(name, df)?;
            info!(partition = %name, rows = df.height(), columns = df.width(), "wrote partition");
        }
        Ok(output)
    }

    /// Read the configured partitions from CSV.
    ///
    /// # Errors
    /// Returns `PipelineError::NoPartitions` if none are configured and
    /// `PipelineError::Utils` if a file cannot be read.
    pub fn load_partitions(&self) -> Result<Vec<(PartitionName, DataFrame)>, PipelineError> {
        if self.config.partitions.is_empty() {
            return Err(PipelineError::NoPartitions);
        }
        self.config
            .partitions
            .iter()
            .map(|source| {
                let df = read_partition(&source.path)?;
                info!(partition = %source.name, rows = df.height(), "loaded partition");
                Ok((source.name.clone(), df))
            })
            .collect()
    }

    /// Read the configured partitions and write `{output_dir}/{partition}.csv`.
    ///
    /// # Errors
    /// Returns any error of [`Self::load_partitions`] or [`Self::run`].
    pub fn run_configured(&self) -> Result<PipelineOutput, PipelineError> {
        let partitions = self.load_partitions()?;
        let mut sink = CsvSink::new(&self.config.output_dir);
        info!(dir = %sink.dir().display(), "writing partitions as CSV");
        self.run(partitions, &mut sink)
    }

    /// Tag, concatenate and sort partitions by (series id, timestamp).
    fn combine(&self, partitions: Vec<(PartitionName, DataFrame)>) -> Result<DataFrame, PipelineError> {
        let mut iter = partitions.into_iter();
        let (first_name, first) = iter.next().ok_or(PipelineError::NoPartitions)?;
        let schema = first.schema().clone();

        let mut combined = tag(first, &first_name)?;
        for (name, df) in iter {
            check_schema(&schema, &first_name, &df, &name)?;
            combined.vstack_mut(&tag(df, &name)?)?;
        }

        let by = [self.config.series_column.as_str(), self.config.timestamp_column.as_str()];
        for column in by {
            if combined.get_column_index(column).is_none() {
                return Err(PipelineError::stage(
                    "group",
                    gridlag_traits::FeatureError::UngroupedInput(format!("column '{column}' not found")),
                ));
            }
        }
        let sorted = combined.sort(by, SortMultipleOptions::new().with_maintain_order(true))?;
        debug!(rows = sorted.height(), "combined partitions");
        Ok(sorted)
    }

    /// Run every stage over the combined table.
    fn run_stages(&self, mut df: DataFrame) -> Result<(DataFrame, Vec<String>), PipelineError> {
        let view = {
            let _span = info_span!("stage", name = "group").entered();
            GroupedSeriesView::new(&df, &self.config.series_column, &self.config.timestamp_column)
                .map_err(|source| PipelineError::stage("group", source))?
        };
        info!(series = view.n_groups(), rows = view.height(), "grouped series");

        let mut features = Vec::new();
        for stage in &self.stages {
            let name = stage.name();
            let _span = info_span!("stage", name).entered();
            let started = Instant::now();

            stage.check_columns(&df).map_err(|source| PipelineError::stage(name, source))?;
            let (next, added) =
                stage.apply(df, &view).map_err(|source| PipelineError::stage(name, source))?;

            info!(
                n_features = added.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "stage complete"
            );
            df = next;
            features.extend(added);
        }
        Ok((df, features))
    }
}

fn tag(mut df: DataFrame, name: &PartitionName) -> Result<DataFrame, PipelineError> {
    if df.get_column_index(PARTITION_TAG).is_some() {
        return Err(PipelineError::Config(format!(
            "partition '{name}' already has a '{PARTITION_TAG}' column"
        )));
    }
    let tag = Series::new(PARTITION_TAG.into(), vec![name.as_str(); df.height()]);
    df.with_column(tag)?;
    Ok(df)
}

fn check_schema(
    expected: &Schema,
    expected_name: &PartitionName,
    df: &DataFrame,
    name: &PartitionName,
) -> Result<(), PipelineError> {
    let actual = df.schema();
    if actual.len() != expected.len() {
        return Err(PipelineError::SchemaMismatch(format!(
            "partition '{name}' has {} columns, '{expected_name}' has {}",
            actual.len(),
            expected.len()
        )));
    }
    for ((col_a, dtype_a), (col_e, dtype_e)) in actual.iter().zip(expected.iter()) {
        if col_a != col_e || dtype_a != dtype_e {
            return Err(PipelineError::SchemaMismatch(format!(
                "partition '{name}' has column {col_a}: {dtype_a} where '{expected_name}' has {col_e}: {dtype_e}"
            )));
        }
    }
    Ok(())
}

/// Split the combined table by tag, in the given partition order.
fn split_partitions(
    df: &DataFrame,
    names: &[PartitionName],
) -> Result<Vec<(PartitionName, DataFrame)>, PipelineError> {
    let tags = df.column(PARTITION_TAG)?.str()?.clone();
    names
        .iter()
        .map(|name| {
            let mask = tags.equal(name.as_str());
            let part = df.filter(&mask)?.drop(PARTITION_TAG)?;
            Ok((name.clone(), part))
        })
        .collect()
}
