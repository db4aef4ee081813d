//! Destinations for featurized partitions.

use std::path::{Path, PathBuf};

use gridlag_primitives::PartitionName;
use gridlag_utils::write_partition;
use polars::prelude::*;

use crate::PipelineError;

/// Receives each featurized partition once the whole run has succeeded.
pub trait PartitionSink {
    /// Persist one partition.
    ///
    /// # Errors
    /// Returns `PipelineError` if the partition cannot be stored.
    fn write(&mut self, name: &PartitionName, df: &mut DataFrame) -> Result<(), PipelineError>;
}

/// Writes `{dir}/{partition}.csv` per partition.
#[derive(Debug, Clone)]
pub struct CsvSink {
    dir: PathBuf,
}

impl CsvSink {
    /// Create a sink writing into `dir`, created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a partition is written to.
    #[must_use]
    pub fn path_for(&self, name: &PartitionName) -> PathBuf {
        self.dir.join(format!("{name}.csv"))
    }
}

impl PartitionSink for CsvSink {
    fn write(&mut self, name: &PartitionName, df: &mut DataFrame) -> Result<(), PipelineError> {
        write_partition(df, &self.path_for(name))?;
        Ok(())
    }
}

/// Keeps partitions in memory, in the order they were written.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    partitions: Vec<(PartitionName, DataFrame)>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a partition by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DataFrame> {
        self.partitions.iter().find(|(n, _)| n.as_str() == name).map(|(_, df)| df)
    }

    /// Number of stored partitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    /// Check if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Take the stored partitions.
    #[must_use]
    pub fn into_inner(self) -> Vec<(PartitionName, DataFrame)> {
        self.partitions
    }
}

impl PartitionSink for MemorySink {
    fn write(&mut self, name: &PartitionName, df: &mut DataFrame) -> Result<(), PipelineError> {
        self.partitions.push((name.clone(), df.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use gridlag_utils::read_partition;

    use super::*;

    fn frame() -> DataFrame {
        df! { "LCLid" => &["A", "A"], "energy_lag_1" => &[None, Some(0.5)] }.unwrap()
    }

    #[test]
    fn csv_sink_names_files_after_partitions() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvSink::new(dir.path().join("out"));
        let name = PartitionName::new(PartitionName::VAL);
        sink.write(&name, &mut frame()).unwrap();

        let path = sink.path_for(&name);
        assert!(path.ends_with("out/val.csv"));
        let back = read_partition(&path).unwrap();
        assert_eq!(back.height(), 2);
        assert_eq!(back.column("energy_lag_1").unwrap().null_count(), 1);
    }

    #[test]
    fn memory_sink_keeps_order() {
        let mut sink = MemorySink::new();
        sink.write(&PartitionName::new("test"), &mut frame()).unwrap();
        sink.write(&PartitionName::new("train"), &mut frame()).unwrap();
        assert_eq!(sink.len(), 2);
        assert!(sink.get("train").is_some());
        assert!(sink.get("val").is_none());
        let names: Vec<String> = sink.into_inner().into_iter().map(|(n, _)| n.0).collect();
        assert_eq!(names, vec!["test", "train"]);
    }
}
