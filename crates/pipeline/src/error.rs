//! Error types for the feature pipeline.

use gridlag_traits::FeatureError;
use gridlag_utils::UtilsError;

/// Errors that can occur while running the feature pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A feature stage failed.
    #[error("stage '{stage}' failed: {source}")]
    Stage {
        /// Name of the failing stage.
        stage: String,
        /// Underlying feature error.
        source: FeatureError,
    },

    /// Input partitions disagree on column names or types.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// No input partitions were given.
    #[error("no input partitions")]
    NoPartitions,

    /// Invalid or unreadable configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error.
    #[error("data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Partition read or write error.
    #[error("partition i/o error: {0}")]
    Utils(#[from] UtilsError),
}

impl PipelineError {
    /// Wrap a feature error with the stage that raised it.
    #[must_use]
    pub fn stage(stage: impl Into<String>, source: FeatureError) -> Self {
        Self::Stage { stage: stage.into(), source }
    }

    /// Name of the failing stage, if the error came from one.
    #[must_use]
    pub fn failed_stage(&self) -> Option<&str> {
        match self {
            Self::Stage { stage, .. } => Some(stage),
            _ => None,
        }
    }
}
