#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/gridlag/gridlag/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod config;
pub use config::{
    CalendarSection, EwmaSection, FourierSection, PartitionSource, PipelineConfig, RollingSection,
    SeasonalSection,
};

mod pipeline;
pub use pipeline::{FeaturePipeline, PARTITION_TAG, PipelineOutput};

mod sink;
pub use sink::{CsvSink, MemorySink, PartitionSink};

mod error;
pub use error::PipelineError;

/// Re-export commonly used types.
pub mod prelude {
    pub use gridlag_primitives::{AggKind, CalendarAttribute, PartitionName};
    pub use gridlag_traits::SeriesTransform;

    pub use super::{FeaturePipeline, MemorySink, PartitionSink, PipelineConfig, PipelineError};
}
