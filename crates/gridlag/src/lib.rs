//! # gridlag
//!
//! Leakage-free feature generation for half-hourly household energy data.
//!
//! This crate provides a unified interface to the gridlag crates.
//! Individual components can be enabled via feature flags.
//!
//! ## Features
//!
//! - `full`: Enables all library components
//! - `cli` (default): Adds the `featurize` binary
//! - `primitives`: Identifiers, aggregation kinds, calendar attributes
//! - `traits`: Grouped series view and the transform trait
//! - `math`: Rolling, seasonal, EWMA and Fourier kernels
//! - `features`: Feature components
//! - `pipeline`: Partition-aware pipeline, configuration and sinks
//! - `utils`: CSV partition I/O
//!
//! ## Example
//!
//! ```rust,ignore
//! use gridlag::pipeline::{FeaturePipeline, MemorySink, PipelineConfig};
//!
//! let pipeline = FeaturePipeline::new(PipelineConfig::half_hourly())?;
//! let mut sink = MemorySink::new();
//! pipeline.run(partitions, &mut sink)?;
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use gridlag_primitives as primitives;
#[cfg(feature = "traits")]
#[doc(inline)]
pub use gridlag_traits as traits;
#[cfg(feature = "math")]
#[doc(inline)]
pub use gridlag_math as math;
#[cfg(feature = "features")]
#[doc(inline)]
pub use gridlag_features as features;
#[cfg(feature = "pipeline")]
#[doc(inline)]
pub use gridlag_pipeline as pipeline;
#[cfg(feature = "utils")]
#[doc(inline)]
pub use gridlag_utils as utils;
