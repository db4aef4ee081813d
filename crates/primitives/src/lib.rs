#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/gridlag/gridlag/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod series;
pub use series::{PartitionName, SeriesId};

mod agg;
pub use agg::AggKind;

mod decay;
pub use decay::{DecayError, DecaySpec};

mod calendar;
pub use calendar::{CalendarAttribute, CalendarValue};

mod feature;
pub use feature::{FeatureName, NumericWidth};

/// Re-export common timestamp type.
pub type Timestamp = chrono::NaiveDateTime;
