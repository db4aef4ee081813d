#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/gridlag/gridlag/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
pub use error::FeatureError;

mod timestamps;
pub use timestamps::{epoch_millis, parse_timestamp, timestamp_from_millis};

mod view;
pub use view::{GroupedSeriesView, SeriesGroup, require_column};

mod transform;
pub use transform::{Augmented, SeriesTransform};
