#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/gridlag/gridlag/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod io;
pub use io::{read_partition, write_partition};

mod narrow;
pub use narrow::narrow_numeric;

mod error;
pub use error::UtilsError;
