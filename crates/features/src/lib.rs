#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/gridlag/gridlag/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod columns;

mod lag;
pub use lag::{LagConfig, LagEmbedder};

mod rolling;
pub use rolling::{RollingAggregator, RollingConfig};

mod seasonal;
pub use seasonal::{SeasonalRollingAggregator, SeasonalRollingConfig};

mod ewma;
pub use ewma::{EwmaConfig, EwmaEmbedder};

mod calendar;
pub use calendar::{CalendarConfig, CalendarDecomposer};

mod fourier;
pub use fourier::{FourierConfig, FourierEncoder, FourierTerm};

#[cfg(test)]
mod testing;
