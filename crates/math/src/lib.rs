#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/gridlag/gridlag/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod shift;
pub use shift::shift;

mod missing;
pub use missing::finite_values;

mod rolling;
pub use rolling::rolling;

mod seasonal;
pub use seasonal::seasonal_rolling;

mod ewma;
pub use ewma::ewma;

mod fourier;
pub use fourier::{FourierPair, fourier_terms};

mod error;
pub use error::MathError;
