//! Window aggregation kinds.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Reduction applied over a trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggKind {
    /// Arithmetic mean.
    #[display("mean")]
    Mean,
    /// Sample standard deviation (N-1 denominator).
    #[display("std")]
    Std,
    /// Minimum.
    #[display("min")]
    Min,
    /// Maximum.
    #[display("max")]
    Max,
}

impl AggKind {
    /// All aggregation kinds, in naming order.
    pub const ALL: [Self; 4] = [Self::Mean, Self::Std, Self::Min, Self::Max];

    /// Short name used in feature column names.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Std => "std",
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    /// Minimum number of values needed for a defined result.
    #[must_use]
    pub const fn min_count(&self) -> usize {
        match self {
            Self::Std => 2,
            Self::Mean | Self::Min | Self::Max => 1,
        }
    }
}
