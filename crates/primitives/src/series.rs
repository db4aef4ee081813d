//! Series and partition identifiers.

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Identifier of one household series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into, Serialize, Deserialize)]
pub struct SeriesId(pub String);

impl SeriesId {
    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SeriesId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Name of a data partition (split), e.g. `train`, `val` or `test`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From, Into, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartitionName(pub String);

impl PartitionName {
    /// Training split.
    pub const TRAIN: &'static str = "train";
    /// Validation split.
    pub const VAL: &'static str = "val";
    /// Test split.
    pub const TEST: &'static str = "test";

    /// Create a new partition name.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the partition name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PartitionName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
