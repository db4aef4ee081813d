//! Feature column naming.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{AggKind, CalendarAttribute};

/// Name of a generated feature column.
///
/// Every constructor encodes the source column, the transformation and its
/// parameters, so provenance can be read back from the name alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub struct FeatureName(pub String);

impl FeatureName {
    /// `{column}_lag_{lag}`
    #[must_use]
    pub fn lag(column: &str, lag: usize) -> Self {
        Self(format!("{column}_lag_{lag}"))
    }

    /// `{column}_rolling_{window}_{kind}`
    #[must_use]
    pub fn rolling(column: &str, window: usize, kind: AggKind) -> Self {
        Self(format!("{column}_rolling_{window}_{kind}"))
    }

    /// `{column}_{period}_seasonal_rolling_{window}_{kind}`
    #[must_use]
    pub fn seasonal_rolling(column: &str, period: usize, window: usize, kind: AggKind) -> Self {
        Self(format!("{column}_{period}_seasonal_rolling_{window}_{kind}"))
    }

    /// `{column}_ewma_{label}_{param}` where label is `alpha` or `span`.
    #[must_use]
    pub fn ewma(column: &str, label: &str, param: f64) -> Self {
        Self(format!("{column}_ewma_{label}_{param}"))
    }

    /// `{prefix}{attribute}`
    #[must_use]
    pub fn calendar(prefix: &str, attribute: CalendarAttribute) -> Self {
        Self(format!("{prefix}{}", attribute.as_str()))
    }

    /// `{prefix}elapsed`
    #[must_use]
    pub fn elapsed(prefix: &str) -> Self {
        Self(format!("{prefix}elapsed"))
    }

    /// `{column}_sin_{k}`
    #[must_use]
    pub fn fourier_sin(column: &str, k: usize) -> Self {
        Self(format!("{column}_sin_{k}"))
    }

    /// `{column}_cos_{k}`
    #[must_use]
    pub fn fourier_cos(column: &str, k: usize) -> Self {
        Self(format!("{column}_cos_{k}"))
    }

    /// Get the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<FeatureName> for String {
    fn from(name: FeatureName) -> Self {
        name.0
    }
}

/// Storage width for generated numeric columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericWidth {
    /// Keep the natural 64-bit (or source) width.
    #[default]
    Native,
    /// Narrow floats to Float32 and integers to Int32.
    Bits32,
}

impl NumericWidth {
    /// Select a width from a "use 32-bit" flag.
    #[must_use]
    pub const fn from_flag(use_32bit: bool) -> Self {
        if use_32bit { Self::Bits32 } else { Self::Native }
    }

    /// Whether narrowing is requested.
    #[must_use]
    pub const fn is_narrow(&self) -> bool {
        matches!(self, Self::Bits32)
    }
}
