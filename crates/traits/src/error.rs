//! Error taxonomy shared by the feature components.

use gridlag_math::MathError;
use gridlag_primitives::DecayError;
use polars::prelude::PolarsError;

/// Errors that can occur while generating features.
///
/// Insufficient history is not an error: it yields null feature values.
#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    /// Missing or invalid series identifier, or timestamps not strictly
    /// increasing inside a series.
    #[error("ungrouped input: {0}")]
    UngroupedInput(String),

    /// Mutually exclusive parameters supplied together, or none supplied.
    #[error("conflicting parameters: {0}")]
    ConflictingParameter(String),

    /// Fourier cycle length unusable for the observed data.
    #[error("invalid cycle for column '{column}': {reason}")]
    InvalidCycle {
        /// Encoded column.
        column: String,
        /// What is wrong with the cycle length.
        reason: String,
    },

    /// Missing required column.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// Invalid parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Numeric kernel error.
    #[error("math error: {0}")]
    Math(#[from] MathError),

    /// Polars error.
    #[error("data processing error: {0}")]
    Polars(#[from] PolarsError),
}

impl From<DecayError> for FeatureError {
    fn from(err: DecayError) -> Self {
        match err {
            DecayError::Both | DecayError::Neither => Self::ConflictingParameter(err.to_string()),
            DecayError::InvalidAlpha(_) | DecayError::InvalidSpan(_) => {
                Self::InvalidParameter(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FeatureError::InvalidCycle {
            column: "timestamp_hour".to_string(),
            reason: "observed value 24 exceeds max_value 23".to_string(),
        };
        assert!(err.to_string().contains("timestamp_hour"));
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn decay_conflict_maps_to_conflicting_parameter() {
        let err = FeatureError::from(DecayError::Both);
        assert!(matches!(err, FeatureError::ConflictingParameter(_)));

        let err = FeatureError::from(DecayError::InvalidSpan(0.5));
        assert!(matches!(err, FeatureError::InvalidParameter(_)));
    }
}
