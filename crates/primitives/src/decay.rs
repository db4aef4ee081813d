//! Exponential decay specifications.

use serde::{Deserialize, Serialize};

/// Errors raised while building a [`DecaySpec`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecayError {
    /// Both alphas and spans were supplied.
    #[error("both alphas and spans supplied; give exactly one")]
    Both,

    /// Neither alphas nor spans were supplied.
    #[error("neither alphas nor spans supplied; give exactly one")]
    Neither,

    /// An alpha outside (0, 1].
    #[error("alpha {0} outside (0, 1]")]
    InvalidAlpha(f64),

    /// A span below 1.
    #[error("span {0} must be >= 1")]
    InvalidSpan(f64),
}

/// Decay parameterisation for an exponentially weighted moving average.
///
/// Alpha and span describe the same smoother, related by
/// `alpha = 2 / (1 + span)`. A `DecaySpec` carries exactly one representation, which
/// also determines the generated column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecaySpec {
    /// Decay factors in (0, 1].
    Alpha(Vec<f64>),
    /// Equivalent spans, each >= 1.
    Span(Vec<f64>),
}

impl DecaySpec {
    /// Build a spec from optional alpha and span sets.
    ///
    /// # Errors
    /// Returns `DecayError::Both` or `DecayError::Neither` unless exactly one
    /// set is given, and a value error when a parameter is out of range.
    pub fn from_options(
        alphas: Option<Vec<f64>>,
        spans: Option<Vec<f64>>,
    ) -> Result<Self, DecayError> {
        let spec = match (alphas, spans) {
            (Some(_), Some(_)) => return Err(DecayError::Both),
            (None, None) => return Err(DecayError::Neither),
            (Some(a), None) => Self::Alpha(a),
            (None, Some(s)) => Self::Span(s),
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Check every parameter is in range.
    ///
    /// # Errors
    /// Returns the first out-of-range parameter.
    pub fn validate(&self) -> Result<(), DecayError> {
        match self {
            Self::Alpha(alphas) => {
                if let Some(&a) = alphas.iter().find(|&&a| !(a > 0.0 && a <= 1.0)) {
                    return Err(DecayError::InvalidAlpha(a));
                }
            }
            Self::Span(spans) => {
                if let Some(&s) = spans.iter().find(|&&s| !(s.is_finite() && s >= 1.0)) {
                    return Err(DecayError::InvalidSpan(s));
                }
            }
        }
        Ok(())
    }

    /// Label used in column names: `alpha` or `span`.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Alpha(_) => "alpha",
            Self::Span(_) => "span",
        }
    }

    /// Parameters as supplied, paired with their decay factor.
    #[must_use]
    pub fn params(&self) -> Vec<(f64, f64)> {
        match self {
            Self::Alpha(alphas) => alphas.iter().map(|&a| (a, a)).collect(),
            Self::Span(spans) => spans.iter().map(|&s| (s, span_to_alpha(s))).collect(),
        }
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Alpha(v) | Self::Span(v) => v.len(),
        }
    }

    /// Check if no parameters are given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Convert a span to its decay factor.
fn span_to_alpha(span: f64) -> f64 {
    2.0 / (1.0 + span)
}
