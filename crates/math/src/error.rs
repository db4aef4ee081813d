//! Error types for numeric kernels.

/// Errors that can occur in the numeric kernels.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MathError {
    /// Window length of zero.
    #[error("invalid window: {0} (must be positive)")]
    InvalidWindow(usize),

    /// Seasonal period of zero.
    #[error("invalid seasonal period: {0} (must be positive)")]
    InvalidPeriod(usize),

    /// Decay factor outside (0, 1].
    #[error("invalid alpha: {0} (must be in (0, 1])")]
    InvalidAlpha(f64),

    /// Non-positive or non-finite cycle length.
    #[error("invalid cycle length: {0} (must be positive and finite)")]
    InvalidCycle(f64),

    /// Zero harmonics requested.
    #[error("number of harmonics must be positive")]
    NoHarmonics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = MathError::InvalidAlpha(1.5);
        assert!(err.to_string().contains("1.5"));

        let err = MathError::InvalidWindow(0);
        assert!(err.to_string().contains("positive"));
    }
}
