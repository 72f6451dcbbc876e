use thiserror::Error;

/// Invalid indicator configuration.
///
/// Computation itself never fails: the engine answers degenerate input with
/// undefined entries. These errors are for the configuration layer, so
/// chart controls can reject a setting before it reaches the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A windowed indicator was configured with a zero period.
    #[error("{indicator} period must be positive")]
    ZeroPeriod { indicator: &'static str },

    /// Bollinger multiplier that is zero, negative, NaN or infinite.
    #[error("standard deviation multiplier must be positive and finite, got {0}")]
    InvalidStdDev(f64),

    /// Overlay key with an unrecognised indicator name.
    #[error("unknown indicator: {0}")]
    UnknownIndicator(String),

    /// Overlay key whose parameter could not be parsed.
    #[error("invalid {indicator} parameter: {value:?}")]
    InvalidParameter {
        indicator: &'static str,
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            ConfigError::ZeroPeriod { indicator: "SMA" }.to_string(),
            "SMA period must be positive"
        );
        assert_eq!(
            ConfigError::InvalidStdDev(-1.0).to_string(),
            "standard deviation multiplier must be positive and finite, got -1"
        );
        assert_eq!(
            ConfigError::UnknownIndicator("vwap".into()).to_string(),
            "unknown indicator: vwap"
        );
        assert_eq!(
            ConfigError::InvalidParameter {
                indicator: "RSI",
                value: "x".into()
            }
            .to_string(),
            "invalid RSI parameter: \"x\""
        );
    }
}
