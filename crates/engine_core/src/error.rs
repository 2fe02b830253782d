//! Errors raised while validating startup configuration.

use thiserror::Error;

/// A configuration value that would make terrain or collision math meaningless.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    /// Check that `value` is finite and strictly greater than zero.
    pub fn require_positive(field: &'static str, value: f64) -> Result<(), Self> {
        if !value.is_finite() {
            return Err(Self::NotFinite { field, value });
        }
        if value <= 0.0 {
            return Err(Self::NotPositive { field, value });
        }
        Ok(())
    }

    /// Check that `value` is finite (any sign).
    pub fn require_finite(field: &'static str, value: f64) -> Result<(), Self> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(Self::NotFinite { field, value })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_check() {
        assert!(ConfigError::require_positive("size", 1.0).is_ok());
        assert_eq!(
            ConfigError::require_positive("size", 0.0),
            Err(ConfigError::NotPositive { field: "size", value: 0.0 })
        );
        assert!(matches!(
            ConfigError::require_positive("size", f64::NAN),
            Err(ConfigError::NotFinite { .. })
        ));
    }

    #[test]
    fn error_messages_name_the_field() {
        let err = ConfigError::NotPositive { field: "radius", value: -1.0 };
        assert_eq!(err.to_string(), "radius must be positive, got -1");
    }
}
