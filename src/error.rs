//! Configuration errors
//!
//! The simulation itself never fails: boundary exits, stuck overlaps and pool
//! overflow are all represented as mover state. Only loading settings can go wrong.

use std::fmt;

/// Error produced while loading or validating [`crate::Settings`]
#[derive(Debug)]
pub enum ConfigError {
    /// Settings JSON could not be parsed
    Parse(serde_json::Error),

    /// A value is outside its accepted range
    OutOfRange {
        /// Settings field name
        field: &'static str,
        /// The rejected value
        value: f64,
        /// Human-readable accepted range
        expected: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(err) => write!(f, "invalid settings JSON: {err}"),
            ConfigError::OutOfRange {
                field,
                value,
                expected,
            } => write!(f, "setting `{field}` = {value} is out of range (expected {expected})"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(err) => Some(err),
            ConfigError::OutOfRange { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message_names_field() {
        let err = ConfigError::OutOfRange {
            field: "dampening",
            value: 1.5,
            expected: "0.0..=1.0",
        };
        let msg = err.to_string();
        assert!(msg.contains("dampening"));
        assert!(msg.contains("1.5"));
    }

    #[test]
    fn test_parse_error_has_source() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = ConfigError::from(json_err);
        assert!(std::error::Error::source(&err).is_some());
    }
}
