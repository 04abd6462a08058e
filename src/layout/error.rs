//! Error types for the layout engine

use thiserror::Error;

/// Errors that abort a layout pass
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    /// No style is defined for a level the pass visits
    #[error("no level style defined for level {level}")]
    MissingLevelStyle { level: usize },

    /// Layout type tag that names none of the five strategies
    #[error("unknown layout type '{tag}' (valid types: horizontal, vertical, taproot, classic, outline)")]
    UnknownLayoutType { tag: String },

    /// Configuration key that the cascade does not know
    #[error("unknown configuration key '{key}'")]
    UnknownConfigKey { key: String },

    /// Configuration value of the wrong kind or out of range
    #[error("invalid value '{value}' for '{key}': {reason}")]
    InvalidConfigValue {
        key: String,
        value: String,
        reason: String,
    },
}

impl LayoutError {
    /// Create a missing level style error
    pub fn missing_level(level: usize) -> Self {
        Self::MissingLevelStyle { level }
    }

    /// Create an unknown layout type error
    pub fn unknown_layout_type(tag: impl Into<String>) -> Self {
        Self::UnknownLayoutType { tag: tag.into() }
    }

    /// Create an unknown configuration key error
    pub fn unknown_key(key: impl Into<String>) -> Self {
        Self::UnknownConfigKey { key: key.into() }
    }

    /// Create an invalid configuration value error
    pub fn invalid_value(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfigValue {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}
