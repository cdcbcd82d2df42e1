//! Error types for loading and validating the fireworks configuration.

use std::fmt;

/// Errors that can occur while reading or validating a [`FireworksConfig`].
///
/// [`FireworksConfig`]: crate::config::FireworksConfig
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    Io(std::io::Error),
    /// The config file is not valid JSON for the config schema.
    Parse(serde_json::Error),
    /// A palette entry is not a `#rrggbb` color.
    InvalidColor(String),
    /// The palette has no colors to pick from.
    EmptyPalette,
    /// A sampling range is empty or inverted.
    EmptyRange(&'static str),
    /// A probability lies outside `[0, 1]`.
    InvalidChance(f32),
    /// The show interval must be positive.
    InvalidInterval,
    /// A numeric setting is not finite or lies outside its allowed bounds.
    OutOfBounds(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::InvalidColor(s) => {
                write!(f, "Invalid palette color {:?}, expected #rrggbb", s)
            }
            ConfigError::EmptyPalette => write!(f, "Palette must contain at least one color"),
            ConfigError::EmptyRange(name) => write!(f, "Range `{}` is empty", name),
            ConfigError::InvalidChance(p) => {
                write!(f, "Streak chance {} is outside of [0, 1]", p)
            }
            ConfigError::InvalidInterval => write!(f, "Show interval must be greater than zero"),
            ConfigError::OutOfBounds(name) => write!(f, "Value `{}` is out of bounds", name),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}
