//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// A required environment variable was not set.
    ///
    /// Only the provider URL is required, and only when mock mode is off.
    #[error("missing required environment variable: {name}")]
    MissingEnvVar { name: &'static str },

    /// The search cache must hold at least one entry.
    #[error("cache capacity must be at least 1")]
    ZeroCapacity,

    /// A score threshold outside 0..=100.
    #[error("{name} must be between 0 and 100, got {value}")]
    InvalidThreshold { name: &'static str, value: u8 },

    /// The fallback threshold would be stricter than the live one.
    #[error(
        "fallback threshold ({fallback}) must not exceed the acceptance threshold ({acceptance})"
    )]
    FallbackThresholdTooHigh { fallback: u8, acceptance: u8 },

    /// A setting holds a value that parses but makes no sense.
    #[error("invalid value '{value}' for {name}")]
    InvalidValue { name: &'static str, value: String },
}
