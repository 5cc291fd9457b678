//! Error types for config-remedy

use std::io;
use thiserror::Error;

use crate::driver::Platform;

/// Config-remedy error type
#[derive(Error, Debug)]
pub enum ConfigRemedyError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Regex compilation error from a rule pattern
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Parsing error (e.g. an unterminated banner)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Dump restore error
    #[error("Dump error: {0}")]
    Dump(String),

    /// Negation error (text cannot be toggled on this platform)
    #[error("Negation error: {0}")]
    Negation(String),

    /// The requested platform is not in the driver registry
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// The two sides of a workflow were parsed with different drivers
    #[error("Mismatched drivers: {left} vs {right}")]
    MismatchedDrivers {
        /// Platform of the running configuration
        left: Platform,
        /// Platform of the generated configuration
        right: Platform,
    },
}

/// Config-remedy result type
pub type Result<T> = std::result::Result<T, ConfigRemedyError>;
