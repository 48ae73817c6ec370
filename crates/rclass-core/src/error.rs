#![forbid(unsafe_code)]

use std::fmt;

/// Errors raised while turning user configuration into a breakpoint table.
///
/// All of these surface at bind time; a watcher that was built successfully
/// never fails afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The breakpoint mapping has no entries.
    Empty,
    /// A threshold is negative, NaN, or infinite.
    InvalidThreshold { name: String, value: f64 },
    /// A threshold is not a number at all (e.g. a string in JS options).
    NonNumericThreshold { name: String },
    /// A name cannot be used as a class token (empty or contains whitespace).
    InvalidClassName { name: String },
    /// Options JSON could not be decoded.
    Json(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "breakpoint mapping must contain at least one entry"),
            Self::InvalidThreshold { name, value } => write!(
                f,
                "breakpoint {name:?} has invalid threshold {value}: expected a finite, non-negative pixel width"
            ),
            Self::NonNumericThreshold { name } => {
                write!(f, "breakpoint {name:?} has a non-numeric threshold")
            }
            Self::InvalidClassName { name } => {
                write!(f, "breakpoint name {name:?} is not a valid class token")
            }
            Self::Json(msg) => write!(f, "options JSON error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
