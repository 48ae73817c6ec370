#![forbid(unsafe_code)]

use rclass_core::ConfigError;
use std::fmt;

/// Errors from `bind`, raised before any listener is registered.
#[derive(Debug, Clone, PartialEq)]
pub enum BindError {
    /// Options were rejected by the core.
    Config(ConfigError),
    /// Options were neither an object nor a JSON string.
    InvalidOptions(String),
    /// The selector matched no HTML elements.
    NoMatch { selector: String },
    /// `querySelectorAll` rejected the selector.
    InvalidSelector { selector: String, reason: String },
    /// The element is not attached to a document.
    Detached,
    /// Target is not a selector, an `HTMLElement`, or `window`.
    InvalidTarget,
    /// No global `window` (e.g. running in a worker).
    NoWindow,
    /// The window has no document or document element.
    NoDocument,
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid breakpoint config: {err}"),
            Self::InvalidOptions(msg) => write!(f, "invalid options: {msg}"),
            Self::NoMatch { selector } => write!(f, "selector {selector:?} matched no elements"),
            Self::InvalidSelector { selector, reason } => {
                write!(f, "invalid selector {selector:?}: {reason}")
            }
            Self::Detached => write!(f, "element is not attached to a document"),
            Self::InvalidTarget => {
                write!(f, "target must be a selector string, an HTMLElement, or window")
            }
            Self::NoWindow => write!(f, "no global window available"),
            Self::NoDocument => write!(f, "window has no document element"),
        }
    }
}

impl std::error::Error for BindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for BindError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
