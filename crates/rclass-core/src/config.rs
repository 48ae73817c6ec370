#![forbid(unsafe_code)]

use serde::Deserialize;

use crate::breakpoint::{BreakpointConfig, BreakpointTable};
use crate::error::ConfigError;

/// Options accepted by `bind`.
///
/// `breakpoints` replaces the default table entirely; individual tiers are
/// never merged with the defaults. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WatcherOptions {
    pub breakpoints: Option<BreakpointConfig>,
}

impl WatcherOptions {
    #[must_use]
    pub fn with_breakpoints(breakpoints: BreakpointConfig) -> Self {
        Self {
            breakpoints: Some(breakpoints),
        }
    }

    /// Decode options from a JSON object such as `{"breakpoints": {"a": 100}}`.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))
    }

    /// Use `fallback` as the mapping when none was given.
    #[must_use]
    pub fn or_breakpoints(mut self, fallback: &BreakpointConfig) -> Self {
        if self.breakpoints.is_none() {
            self.breakpoints = Some(fallback.clone());
        }
        self
    }

    /// The configured mapping, or the default tiers when none was given.
    #[must_use]
    pub fn breakpoint_config(&self) -> BreakpointConfig {
        self.breakpoints
            .clone()
            .unwrap_or_else(BreakpointConfig::defaults)
    }

    /// Validate and sort the effective breakpoint mapping.
    pub fn build_table(&self) -> Result<BreakpointTable, ConfigError> {
        match &self.breakpoints {
            Some(config) => BreakpointTable::build(config),
            None => Ok(BreakpointTable::default()),
        }
    }
}
