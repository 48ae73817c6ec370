#![forbid(unsafe_code)]

//! Breakpoint configuration and the threshold-sorted lookup table.
//!
//! A [`BreakpointConfig`] is what the user writes: an insertion-ordered
//! mapping of class name to pixel threshold. A [`BreakpointTable`] is what the
//! watcher resolves against: the same entries validated and sorted ascending by
//! threshold, with names and thresholds kept index-aligned.
//!
//! # Resolution
//!
//! A width resolves to the highest breakpoint whose threshold is `<= width`.
//! Widths below every threshold fall back to the lowest breakpoint, so some
//! class is always applied.
//!
//! ```
//! use rclass_core::BreakpointTable;
//!
//! let table = BreakpointTable::default();
//! assert_eq!(table.resolve(0.0), "small");
//! assert_eq!(table.resolve(640.0), "medium");
//! assert_eq!(table.resolve(1199.0), "large");
//! assert_eq!(table.resolve(5000.0), "xlarge");
//! ```

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;

/// Tiers used when no `breakpoints` option is given.
pub const DEFAULT_BREAKPOINTS: [(&str, f64); 4] = [
    ("small", 480.0),
    ("medium", 640.0),
    ("large", 960.0),
    ("xlarge", 1200.0),
];

/// A named width threshold. The name doubles as the CSS class token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakpoint {
    pub name: String,
    pub threshold: f64,
}

/// Insertion-ordered mapping of breakpoint name to pixel threshold.
///
/// Inserting a name that is already present replaces its threshold but keeps
/// its original position, matching how a JS object literal treats duplicate
/// keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BreakpointConfig {
    entries: Vec<(String, f64)>,
}

impl BreakpointConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The four-tier default table.
    #[must_use]
    pub fn defaults() -> Self {
        DEFAULT_BREAKPOINTS.into_iter().collect()
    }

    /// Insert or replace a breakpoint. Returns the replaced threshold, if any.
    pub fn insert(&mut self, name: impl Into<String>, threshold: f64) -> Option<f64> {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            tracing::debug!(name = %name, threshold, "duplicate breakpoint name, last value wins");
            return Some(std::mem::replace(&mut entry.1, threshold));
        }
        self.entries.push((name, threshold));
        None
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, threshold: f64) -> Self {
        self.insert(name, threshold);
        self
    }

    /// Entries in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries.iter().map(|(name, t)| (name.as_str(), *t))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for BreakpointConfig {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut config = Self::new();
        for (name, threshold) in iter {
            config.insert(name, threshold);
        }
        config
    }
}

impl Serialize for BreakpointConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, threshold) in &self.entries {
            map.serialize_entry(name, threshold)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for BreakpointConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ConfigVisitor)
    }
}

/// Reads a JSON object in document order; `serde_json::Map` would sort keys.
struct ConfigVisitor;

impl<'de> Visitor<'de> for ConfigVisitor {
    type Value = BreakpointConfig;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of breakpoint name to pixel threshold")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut config = BreakpointConfig::new();
        while let Some((name, threshold)) = access.next_entry::<String, f64>()? {
            config.insert(name, threshold);
        }
        Ok(config)
    }
}

/// Validated breakpoints sorted ascending by threshold.
///
/// Immutable once built. `names()[i]` and `thresholds()[i]` describe the same
/// breakpoint; the table is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakpointTable {
    names: Vec<String>,
    thresholds: Vec<f64>,
    config_order: Vec<String>,
}

impl Default for BreakpointTable {
    fn default() -> Self {
        Self {
            names: DEFAULT_BREAKPOINTS.iter().map(|(n, _)| (*n).to_owned()).collect(),
            thresholds: DEFAULT_BREAKPOINTS.iter().map(|(_, t)| *t).collect(),
            config_order: DEFAULT_BREAKPOINTS.iter().map(|(n, _)| (*n).to_owned()).collect(),
        }
    }
}

impl BreakpointTable {
    /// Validate `config` and sort it ascending by threshold.
    ///
    /// Equal thresholds keep their configuration order.
    pub fn build(config: &BreakpointConfig) -> Result<Self, ConfigError> {
        if config.is_empty() {
            return Err(ConfigError::Empty);
        }
        for (name, threshold) in config.iter() {
            validate_entry(name, threshold)?;
        }

        let mut sorted: Vec<(&str, f64)> = config.iter().collect();
        // `sort_by` is stable, which gives tie-breaking by config order.
        sorted.sort_by(|a, b| a.1.total_cmp(&b.1));

        Ok(Self {
            names: sorted.iter().map(|(n, _)| (*n).to_owned()).collect(),
            thresholds: sorted.iter().map(|(_, t)| *t).collect(),
            config_order: config.iter().map(|(n, _)| n.to_owned()).collect(),
        })
    }

    /// Index of the breakpoint that `width` falls into.
    ///
    /// Scans from the highest threshold down, skipping every threshold
    /// strictly greater than `width`, and clamps to the lowest tier.
    #[must_use]
    pub fn resolve_index(&self, width: f64) -> usize {
        let width = if width.is_nan() { 0.0 } else { width };
        let mut end = self.thresholds.len();
        while end > 0 && self.thresholds[end - 1] > width {
            end -= 1;
        }
        end.saturating_sub(1)
    }

    /// Name of the breakpoint that `width` falls into.
    #[must_use]
    pub fn resolve(&self, width: f64) -> &str {
        &self.names[self.resolve_index(width)]
    }

    /// Breakpoint at `index` in threshold order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Breakpoint> {
        Some(Breakpoint {
            name: self.names.get(index)?.clone(),
            threshold: *self.thresholds.get(index)?,
        })
    }

    /// Names ascending by threshold.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Thresholds ascending; index-aligned with [`names`](Self::names).
    #[must_use]
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Names in the order they were configured.
    #[must_use]
    pub fn config_order(&self) -> &[String] {
        &self.config_order
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.thresholds.iter().copied())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always `false` for a built table.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn validate_entry(name: &str, threshold: f64) -> Result<(), ConfigError> {
    if name.is_empty() || name.chars().any(|c| c.is_ascii_whitespace()) {
        return Err(ConfigError::InvalidClassName {
            name: name.to_owned(),
        });
    }
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(ConfigError::InvalidThreshold {
            name: name.to_owned(),
            value: threshold,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(entries: &[(&str, f64)]) -> BreakpointTable {
        let config: BreakpointConfig = entries.iter().copied().collect();
        BreakpointTable::build(&config).expect("valid config")
    }

    #[test]
    fn default_table_matches_default_config() {
        let built = BreakpointTable::build(&BreakpointConfig::defaults()).expect("defaults");
        assert_eq!(built, BreakpointTable::default());
        assert_eq!(built.names(), ["small", "medium", "large", "xlarge"]);
        assert_eq!(built.thresholds(), [480.0, 640.0, 960.0, 1200.0]);
    }

    #[test]
    fn build_sorts_ascending_and_keeps_config_order() {
        let t = table(&[("wide", 1000.0), ("narrow", 100.0), ("mid", 500.0)]);
        assert_eq!(t.names(), ["narrow", "mid", "wide"]);
        assert_eq!(t.thresholds(), [100.0, 500.0, 1000.0]);
        assert_eq!(t.config_order(), ["wide", "narrow", "mid"]);
    }

    #[test]
    fn equal_thresholds_keep_input_order() {
        let t = table(&[("b", 300.0), ("a", 100.0), ("c", 300.0)]);
        assert_eq!(t.names(), ["a", "b", "c"]);
        // Tied tiers: the later one wins the scan from the top.
        assert_eq!(t.resolve(300.0), "c");
        assert_eq!(t.resolve(299.0), "a");
    }

    #[test]
    fn duplicate_names_last_value_wins_in_first_position() {
        let mut config = BreakpointConfig::new();
        assert_eq!(config.insert("a", 100.0), None);
        config.insert("b", 200.0);
        assert_eq!(config.insert("a", 300.0), Some(100.0));
        assert_eq!(config.iter().collect::<Vec<_>>(), [("a", 300.0), ("b", 200.0)]);

        let t = BreakpointTable::build(&config).expect("valid");
        assert_eq!(t.names(), ["b", "a"]);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn resolve_default_tiers() {
        let t = BreakpointTable::default();
        assert_eq!(t.resolve(0.0), "small");
        assert_eq!(t.resolve(480.0), "small");
        assert_eq!(t.resolve(481.0), "small");
        assert_eq!(t.resolve(639.9), "small");
        assert_eq!(t.resolve(640.0), "medium");
        assert_eq!(t.resolve(960.0), "large");
        assert_eq!(t.resolve(1199.0), "large");
        assert_eq!(t.resolve(1200.0), "xlarge");
        assert_eq!(t.resolve(2000.0), "xlarge");
    }

    #[test]
    fn resolve_below_every_threshold_falls_back_to_lowest() {
        let t = table(&[("a", 100.0), ("b", 200.0)]);
        assert_eq!(t.resolve_index(50.0), 0);
        assert_eq!(t.resolve(-10.0), "a");
        assert_eq!(t.resolve(f64::NAN), "a");
        assert_eq!(t.resolve(f64::INFINITY), "b");
    }

    #[test]
    fn single_tier_always_resolves_to_itself() {
        let t = table(&[("only", 700.0)]);
        for width in [0.0, 699.0, 700.0, 701.0, 1e9] {
            assert_eq!(t.resolve(width), "only");
        }
    }

    #[test]
    fn empty_config_is_rejected() {
        assert_eq!(
            BreakpointTable::build(&BreakpointConfig::new()),
            Err(ConfigError::Empty)
        );
    }

    #[test]
    fn invalid_thresholds_are_rejected() {
        for bad in [-1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let config = BreakpointConfig::new().with("ok", 10.0).with("bad", bad);
            match BreakpointTable::build(&config) {
                Err(ConfigError::InvalidThreshold { name, .. }) => assert_eq!(name, "bad"),
                other => panic!("expected InvalidThreshold, got {other:?}"),
            }
        }
    }

    #[test]
    fn invalid_class_names_are_rejected() {
        for bad in ["", "two words", "tab\there", "line\n"] {
            let config = BreakpointConfig::new().with(bad, 10.0);
            assert_eq!(
                BreakpointTable::build(&config),
                Err(ConfigError::InvalidClassName {
                    name: bad.to_owned()
                })
            );
        }
    }

    #[test]
    fn config_deserializes_in_document_order() {
        let config: BreakpointConfig =
            serde_json::from_str(r#"{"zeta": 10, "alpha": 5, "mid": 7.5}"#).expect("json");
        assert_eq!(
            config.iter().collect::<Vec<_>>(),
            [("zeta", 10.0), ("alpha", 5.0), ("mid", 7.5)]
        );
        let json = serde_json::to_string(&config).expect("serialize");
        assert_eq!(json, r#"{"zeta":10.0,"alpha":5.0,"mid":7.5}"#);
    }

    #[test]
    fn non_numeric_threshold_fails_to_deserialize() {
        let result = serde_json::from_str::<BreakpointConfig>(r#"{"a": "wide"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn get_and_iter_are_index_aligned() {
        let t = BreakpointTable::default();
        assert_eq!(
            t.get(1),
            Some(Breakpoint {
                name: "medium".to_owned(),
                threshold: 640.0
            })
        );
        assert_eq!(t.get(4), None);
        let pairs: Vec<_> = t.iter().collect();
        assert_eq!(pairs[3], ("xlarge", 1200.0));
        assert!(t.contains("large"));
        assert!(!t.contains("huge"));
    }
}
