#![forbid(unsafe_code)]

use serde::Serialize;
use serde_json::json;
use std::collections::VecDeque;

const TRANSITION_LOG_CAPACITY: usize = 512;

/// One class swap performed by a watcher.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassTransition {
    pub seq: u64,
    /// Width that triggered the swap.
    pub width: f64,
    /// Class removed, if one was active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Class added.
    pub to: String,
}

impl ClassTransition {
    /// Serialize one JSONL transition line for deterministic diagnostics.
    #[must_use]
    pub fn to_jsonl_line(&self, run_id: &str) -> String {
        let record = ClassTransitionJsonl {
            schema_version: "rclass-jsonl-v1",
            event: "breakpoint_class_transition",
            run_id,
            transition_seq: self.seq,
            width: self.width,
            from_class: self.from.as_deref(),
            to_class: &self.to,
        };
        match serde_json::to_string(&record) {
            Ok(line) => line,
            Err(error) => serde_json::to_string(&json!({
                "schema_version": "rclass-jsonl-v1",
                "event": "breakpoint_class_transition_encode_error",
                "run_id": run_id,
                "transition_seq": self.seq,
                "error": error.to_string(),
            }))
            .unwrap_or_else(|_| {
                "{\"schema_version\":\"rclass-jsonl-v1\",\"event\":\"breakpoint_class_transition_encode_error\"}".to_owned()
            }),
        }
    }
}

#[derive(Serialize)]
struct ClassTransitionJsonl<'a> {
    schema_version: &'static str,
    event: &'static str,
    run_id: &'a str,
    transition_seq: u64,
    width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    from_class: Option<&'a str>,
    to_class: &'a str,
}

/// Bounded ring of recent transitions; the oldest entry is evicted first.
#[derive(Debug, Clone, Default)]
pub struct TransitionLog {
    next_seq: u64,
    entries: VecDeque<ClassTransition>,
}

impl TransitionLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, width: f64, from: Option<String>, to: String) -> &ClassTransition {
        self.next_seq += 1;
        if self.entries.len() >= TRANSITION_LOG_CAPACITY {
            let _ = self.entries.pop_front();
        }
        self.entries.push_back(ClassTransition {
            seq: self.next_seq,
            width,
            from,
            to,
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassTransition> + '_ {
        self.entries.iter()
    }

    #[must_use]
    pub fn last(&self) -> Option<&ClassTransition> {
        self.entries.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total swaps ever recorded, including evicted ones.
    #[must_use]
    pub fn total_recorded(&self) -> u64 {
        self.next_seq
    }

    pub fn drain(&mut self) -> Vec<ClassTransition> {
        self.entries.drain(..).collect()
    }

    #[must_use]
    pub fn drain_jsonl(&mut self, run_id: &str) -> Vec<String> {
        self.drain()
            .into_iter()
            .map(|transition| transition.to_jsonl_line(run_id))
            .collect()
    }
}
