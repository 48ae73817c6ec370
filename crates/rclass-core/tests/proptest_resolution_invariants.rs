//! Property-based invariant tests for breakpoint resolution and class swaps.
//!
//! These hold for any valid breakpoint mapping and any width sequence:
//!
//! 1. The built table is sorted ascending and index-aligned with the config.
//! 2. Resolution matches a reference floor lookup (largest threshold <= width,
//!    else the lowest tier).
//! 3. Resolution is monotonic in width.
//! 4. After every evaluation at most one configured class is on the element.
//! 5. Re-evaluating at an unchanged width never mutates the class list.
//! 6. Resolution is order-independent for distinct thresholds.
//! 7. Rebinding to another table leaves exactly one class on the element.

use proptest::prelude::*;
use rclass_core::headless::{HeadlessElement, HeadlessWindow};
use rclass_core::{BreakpointConfig, BreakpointTable, WatcherHandle, WatcherOptions};

// ── Helpers ─────────────────────────────────────────────────────────────

fn config_strategy() -> impl Strategy<Value = BreakpointConfig> {
    proptest::collection::vec(0u32..=3000, 1..=8).prop_map(|thresholds| {
        thresholds
            .into_iter()
            .enumerate()
            .map(|(idx, t)| (format!("bp-{idx}"), f64::from(t)))
            .collect()
    })
}

fn width_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        (0u32..=4000).prop_map(f64::from),
        (0.0f64..4000.0),
        Just(0.0),
    ]
}

fn reference_resolve(table: &BreakpointTable, width: f64) -> usize {
    table
        .thresholds()
        .iter()
        .rposition(|t| *t <= width)
        .unwrap_or(0)
}

fn configured_classes_present(element: &HeadlessElement, table: &BreakpointTable) -> usize {
    element
        .classes()
        .iter()
        .filter(|c| table.contains(c))
        .count()
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn table_is_sorted_and_aligned(config in config_strategy()) {
        let table = BreakpointTable::build(&config).expect("generated configs are valid");
        prop_assert_eq!(table.len(), config.len());
        prop_assert!(table.thresholds().windows(2).all(|w| w[0] <= w[1]));
        for (name, threshold) in table.iter() {
            let configured = config.iter().find(|(n, _)| *n == name).map(|(_, t)| t);
            prop_assert_eq!(configured, Some(threshold));
        }
    }

    #[test]
    fn resolution_matches_reference(config in config_strategy(), width in width_strategy()) {
        let table = BreakpointTable::build(&config).expect("valid");
        prop_assert_eq!(table.resolve_index(width), reference_resolve(&table, width));
    }

    #[test]
    fn resolution_is_monotonic(config in config_strategy(), a in width_strategy(), b in width_strategy()) {
        let table = BreakpointTable::build(&config).expect("valid");
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(table.resolve_index(lo) <= table.resolve_index(hi));
    }

    #[test]
    fn class_exclusivity_and_idempotence(
        config in config_strategy(),
        widths in proptest::collection::vec(width_strategy(), 1..=20),
    ) {
        let table = BreakpointTable::build(&config).expect("valid");
        let element = HeadlessElement::with_width(widths[0]);
        let window = HeadlessWindow::new();
        let handle = WatcherHandle::init(
            element.clone(),
            &window,
            &WatcherOptions::with_breakpoints(config),
        )
        .expect("valid");

        for width in widths {
            element.set_width(width);
            window.fire_resize();
            prop_assert_eq!(configured_classes_present(&element, &table), 1);
            let active = handle.active_breakpoint();
            prop_assert_eq!(active.as_deref(), Some(table.resolve(width)));

            let before = element.mutation_count();
            window.fire_resize();
            prop_assert_eq!(element.mutation_count(), before);
        }
    }

    #[test]
    fn rebind_keeps_a_single_class(
        first in config_strategy(),
        second in config_strategy(),
        width in width_strategy(),
    ) {
        let element = HeadlessElement::with_width(width);
        let window = HeadlessWindow::new();
        let handle = WatcherHandle::init(
            element.clone(),
            &window,
            &WatcherOptions::with_breakpoints(first),
        )
        .expect("valid");

        let table = BreakpointTable::build(&second).expect("valid");
        handle
            .rebind(&WatcherOptions::with_breakpoints(second))
            .expect("valid");
        window.fire_resize();
        prop_assert_eq!(element.classes(), vec![table.resolve(width).to_owned()]);
    }

    #[test]
    fn distinct_thresholds_resolve_independent_of_order(
        thresholds in proptest::collection::btree_set(0u32..=3000, 1..=8),
        width in width_strategy(),
    ) {
        let forward: BreakpointConfig = thresholds
            .iter()
            .map(|t| (format!("t{t}"), f64::from(*t)))
            .collect();
        let reversed: BreakpointConfig = thresholds
            .iter()
            .rev()
            .map(|t| (format!("t{t}"), f64::from(*t)))
            .collect();
        let a = BreakpointTable::build(&forward).expect("valid");
        let b = BreakpointTable::build(&reversed).expect("valid");
        prop_assert_eq!(a.resolve(width), b.resolve(width));
    }
}
