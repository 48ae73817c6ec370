#![forbid(unsafe_code)]

//! Per-element watcher: measure, resolve, swap the class.
//!
//! The execution model is:
//! ```text
//! init()
//!   → build BreakpointTable from options    // validation errors surface here
//!   → adopt a pre-existing breakpoint class // one DOM scan, then never again
//!   → evaluate()                            // first class applied synchronously
//!   → subscribe to resize                   // each event re-runs evaluate()
//! ```
//!
//! The active class is authoritative internal state. It changes only inside
//! [`Watcher::evaluate`], together with the matching class-list mutation, so
//! repeated evaluations at the same width never touch the element.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::breakpoint::BreakpointTable;
use crate::config::WatcherOptions;
use crate::error::ConfigError;
use crate::host::{ClassTarget, ResizeSource};
use crate::transition::{ClassTransition, TransitionLog};

/// Lifecycle of a watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WatcherPhase {
    Uninitialized,
    Active,
    Disposed,
}

impl WatcherPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Active => "active",
            Self::Disposed => "disposed",
        }
    }
}

/// Width and class observed by the most recent evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WatcherState {
    pub current_width: f64,
    pub active: Option<String>,
}

/// Breakpoint state machine for a single element.
///
/// A `Watcher` does not listen for anything by itself; [`WatcherHandle`] wires
/// it to a [`ResizeSource`]. Use it directly when the host drives evaluation.
#[derive(Debug)]
pub struct Watcher<E: ClassTarget> {
    element: E,
    table: BreakpointTable,
    state: WatcherState,
    phase: WatcherPhase,
    transitions: TransitionLog,
}

impl<E: ClassTarget> Watcher<E> {
    /// Validate options and build the table. Nothing touches the element yet.
    pub fn new(element: E, options: &WatcherOptions) -> Result<Self, ConfigError> {
        let table = options.build_table()?;
        Ok(Self {
            element,
            table,
            state: WatcherState::default(),
            phase: WatcherPhase::Uninitialized,
            transitions: TransitionLog::new(),
        })
    }

    /// Adopt any existing breakpoint class, then run the first evaluation.
    ///
    /// Calling this on an active or disposed watcher does nothing.
    pub fn activate(&mut self) -> Option<&ClassTransition> {
        if self.phase != WatcherPhase::Uninitialized {
            return None;
        }
        self.state.active = self.detect_existing_class();
        self.phase = WatcherPhase::Active;
        info!(
            breakpoints = self.table.len(),
            adopted = self.state.active.as_deref().unwrap_or(""),
            "watcher activated"
        );
        self.evaluate()
    }

    /// Measure, resolve, and swap the class if the tier changed.
    ///
    /// Returns the transition when the class list was mutated.
    pub fn evaluate(&mut self) -> Option<&ClassTransition> {
        if self.phase != WatcherPhase::Active {
            return None;
        }
        let width = self.measure_width();
        self.state.current_width = width;
        let resolved = self.table.resolve(width).to_owned();
        debug!(width, resolved = %resolved, "evaluated breakpoint");
        self.apply_class(width, resolved)
    }

    /// Validate `options` and swap in a new table, then re-evaluate.
    ///
    /// On error the current table and class stay untouched. A class from the
    /// old table never survives the re-evaluation unless the new table
    /// resolves to the same name, and classes of the new table already on the
    /// element (other than the active one) are stripped first.
    pub fn rebind(&mut self, options: &WatcherOptions) -> Result<(), ConfigError> {
        let table = options.build_table()?;
        info!(breakpoints = table.len(), "watcher rebound");
        self.table = table;
        if self.phase == WatcherPhase::Active {
            self.strip_foreign_classes();
            self.evaluate();
        }
        Ok(())
    }

    /// Remove the active class and stop reacting to evaluations.
    pub fn dispose(&mut self) {
        if self.phase == WatcherPhase::Disposed {
            return;
        }
        if let Some(active) = self.state.active.take() {
            self.element.remove_class(&active);
        }
        self.phase = WatcherPhase::Disposed;
        info!("watcher disposed");
    }

    #[must_use]
    pub fn active_breakpoint(&self) -> Option<&str> {
        self.state.active.as_deref()
    }

    #[must_use]
    pub fn current_width(&self) -> f64 {
        self.state.current_width
    }

    #[must_use]
    pub fn state(&self) -> &WatcherState {
        &self.state
    }

    #[must_use]
    pub const fn phase(&self) -> WatcherPhase {
        self.phase
    }

    #[must_use]
    pub fn table(&self) -> &BreakpointTable {
        &self.table
    }

    #[must_use]
    pub fn element(&self) -> &E {
        &self.element
    }

    #[must_use]
    pub fn transitions(&self) -> &TransitionLog {
        &self.transitions
    }

    pub fn transitions_mut(&mut self) -> &mut TransitionLog {
        &mut self.transitions
    }

    fn measure_width(&self) -> f64 {
        let width = self.element.outer_width();
        if width.is_finite() { width.max(0.0) } else { 0.0 }
    }

    /// Last configured class already on the element, in configuration order.
    ///
    /// Any other configured classes present are stripped so that exactly one
    /// breakpoint class survives the first swap.
    fn detect_existing_class(&self) -> Option<String> {
        let present: Vec<&String> = self
            .table
            .config_order()
            .iter()
            .filter(|name| self.element.has_class(name))
            .collect();
        let (adopted, stale) = present.split_last()?;
        for name in stale {
            debug!(class = %name, "stripping extra breakpoint class");
            self.element.remove_class(name);
        }
        Some((*adopted).clone())
    }

    /// Remove configured classes the watcher does not own.
    fn strip_foreign_classes(&self) {
        let active = self.state.active.as_deref();
        for name in self.table.config_order() {
            if Some(name.as_str()) != active && self.element.has_class(name) {
                debug!(class = %name, "stripping breakpoint class not owned by watcher");
                self.element.remove_class(name);
            }
        }
    }

    fn apply_class(&mut self, width: f64, resolved: String) -> Option<&ClassTransition> {
        if self.state.active.as_deref() == Some(resolved.as_str()) {
            return None;
        }
        let previous = self.state.active.take();
        if let Some(previous) = previous.as_deref() {
            self.element.remove_class(previous);
        }
        self.element.add_class(&resolved);
        debug!(
            from = previous.as_deref().unwrap_or(""),
            to = %resolved,
            width,
            "breakpoint class swapped"
        );
        self.state.active = Some(resolved.clone());
        Some(self.transitions.record(width, previous, resolved))
    }
}

/// A watcher subscribed to a resize source.
///
/// Dropping the handle unsubscribes but leaves the class on the element;
/// [`dispose`](Self::dispose) also removes it.
pub struct WatcherHandle<E: ClassTarget, S> {
    watcher: Rc<RefCell<Watcher<E>>>,
    subscription: Option<S>,
}

impl<E: ClassTarget + 'static, S> WatcherHandle<E, S> {
    /// Build, evaluate once, and subscribe to `source`.
    pub fn init<R>(element: E, source: &R, options: &WatcherOptions) -> Result<Self, ConfigError>
    where
        R: ResizeSource<Subscription = S>,
    {
        let watcher = Watcher::new(element, options)?;
        Ok(Self::start(watcher, source))
    }

    /// Activate an already-validated watcher and subscribe it.
    pub fn start<R>(mut watcher: Watcher<E>, source: &R) -> Self
    where
        R: ResizeSource<Subscription = S>,
    {
        watcher.activate();
        let watcher = Rc::new(RefCell::new(watcher));
        let weak = Rc::downgrade(&watcher);
        let subscription = source.subscribe(Box::new(move || {
            let Some(watcher) = weak.upgrade() else {
                return;
            };
            match watcher.try_borrow_mut() {
                Ok(mut inner) => {
                    inner.evaluate();
                }
                Err(_) => warn!("resize delivered while watcher busy; skipped"),
            }
        }));
        Self {
            watcher,
            subscription: Some(subscription),
        }
    }
}

impl<E: ClassTarget, S> WatcherHandle<E, S> {
    /// Run one evaluation cycle now. Returns whether the class changed.
    pub fn evaluate(&self) -> bool {
        self.watcher.borrow_mut().evaluate().is_some()
    }

    pub fn rebind(&self, options: &WatcherOptions) -> Result<(), ConfigError> {
        self.watcher.borrow_mut().rebind(options)
    }

    /// Unsubscribe and remove the active class.
    pub fn dispose(&mut self) {
        self.subscription = None;
        self.watcher.borrow_mut().dispose();
    }

    #[must_use]
    pub fn active_breakpoint(&self) -> Option<String> {
        self.watcher.borrow().active_breakpoint().map(str::to_owned)
    }

    #[must_use]
    pub fn current_width(&self) -> f64 {
        self.watcher.borrow().current_width()
    }

    #[must_use]
    pub fn phase(&self) -> WatcherPhase {
        self.watcher.borrow().phase()
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Borrow the underlying watcher.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a resize callback of the same watcher.
    #[must_use]
    pub fn watcher(&self) -> Ref<'_, Watcher<E>> {
        self.watcher.borrow()
    }

    #[must_use]
    pub fn drain_transition_jsonl(&self, run_id: &str) -> Vec<String> {
        self.watcher
            .borrow_mut()
            .transitions_mut()
            .drain_jsonl(run_id)
    }
}

impl<E: ClassTarget + std::fmt::Debug, S> std::fmt::Debug for WatcherHandle<E, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("watcher", &self.watcher)
            .field("subscribed", &self.subscription.is_some())
            .finish()
    }
}
