#![forbid(unsafe_code)]

//! In-memory host for tests and non-browser embedders.
//!
//! [`HeadlessElement`] stands in for a DOM element: a settable width and an
//! ordered class list that records every mutation. [`HeadlessWindow`] stands
//! in for `window`: resize events fire only when the test says so.
//!
//! Both are cheap `Rc` handles; clones observe the same state, so a test can
//! hand one clone to a watcher and keep another for assertions.
//!
//! ```
//! use rclass_core::headless::{HeadlessElement, HeadlessWindow};
//! use rclass_core::{WatcherHandle, WatcherOptions};
//!
//! let element = HeadlessElement::with_width(700.0);
//! let window = HeadlessWindow::new();
//! let handle = WatcherHandle::init(element.clone(), &window, &WatcherOptions::default())
//!     .expect("default options are valid");
//! assert_eq!(element.classes(), ["medium"]);
//!
//! element.set_width(1300.0);
//! window.fire_resize();
//! assert_eq!(element.classes(), ["xlarge"]);
//! # drop(handle);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::host::{ClassTarget, ResizeSource};

/// A class-list edit observed on a [`HeadlessElement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassMutation {
    Added(String),
    Removed(String),
}

#[derive(Debug, Default)]
struct ElementState {
    width: f64,
    classes: Vec<String>,
    mutations: Vec<ClassMutation>,
}

/// Fake element with a settable width and an observable class list.
#[derive(Debug, Clone, Default)]
pub struct HeadlessElement {
    state: Rc<RefCell<ElementState>>,
}

impl HeadlessElement {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_width(width: f64) -> Self {
        let element = Self::new();
        element.set_width(width);
        element
    }

    /// Pre-populate classes without recording mutations, as if set in markup.
    #[must_use]
    pub fn with_classes(self, classes: &[&str]) -> Self {
        self.state
            .borrow_mut()
            .classes
            .extend(classes.iter().map(|c| (*c).to_owned()));
        self
    }

    pub fn set_width(&self, width: f64) {
        self.state.borrow_mut().width = width;
    }

    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        self.state.borrow().classes.clone()
    }

    #[must_use]
    pub fn mutations(&self) -> Vec<ClassMutation> {
        self.state.borrow().mutations.clone()
    }

    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.state.borrow().mutations.len()
    }

    pub fn clear_mutations(&self) {
        self.state.borrow_mut().mutations.clear();
    }
}

impl ClassTarget for HeadlessElement {
    fn outer_width(&self) -> f64 {
        self.state.borrow().width
    }

    fn has_class(&self, class: &str) -> bool {
        self.state.borrow().classes.iter().any(|c| c == class)
    }

    fn add_class(&self, class: &str) {
        let mut state = self.state.borrow_mut();
        state.mutations.push(ClassMutation::Added(class.to_owned()));
        if !state.classes.iter().any(|c| c == class) {
            state.classes.push(class.to_owned());
        }
    }

    fn remove_class(&self, class: &str) {
        let mut state = self.state.borrow_mut();
        state.mutations.push(ClassMutation::Removed(class.to_owned()));
        state.classes.retain(|c| c != class);
    }
}

type Listener = Rc<RefCell<Box<dyn FnMut()>>>;

#[derive(Default)]
struct WindowState {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(u64, Listener)>>,
}

/// Fake window; [`fire_resize`](Self::fire_resize) runs every live listener.
#[derive(Clone, Default)]
pub struct HeadlessWindow {
    state: Rc<WindowState>,
}

impl HeadlessWindow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one resize notification to every subscribed listener.
    pub fn fire_resize(&self) {
        // Snapshot first so listeners may subscribe or unsubscribe while running.
        let listeners: Vec<Listener> = self
            .state
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            if let Ok(mut handler) = listener.try_borrow_mut() {
                (*handler)();
            }
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.state.listeners.borrow().len()
    }
}

impl std::fmt::Debug for HeadlessWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessWindow")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Registration on a [`HeadlessWindow`]; dropping it unsubscribes.
pub struct HeadlessSubscription {
    id: u64,
    state: Rc<WindowState>,
}

impl Drop for HeadlessSubscription {
    fn drop(&mut self) {
        self.state
            .listeners
            .borrow_mut()
            .retain(|(id, _)| *id != self.id);
    }
}

impl ResizeSource for HeadlessWindow {
    type Subscription = HeadlessSubscription;

    fn subscribe(&self, handler: Box<dyn FnMut()>) -> HeadlessSubscription {
        let id = self.state.next_id.get();
        self.state.next_id.set(id + 1);
        self.state
            .listeners
            .borrow_mut()
            .push((id, Rc::new(RefCell::new(handler))));
        HeadlessSubscription {
            id,
            state: Rc::clone(&self.state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_records_mutations_and_dedups_classes() {
        let element = HeadlessElement::new().with_classes(&["keep"]);
        element.add_class("a");
        element.add_class("a");
        element.remove_class("missing");
        assert_eq!(element.classes(), ["keep", "a"]);
        assert_eq!(
            element.mutations(),
            [
                ClassMutation::Added("a".to_owned()),
                ClassMutation::Added("a".to_owned()),
                ClassMutation::Removed("missing".to_owned()),
            ]
        );
        element.clear_mutations();
        assert_eq!(element.mutation_count(), 0);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let window = HeadlessWindow::new();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let sub = window.subscribe(Box::new(move || counter.set(counter.get() + 1)));
        window.fire_resize();
        assert_eq!(window.listener_count(), 1);
        drop(sub);
        window.fire_resize();
        assert_eq!(hits.get(), 1);
        assert_eq!(window.listener_count(), 0);
    }
}
