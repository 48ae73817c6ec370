#![forbid(unsafe_code)]

//! Core: breakpoint tables, width resolution, and class-swap bookkeeping.
//!
//! # Role in rclass
//! `rclass-core` decides which named breakpoint an element's rendered width
//! falls into and keeps exactly one matching CSS class on that element. It
//! knows nothing about browsers: the host supplies a [`ClassTarget`] (width
//! measurement plus a class list) and a [`ResizeSource`] (resize
//! notifications), and the core drives them.
//!
//! # Primary responsibilities
//! - **BreakpointTable**: validated, threshold-sorted view of a user mapping.
//! - **Watcher**: per-element state machine that measures, resolves, and
//!   swaps classes with minimal mutation.
//! - **Bindings**: per-page registry so re-binding an element replaces the
//!   previous watcher instead of stacking listeners.
//! - **TransitionLog**: bounded, JSONL-serializable record of class swaps.
//!
//! # How it fits in the system
//! `rclass-web` implements the host seams on top of `web-sys` and exposes the
//! JS-facing `bind` entry point. Tests and non-browser hosts use the
//! in-memory doubles in [`headless`].

pub mod bindings;
pub mod breakpoint;
pub mod config;
pub mod error;
pub mod headless;
pub mod host;
pub mod logging;
pub mod transition;
pub mod watcher;

pub use bindings::Bindings;
pub use breakpoint::{Breakpoint, BreakpointConfig, BreakpointTable, DEFAULT_BREAKPOINTS};
pub use config::WatcherOptions;
pub use error::ConfigError;
pub use host::{ClassTarget, ResizeSource};
pub use transition::{ClassTransition, TransitionLog};
pub use watcher::{Watcher, WatcherHandle, WatcherPhase, WatcherState};
