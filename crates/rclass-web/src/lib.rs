#![forbid(unsafe_code)]

//! Web/WASM frontend for rclass.
//!
//! Implements the core's host seams on top of `web-sys`
//! ([`ClassTarget`](rclass_core::ClassTarget) for elements and the window,
//! [`ResizeSource`](rclass_core::ResizeSource) for `window` resize events)
//! and exports the JS API:
//!
//! ```text
//! import init, { bind } from "rclass-web";
//! await init();
//! const handles = bind(".card", { breakpoints: { narrow: 0, wide: 720 } });
//! handles[0].activeBreakpoint();   // "narrow" | "wide"
//! handles[0].dispose();            // unsubscribe + remove class
//! setDefaults({ compact: 0, roomy: 900 }); // table for later binds without breakpoints
//! ```
//!
//! Everything that touches the DOM is compiled only for `wasm32`; the error
//! types build everywhere so they can be tested natively.

pub mod error;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

pub use error::BindError;

#[cfg(target_arch = "wasm32")]
pub use dom::{DomTarget, ResizeListener, WindowResize};
#[cfg(target_arch = "wasm32")]
pub use wasm::{
    RClassHandle, bind, bind_handles, defaults, set_default_breakpoints, set_defaults, unbind_all,
};
