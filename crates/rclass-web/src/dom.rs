#![forbid(unsafe_code)]

use rclass_core::logging::warn;
use rclass_core::{ClassTarget, ResizeSource};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, HtmlElement, Window};

/// A bound DOM target.
///
/// For `window`, width is `innerWidth` and classes go on `<html>`, since the
/// window itself has no class list.
#[derive(Debug, Clone)]
pub enum DomTarget {
    Element(HtmlElement),
    Window { window: Window, root: Element },
}

impl DomTarget {
    /// Element whose class list is edited.
    #[must_use]
    pub fn class_host(&self) -> &Element {
        match self {
            Self::Element(el) => el.unchecked_ref::<Element>(),
            Self::Window { root, .. } => root,
        }
    }
}

impl ClassTarget for DomTarget {
    fn outer_width(&self) -> f64 {
        match self {
            // Fractional border-box width; offsetWidth would round 639.6 up to 640.
            // 0 when detached or display:none.
            Self::Element(el) => el.get_bounding_client_rect().width(),
            Self::Window { window, .. } => window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0),
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.class_host().class_list().contains(class)
    }

    fn add_class(&self, class: &str) {
        if let Err(err) = self.class_host().class_list().add_1(class) {
            warn!(class, error = ?err, "classList.add failed");
        }
    }

    fn remove_class(&self, class: &str) {
        if let Err(err) = self.class_host().class_list().remove_1(class) {
            warn!(class, error = ?err, "classList.remove failed");
        }
    }
}

/// `window` as a resize source.
#[derive(Debug, Clone)]
pub struct WindowResize {
    window: Window,
}

impl WindowResize {
    #[must_use]
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl ResizeSource for WindowResize {
    type Subscription = ResizeListener;

    fn subscribe(&self, handler: Box<dyn FnMut()>) -> ResizeListener {
        let closure = Closure::wrap(handler);
        if let Err(err) = self
            .window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
        {
            warn!(error = ?err, "failed to add resize listener");
        }
        ResizeListener {
            window: self.window.clone(),
            closure,
        }
    }
}

/// Live `resize` listener; dropping it removes the listener and frees the closure.
pub struct ResizeListener {
    window: Window,
    closure: Closure<dyn FnMut()>,
}

impl Drop for ResizeListener {
    fn drop(&mut self) {
        if let Err(err) = self
            .window
            .remove_event_listener_with_callback("resize", self.closure.as_ref().unchecked_ref())
        {
            warn!(error = ?err, "failed to remove resize listener");
        }
    }
}
