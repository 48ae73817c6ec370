#![forbid(unsafe_code)]

//! Host seams consumed by the watcher.
//!
//! Both traits take `&self`: DOM handles are shared references with interior
//! mutability, and the watcher only ever holds one of each.

/// An element whose width can be measured and whose class list can be edited.
pub trait ClassTarget {
    /// Rendered outer width in pixels: content, padding, and border, without
    /// margin. Detached or zero-size elements report 0.
    fn outer_width(&self) -> f64;

    fn has_class(&self, class: &str) -> bool;

    fn add_class(&self, class: &str);

    /// Removing a class that is not present is a no-op.
    fn remove_class(&self, class: &str);
}

/// Something that fires "resize" notifications.
pub trait ResizeSource {
    /// Keeps the handler registered. Dropping it must unsubscribe.
    type Subscription;

    fn subscribe(&self, handler: Box<dyn FnMut()>) -> Self::Subscription;
}
