#![forbid(unsafe_code)]

//! Registry of live watchers keyed by element identity.
//!
//! Binding an element that already has a watcher disposes the old one first,
//! so repeated binds never stack resize listeners or leave classes from a
//! previous table behind.

use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::WatcherOptions;
use crate::error::ConfigError;
use crate::host::{ClassTarget, ResizeSource};
use crate::watcher::{Watcher, WatcherHandle};

pub struct Bindings<K, E: ClassTarget, S> {
    handles: FxHashMap<K, WatcherHandle<E, S>>,
}

impl<K, E: ClassTarget, S> Default for Bindings<K, E, S> {
    fn default() -> Self {
        Self {
            handles: FxHashMap::default(),
        }
    }
}

impl<K, E, S> Bindings<K, E, S>
where
    K: Eq + Hash + std::fmt::Debug,
    E: ClassTarget + 'static,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a watcher to `element` under `key`, replacing any previous binding.
    ///
    /// Options are validated before the previous binding is disposed, so an
    /// invalid rebind leaves the existing watcher running.
    pub fn bind<R>(
        &mut self,
        key: K,
        element: E,
        source: &R,
        options: &WatcherOptions,
    ) -> Result<&WatcherHandle<E, S>, ConfigError>
    where
        R: ResizeSource<Subscription = S>,
    {
        let watcher = Watcher::new(element, options)?;
        if let Some(mut previous) = self.handles.remove(&key) {
            debug!(key = ?key, "replacing existing binding");
            previous.dispose();
        }
        let handle = WatcherHandle::start(watcher, source);
        Ok(self.handles.entry(key).or_insert(handle))
    }

    /// Dispose and forget the watcher bound under `key`.
    pub fn unbind(&mut self, key: &K) -> bool {
        match self.handles.remove(key) {
            Some(mut handle) => {
                handle.dispose();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<&WatcherHandle<E, S>> {
        self.handles.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.handles.contains_key(key)
    }

    /// Re-run evaluation on every bound watcher; returns how many swapped.
    pub fn evaluate_all(&self) -> usize {
        self.handles.values().filter(|h| h.evaluate()).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Dispose every watcher.
    pub fn clear(&mut self) {
        for (_, mut handle) in self.handles.drain() {
            handle.dispose();
        }
    }
}
