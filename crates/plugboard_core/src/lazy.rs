//! Deferred materialization proxy for expensive singleton-like values.
//!
//! # Responsibility
//! - Delay construction of a wrapped value until first access.
//! - Guarantee the factory runs at most once per proxy.
//!
//! # Invariants
//! - A proxy transitions unloaded -> loaded exactly once and never back.
//! - No operation re-invokes the factory once the target exists.
//! - First access is not synchronized here: the proxy is single-threaded by
//!   construction (`!Sync`); bootstrap must finish before shared reads begin.

use once_cell::unsync::OnceCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// Lazy wrapper around a value produced by a zero-argument factory.
///
/// The factory is supplied at construction, so the "proxy without a factory"
/// failure state is unrepresentable.
pub struct DeferredProxy<T> {
    factory: Rc<dyn Fn() -> T>,
    target: OnceCell<T>,
}

impl<T> DeferredProxy<T> {
    pub fn new(factory: impl Fn() -> T + 'static) -> Self {
        Self {
            factory: Rc::new(factory),
            target: OnceCell::new(),
        }
    }

    /// Returns true once the target has been materialized.
    pub fn is_loaded(&self) -> bool {
        self.target.get().is_some()
    }

    /// Materializes the target now; a no-op when already loaded.
    pub fn load(&self) {
        self.target.get_or_init(|| (self.factory)());
    }

    /// Returns the target, materializing it on first access.
    pub fn get(&self) -> &T {
        self.target.get_or_init(|| (self.factory)())
    }

    /// Returns the target mutably, materializing it on first access.
    pub fn get_mut(&mut self) -> &mut T {
        self.load();
        match self.target.get_mut() {
            Some(target) => target,
            None => unreachable!("target was materialized by load()"),
        }
    }
}

impl<T: Clone> Clone for DeferredProxy<T> {
    /// Cloning an unloaded proxy yields a fresh unloaded proxy sharing the
    /// same factory; cloning a loaded proxy yields a proxy already loaded
    /// around a clone of the target.
    fn clone(&self) -> Self {
        let proxy = Self {
            factory: Rc::clone(&self.factory),
            target: OnceCell::new(),
        };
        if let Some(target) = self.target.get() {
            let _ = proxy.target.set(target.clone());
        }
        proxy
    }
}

impl<T: Debug> Debug for DeferredProxy<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.target.get() {
            Some(target) => write!(f, "DeferredProxy({target:?})"),
            None => write!(f, "DeferredProxy(unloaded)"),
        }
    }
}
