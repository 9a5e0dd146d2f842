//! Observers for capability resolution events.
//!
//! Hooks called around every provider invocation, for tracing resolution
//! chains and timing first-time decoration.

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::Key;

/// Observer trait for resolution events.
///
/// Calls are made synchronously on the resolving thread; keep
/// implementations cheap.
///
/// # Examples
///
/// ```
/// use wro_di::{InjectionObserver, InjectorBuilder, Key, DiError};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Counting(AtomicUsize);
///
/// impl InjectionObserver for Counting {
///     fn resolving(&self, _key: &Key) {}
///     fn resolved(&self, _key: &Key, _duration: Duration) {
///         self.0.fetch_add(1, Ordering::SeqCst);
///     }
///     fn failed(&self, _key: &Key, _error: &DiError) {}
/// }
///
/// let observer = Arc::new(Counting::default());
/// let mut builder = InjectorBuilder::empty();
/// builder.add_observer(observer.clone());
/// let injector = builder.build();
///
/// injector.get::<wro_di::Injector>().unwrap();
/// assert_eq!(observer.0.load(Ordering::SeqCst), 1);
/// ```
pub trait InjectionObserver: Send + Sync {
    /// Called before the provider for `key` runs.
    fn resolving(&self, key: &Key);

    /// Called after the provider for `key` returned an instance.
    fn resolved(&self, key: &Key, duration: Duration);

    /// Called when resolving `key` failed; the error still propagates.
    fn failed(&self, key: &Key, error: &DiError);
}

/// Registered observers.
///
/// Has no cost beyond an emptiness check when nothing is registered.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn InjectionObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn InjectionObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, key: &Key) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, key: &Key, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, key: &Key, error: &DiError) {
        for observer in &self.observers {
            observer.failed(key, error);
        }
    }
}

/// Built-in observer that emits `tracing` events.
///
/// Resolutions are logged at `trace`, failures at `warn`.
///
/// ```
/// use wro_di::{InjectorBuilder, TracingObserver};
/// use std::sync::Arc;
///
/// let mut builder = InjectorBuilder::empty();
/// builder.add_observer(Arc::new(TracingObserver::new()));
/// let _injector = builder.build();
/// ```
pub struct TracingObserver {
    prefix: String,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self {
            prefix: "wro-di".to_string(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl InjectionObserver for TracingObserver {
    fn resolving(&self, key: &Key) {
        tracing::trace!(prefix = %self.prefix, capability = key.display_name(), "resolving");
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        tracing::trace!(
            prefix = %self.prefix,
            capability = key.display_name(),
            elapsed_us = duration.as_micros() as u64,
            "resolved"
        );
    }

    fn failed(&self, key: &Key, error: &DiError) {
        tracing::warn!(
            prefix = %self.prefix,
            capability = key.display_name(),
            error = %error,
            "resolution failed"
        );
    }
}
