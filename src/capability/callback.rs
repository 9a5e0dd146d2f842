//! Hooks notified around model creation and resource processing.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::DiResult;
use crate::injector::{InjectionTarget, Injector};

/// Receives lifecycle notifications. Every hook defaults to a no-op.
pub trait LifecycleCallback: Send + Sync {
    fn on_before_model_created(&self) {}

    fn on_after_model_created(&self) {}

    fn on_before_pre_process(&self, _uri: &str) {}

    fn on_after_pre_process(&self, _uri: &str) {}

    fn on_before_merge(&self) {}

    fn on_after_merge(&self) {}

    fn as_target(&self) -> Option<&dyn InjectionTarget> {
        None
    }
}

/// Fans every notification out to the registered callbacks, in registration
/// order.
///
/// A fresh registry comes from the manager factory on each request; its
/// callbacks are injected before it is handed out.
#[derive(Default)]
pub struct LifecycleCallbackRegistry {
    callbacks: RwLock<Vec<Arc<dyn LifecycleCallback>>>,
}

impl LifecycleCallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, callback: Arc<dyn LifecycleCallback>) {
        self.callbacks.write().push(callback);
    }

    pub fn len(&self) -> usize {
        self.callbacks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Injects every callback that declares members.
    pub fn inject_callbacks(&self, injector: &Injector) -> DiResult<()> {
        for callback in self.snapshot() {
            if let Some(target) = callback.as_target() {
                injector.inject(target)?;
            }
        }
        Ok(())
    }

    pub fn on_before_model_created(&self) {
        self.each(|c| c.on_before_model_created());
    }

    pub fn on_after_model_created(&self) {
        self.each(|c| c.on_after_model_created());
    }

    pub fn on_before_pre_process(&self, uri: &str) {
        self.each(|c| c.on_before_pre_process(uri));
    }

    pub fn on_after_pre_process(&self, uri: &str) {
        self.each(|c| c.on_after_pre_process(uri));
    }

    pub fn on_before_merge(&self) {
        self.each(|c| c.on_before_merge());
    }

    pub fn on_after_merge(&self) {
        self.each(|c| c.on_after_merge());
    }

    // Callbacks may register further callbacks; never hold the lock while notifying.
    fn snapshot(&self) -> Vec<Arc<dyn LifecycleCallback>> {
        self.callbacks.read().clone()
    }

    fn each(&self, notify: impl Fn(&dyn LifecycleCallback)) {
        for callback in self.snapshot() {
            notify(callback.as_ref());
        }
    }
}

impl std::fmt::Debug for LifecycleCallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleCallbackRegistry")
            .field("callbacks", &self.len())
            .finish()
    }
}
