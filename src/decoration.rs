//! Decorators applied to the lazily built capability singletons.
//!
//! Each decorator wraps a base instance once, inside the initializer of the
//! singleton it belongs to, and keeps exposing the base instance as an
//! injection target so the injector can still fill it in.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::capability::{
    CacheKey, CacheStrategy, CacheValue, Model, ModelFactory, ModelTransformer, ResourceError,
    UriLocator, UriLocatorFactory,
};
use crate::injector::{InjectionTarget, InjectorRef};

/// Injects every locator it hands out.
///
/// Holds the forward reference rather than the injector, so it can be built
/// before the injector exists.
pub struct InjectorAwareLocatorFactory {
    inner: Arc<dyn UriLocatorFactory>,
    injector: InjectorRef,
}

impl InjectorAwareLocatorFactory {
    pub fn decorate(
        inner: Arc<dyn UriLocatorFactory>,
        injector: InjectorRef,
    ) -> Arc<dyn UriLocatorFactory> {
        Arc::new(Self { inner, injector })
    }
}

impl UriLocatorFactory for InjectorAwareLocatorFactory {
    fn instance(&self, uri: &str) -> Result<Arc<dyn UriLocator>, ResourceError> {
        let locator = self.inner.instance(uri)?;
        if let Some(target) = locator.as_target() {
            self.injector.get()?.inject(target)?;
        }
        Ok(locator)
    }

    fn as_target(&self) -> Option<&dyn InjectionTarget> {
        self.inner.as_target()
    }
}

/// Applies model transformers, in order, to every created model.
pub struct TransformingModelFactory {
    inner: Arc<dyn ModelFactory>,
    transformers: Vec<Arc<dyn ModelTransformer>>,
}

impl TransformingModelFactory {
    pub fn decorate(
        inner: Arc<dyn ModelFactory>,
        transformers: Vec<Arc<dyn ModelTransformer>>,
    ) -> Arc<dyn ModelFactory> {
        Arc::new(Self {
            inner,
            transformers,
        })
    }
}

impl ModelFactory for TransformingModelFactory {
    fn create(&self) -> Result<Model, ResourceError> {
        self.transformers
            .iter()
            .try_fold(self.inner.create()?, |model, transformer| {
                transformer.transform(model)
            })
    }

    fn destroy(&self) {
        self.inner.destroy()
    }

    fn as_target(&self) -> Option<&dyn InjectionTarget> {
        self.inner.as_target()
    }
}

/// Serializes every operation on the wrapped strategy.
pub struct SynchronizedCacheStrategy {
    inner: Arc<dyn CacheStrategy>,
    lock: Mutex<()>,
}

impl SynchronizedCacheStrategy {
    pub fn decorate(inner: Arc<dyn CacheStrategy>) -> Arc<dyn CacheStrategy> {
        Arc::new(Self {
            inner,
            lock: Mutex::new(()),
        })
    }
}

impl CacheStrategy for SynchronizedCacheStrategy {
    fn get(&self, key: &CacheKey) -> Option<CacheValue> {
        let _guard = self.lock.lock();
        self.inner.get(key)
    }

    fn put(&self, key: CacheKey, value: CacheValue) {
        let _guard = self.lock.lock();
        self.inner.put(key, value)
    }

    fn clear(&self) {
        let _guard = self.lock.lock();
        self.inner.clear()
    }

    fn destroy(&self) {
        let _guard = self.lock.lock();
        self.inner.destroy()
    }

    fn as_target(&self) -> Option<&dyn InjectionTarget> {
        self.inner.as_target()
    }
}
