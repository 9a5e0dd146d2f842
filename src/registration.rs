//! Providers and the provider table.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::Key;

// Type-erased Arc for storage; always holds an `Arc<T>` for the keyed `T`
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

#[cfg(feature = "ahash")]
type TableHasher = ahash::RandomState;
#[cfg(not(feature = "ahash"))]
type TableHasher = std::collections::hash_map::RandomState;

/// An instance produced for a capability, with its static type erased.
///
/// Trait objects cannot be stored in `dyn Any` directly, so the produced
/// `Arc<T>` is itself boxed into an `Arc<dyn Any>` and recovered with
/// [`downcast`](Self::downcast).
#[derive(Clone)]
pub struct Resolved {
    key: Key,
    value: AnyArc,
}

impl Resolved {
    pub fn new<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            key: Key::of::<T>(),
            value: Arc::new(value),
        }
    }

    /// Capability the instance was produced as.
    pub fn key(&self) -> Key {
        self.key
    }

    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.key == Key::of::<T>()
    }

    /// Recovers the typed instance; fails if it was produced as another capability.
    pub fn downcast<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        self.value
            .downcast_ref::<Arc<T>>()
            .cloned()
            .ok_or(DiError::TypeMismatch {
                expected: std::any::type_name::<T>(),
                found: self.key.display_name(),
            })
    }
}

impl std::fmt::Debug for Resolved {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Resolved").field(&self.key.display_name()).finish()
    }
}

/// Produces one instance of a capability per call.
///
/// Any `Fn() -> DiResult<Resolved>` closure is a provider. Providers built by
/// [`InjectorBuilder`](crate::InjectorBuilder) close over lazy values and over
/// the forward reference to the injector being built.
pub trait Provider: Send + Sync {
    fn produce(&self) -> DiResult<Resolved>;
}

impl<F> Provider for F
where
    F: Fn() -> DiResult<Resolved> + Send + Sync,
{
    fn produce(&self) -> DiResult<Resolved> {
        self()
    }
}

/// Typed adapter turning `Fn() -> DiResult<Arc<T>>` into a [`Provider`].
pub struct TypedProvider<T: ?Sized, F> {
    factory: F,
    _marker: std::marker::PhantomData<fn() -> Arc<T>>,
}

impl<T: ?Sized, F> TypedProvider<T, F>
where
    T: Send + Sync + 'static,
    F: Fn() -> DiResult<Arc<T>> + Send + Sync,
{
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T: ?Sized, F> Provider for TypedProvider<T, F>
where
    T: Send + Sync + 'static,
    F: Fn() -> DiResult<Arc<T>> + Send + Sync,
{
    fn produce(&self) -> DiResult<Resolved> {
        (self.factory)().map(Resolved::new)
    }
}

/// Provider table keyed by capability
pub(crate) struct Registry {
    providers: HashMap<Key, Arc<dyn Provider>, TableHasher>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            providers: HashMap::default(),
        }
    }

    /// Inserts a provider, replacing any earlier one for the same key.
    pub(crate) fn insert(&mut self, key: Key, provider: Arc<dyn Provider>) -> bool {
        self.providers.insert(key, provider).is_some()
    }

    #[inline(always)]
    pub(crate) fn get(&self, key: &Key) -> Option<&Arc<dyn Provider>> {
        self.providers.get(key)
    }

    #[inline(always)]
    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.providers.contains_key(key)
    }

    /// Moves every provider of `other` in, replacing providers for the same keys.
    pub(crate) fn merge(&mut self, other: Registry) {
        self.providers.extend(other.providers);
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &Key> {
        self.providers.keys()
    }

    pub(crate) fn len(&self) -> usize {
        self.providers.len()
    }
}
