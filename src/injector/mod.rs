//! The finished, immutable injector and its forward reference.

use std::sync::{Arc, Weak};

use once_cell::sync::OnceCell;

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::observer::Observers;
use crate::registration::{Registry, Resolved};

pub mod target;
pub use target::{InjectionTarget, Requirement, Slot};

/// Immutable mapping from capability to provider, with member injection.
///
/// Produced by [`InjectorBuilder::build`](crate::InjectorBuilder::build) and
/// never mutated afterwards. Cloning is cheap and every clone shares the same
/// provider table; the injector is `Send + Sync` and may be used from any
/// number of threads.
///
/// The injector is itself a registered capability: resolving `Injector`
/// returns a non-owning handle to the same table. Objects owned by the
/// injector may keep that handle without keeping the injector alive; once the
/// last owning handle is dropped, calls through it fail with
/// [`DiError::ContainerDropped`].
///
/// # Examples
///
/// ```
/// use wro_di::{Injector, InjectorBuilder};
///
/// let injector = InjectorBuilder::empty().build();
/// let same = injector.get::<Injector>().unwrap();
/// assert!(Injector::ptr_eq(&injector, &same));
/// ```
pub struct Injector {
    link: Link,
}

#[derive(Clone)]
enum Link {
    Owned(Arc<InjectorInner>),
    Borrowed(Weak<InjectorInner>),
}

pub(crate) struct InjectorInner {
    registry: Registry,
    observers: Observers,
}

impl Injector {
    pub(crate) fn new(registry: Registry, observers: Observers) -> Self {
        Self {
            link: Link::Owned(Arc::new(InjectorInner { registry, observers })),
        }
    }

    /// Non-owning handle to the same table.
    pub(crate) fn downgrade(&self) -> Injector {
        Injector {
            link: Link::Borrowed(self.weak()),
        }
    }

    pub(crate) fn weak(&self) -> Weak<InjectorInner> {
        match &self.link {
            Link::Owned(inner) => Arc::downgrade(inner),
            Link::Borrowed(weak) => weak.clone(),
        }
    }

    fn table(&self) -> DiResult<Arc<InjectorInner>> {
        match &self.link {
            Link::Owned(inner) => Ok(inner.clone()),
            Link::Borrowed(weak) => weak.upgrade().ok_or(DiError::ContainerDropped),
        }
    }

    /// True while the provider table is reachable through this handle.
    pub fn is_alive(&self) -> bool {
        self.table().is_ok()
    }

    /// Runs the provider registered for `key`.
    pub fn resolve(&self, key: &Key) -> DiResult<Resolved> {
        let inner = self.table()?;
        let provider = inner
            .registry
            .get(key)
            .ok_or(DiError::UnregisteredCapability(key.display_name()))?;

        let observers = &inner.observers;
        if !observers.has_observers() {
            return Self::checked(key, provider.produce());
        }

        let start = std::time::Instant::now();
        observers.resolving(key);
        let result = Self::checked(key, provider.produce());
        match &result {
            Ok(_) => observers.resolved(key, start.elapsed()),
            Err(err) => observers.failed(key, err),
        }
        result
    }

    // A provider must produce exactly the capability it is registered under.
    fn checked(key: &Key, produced: DiResult<Resolved>) -> DiResult<Resolved> {
        let resolved = produced?;
        if resolved.key() != *key {
            return Err(DiError::TypeMismatch {
                expected: key.display_name(),
                found: resolved.key().display_name(),
            });
        }
        Ok(resolved)
    }

    /// Resolves capability `T`.
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        self.resolve(&Key::of::<T>())?.downcast::<T>()
    }

    /// Fills in every member `target` declares.
    ///
    /// All requirements are resolved before the first assignment: if any
    /// capability is unregistered or mistyped, nothing is assigned.
    pub fn inject(&self, target: &dyn InjectionTarget) -> DiResult<()> {
        let requirements = target.requirements();
        tracing::trace!(
            target_type = target.target_name(),
            members = requirements.len(),
            "injecting"
        );

        let resolved = requirements
            .iter()
            .map(|req| self.resolve(&req.key).map(|value| (req.member, value)))
            .collect::<DiResult<Vec<_>>>()?;

        for (member, value) in resolved {
            target.assign(member, value)?;
        }
        Ok(())
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.table()
            .map(|inner| inner.registry.contains_key(key))
            .unwrap_or(false)
    }

    pub fn contains_capability<T: ?Sized + 'static>(&self) -> bool {
        self.contains(&Key::of::<T>())
    }

    /// Registered capabilities, sorted by name. Empty once the table is gone.
    pub fn keys(&self) -> Vec<Key> {
        let mut keys: Vec<Key> = match self.table() {
            Ok(inner) => inner.registry.keys().copied().collect(),
            Err(_) => Vec::new(),
        };
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.table().map(|inner| inner.registry.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when both handles share one provider table.
    pub fn ptr_eq(a: &Injector, b: &Injector) -> bool {
        Weak::ptr_eq(&a.weak(), &b.weak())
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Injector Debug ===\n");
        for key in self.keys() {
            s.push_str(&format!("  {}\n", key.display_name()));
        }
        s
    }
}

impl Clone for Injector {
    fn clone(&self) -> Self {
        Self {
            link: self.link.clone(),
        }
    }
}

impl std::fmt::Debug for Injector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Injector")
            .field("capabilities", &self.len())
            .field("owned", &matches!(self.link, Link::Owned(_)))
            .finish()
    }
}

/// Forward reference to an injector that does not exist yet.
///
/// Providers staged by the builder capture a clone of this cell instead of an
/// injector. `build()` publishes the finished injector into it exactly once;
/// from then on every clone resolves to that injector.
///
/// Only a weak reference is stored, so providers owned by the injector do not
/// keep it alive.
#[derive(Clone, Default)]
pub struct InjectorRef {
    cell: Arc<OnceCell<Weak<InjectorInner>>>,
}

impl InjectorRef {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `injector`; returns false if something was already published.
    pub(crate) fn publish(&self, injector: &Injector) -> bool {
        self.cell.set(injector.weak()).is_ok()
    }

    /// The published injector.
    ///
    /// Fails with [`DiError::ContainerNotBuilt`] before `build()` and with
    /// [`DiError::ContainerDropped`] once every handle to the injector is gone.
    pub fn get(&self) -> DiResult<Injector> {
        let weak = self.cell.get().ok_or(DiError::ContainerNotBuilt)?;
        weak.upgrade()
            .map(|inner| Injector {
                link: Link::Owned(inner),
            })
            .ok_or(DiError::ContainerDropped)
    }

    pub fn is_published(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl std::fmt::Debug for InjectorRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InjectorRef")
            .field("published", &self.is_published())
            .finish()
    }
}
