//! Capability identity used to key the provider table.

use std::any::TypeId;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Stable identity of a capability.
///
/// Capabilities are usually trait objects (`dyn NamingStrategy`), sometimes
/// concrete types (`Injector`, `GroupsProcessor`). Both are identified by the `TypeId`
/// of the type itself; the type name is carried along for error messages.
///
/// # Examples
///
/// ```rust
/// use wro_di::Key;
///
/// trait Logger: Send + Sync {}
///
/// let a = Key::of::<dyn Logger>();
/// let b = Key::of::<dyn Logger>();
/// assert_eq!(a, b);
/// assert!(a.display_name().contains("Logger"));
/// assert_ne!(a, Key::of::<String>());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Key {
    id: TypeId,
    name: &'static str,
}

impl Key {
    /// Key of the capability `T`.
    #[inline(always)]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Key {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Human-readable type name, for diagnostics only.
    pub fn display_name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

// Identity is the TypeId alone; the name never takes part in comparisons.
impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Key {}

impl Hash for Key {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// Ordered by name so diagnostic dumps are stable across runs.
impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(other.name).then_with(|| self.id.cmp(&other.id))
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// Shorthand for [`Key::of`].
#[inline(always)]
pub fn key_of<T: ?Sized + 'static>() -> Key {
    Key::of::<T>()
}
