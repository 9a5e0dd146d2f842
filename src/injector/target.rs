//! Injection targets: objects whose members are filled in by capability type.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::registration::Resolved;

/// One injectable member of a target: its name and the capability it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    pub member: &'static str,
    pub key: Key,
}

impl Requirement {
    pub fn of<T: ?Sized + 'static>(member: &'static str) -> Self {
        Self {
            member,
            key: Key::of::<T>(),
        }
    }
}

/// An object the injector can fill in.
///
/// A target declares, per member, which capability it needs and exposes a
/// setter-like [`assign`](Self::assign). Members are usually [`Slot`]s so that
/// shared (`Arc`) targets can be injected, and re-injected, through `&self`.
///
/// Implement it with the [`injection_target!`](crate::injection_target) macro
/// rather than by hand.
pub trait InjectionTarget: Send + Sync {
    /// Capabilities this target needs, one entry per member.
    fn requirements(&self) -> Vec<Requirement>;

    /// Stores `value` into `member`.
    fn assign(&self, member: &'static str, value: Resolved) -> DiResult<()>;

    fn target_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Injectable member holding one capability instance.
///
/// Empty until the injector assigns it; assigning again replaces the value.
pub struct Slot<T: ?Sized> {
    value: RwLock<Option<Arc<T>>>,
}

impl<T: ?Sized> Slot<T> {
    pub fn new() -> Self {
        Self {
            value: RwLock::new(None),
        }
    }

    pub fn set(&self, value: Arc<T>) {
        *self.value.write() = Some(value);
    }

    /// The injected instance, or [`DiError::NotInjected`] if nothing was assigned yet.
    pub fn get(&self) -> DiResult<Arc<T>> {
        self.value
            .read()
            .clone()
            .ok_or(DiError::NotInjected(std::any::type_name::<T>()))
    }

    pub fn try_get(&self) -> Option<Arc<T>> {
        self.value.read().clone()
    }

    pub fn is_set(&self) -> bool {
        self.value.read().is_some()
    }
}

impl<T: ?Sized> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> std::fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot")
            .field("capability", &std::any::type_name::<T>())
            .field("set", &self.is_set())
            .finish()
    }
}

/// Implements [`InjectionTarget`] for a struct whose members are [`Slot`]s.
///
/// # Examples
///
/// ```rust
/// use wro_di::{injection_target, InjectionTarget, Slot};
///
/// trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// #[derive(Default)]
/// struct Report {
///     clock: Slot<dyn Clock>,
///     title: Slot<String>,
/// }
///
/// injection_target!(Report {
///     clock: dyn Clock,
///     title: String,
/// });
///
/// let report = Report::default();
/// assert_eq!(report.requirements().len(), 2);
/// assert_eq!(report.requirements()[0].member, "clock");
/// ```
#[macro_export]
macro_rules! injection_target {
    ($target:ty { $($member:ident : $cap:ty),* $(,)? }) => {
        impl $crate::InjectionTarget for $target {
            fn requirements(&self) -> ::std::vec::Vec<$crate::Requirement> {
                ::std::vec![$($crate::Requirement::of::<$cap>(::std::stringify!($member))),*]
            }

            #[allow(unused_variables)]
            fn assign(
                &self,
                member: &'static str,
                value: $crate::Resolved,
            ) -> $crate::DiResult<()> {
                match member {
                    $(::std::stringify!($member) => {
                        self.$member.set(value.downcast::<$cap>()?);
                        Ok(())
                    })*
                    _ => Err($crate::DiError::UnknownMember {
                        target: ::std::any::type_name::<Self>(),
                        member,
                    }),
                }
            }
        }
    };
}
