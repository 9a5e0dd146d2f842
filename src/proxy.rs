//! Forwarding proxies handed out in place of raw capability instances.

use std::sync::Arc;

/// A capability-typed handle that forwards every call to a fixed delegate.
///
/// `Proxy<dyn Capability>` implements `Capability` by calling the delegate's
/// method of the same name with the same arguments and returning its result
/// untouched, errors included. The delegate is chosen when the proxy is
/// created and never re-resolved.
///
/// Each capability provides its own `impl Capability for Proxy<dyn Capability>`
/// block together with a [`Forwarding`] impl, which is what
/// [`Proxy::create`] uses to erase the adapter back to the capability type.
pub struct Proxy<T: ?Sized> {
    delegate: Arc<T>,
}

impl<T: ?Sized> Proxy<T> {
    pub fn new(delegate: Arc<T>) -> Self {
        Self { delegate }
    }

    /// The instance every call is forwarded to.
    pub fn delegate(&self) -> &Arc<T> {
        &self.delegate
    }

    /// Wraps `delegate` in a fresh proxy typed as the capability itself.
    pub fn create(delegate: Arc<T>) -> Arc<T>
    where
        T: Forwarding,
    {
        tracing::trace!(capability = std::any::type_name::<T>(), "creating forwarding proxy");
        T::proxy(delegate)
    }
}

impl<T: ?Sized> Clone for Proxy<T> {
    fn clone(&self) -> Self {
        Self {
            delegate: self.delegate.clone(),
        }
    }
}

impl<T: ?Sized> std::fmt::Debug for Proxy<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Proxy")
            .field("capability", &std::any::type_name::<T>())
            .finish()
    }
}

/// Capabilities that can be wrapped in a [`Proxy`].
///
/// Implemented on the trait object type, e.g. `impl Forwarding for dyn NamingStrategy`.
///
/// # Examples
///
/// ```rust
/// use wro_di::{Forwarding, Proxy};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self, name: &str) -> Result<String, String>;
/// }
///
/// impl Greeter for Proxy<dyn Greeter> {
///     fn greet(&self, name: &str) -> Result<String, String> {
///         self.delegate().greet(name)
///     }
/// }
///
/// impl Forwarding for dyn Greeter {
///     fn proxy(delegate: Arc<Self>) -> Arc<Self> {
///         Arc::new(Proxy::new(delegate))
///     }
/// }
///
/// struct English;
/// impl Greeter for English {
///     fn greet(&self, name: &str) -> Result<String, String> {
///         Ok(format!("Hello, {}", name))
///     }
/// }
///
/// let proxy = Proxy::create(Arc::new(English) as Arc<dyn Greeter>);
/// assert_eq!(proxy.greet("wro").unwrap(), "Hello, wro");
/// ```
pub trait Forwarding: Send + Sync + 'static {
    /// Builds a proxy around `delegate`.
    fn proxy(delegate: Arc<Self>) -> Arc<Self>;
}

/// Implements [`Forwarding`] for a capability trait object whose
/// `Proxy<dyn Trait>` impl is written by hand.
#[macro_export]
macro_rules! forwarding {
    ($($cap:tt)+) => {
        impl $crate::Forwarding for dyn $($cap)+ {
            fn proxy(delegate: ::std::sync::Arc<Self>) -> ::std::sync::Arc<Self> {
                ::std::sync::Arc::new($crate::Proxy::new(delegate))
            }
        }
    };
}
