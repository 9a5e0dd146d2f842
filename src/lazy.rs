//! Compute-once memoizing holder for decorated singletons.

use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::sync::OnceCell;

use crate::error::{BoxError, DiError, DiResult};

type Initializer<T> = Box<dyn Fn() -> Result<T, BoxError> + Send + Sync>;

/// Observable state of a [`LazyValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LazyState {
    /// Nothing computed yet, or the last computation failed
    Empty,
    /// A caller is currently running the initializer
    Computing,
    /// The value is published and will never be recomputed
    Ready,
}

/// Memoizing holder that runs its initializer on first access.
///
/// Concurrent first callers serialize on the cell: one of them runs the
/// initializer while the others block, then all of them observe the same
/// value. Once ready, reads take no lock.
///
/// A failing initializer leaves the value empty. The triggering caller gets
/// [`DiError::Initialization`]; callers that were blocked behind it then run
/// the initializer themselves, one at a time, so a transient failure never
/// poisons the value. A panicking initializer likewise leaves it empty.
///
/// # Examples
///
/// ```rust
/// use wro_di::LazyValue;
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let runs = Arc::new(AtomicUsize::new(0));
/// let counter = runs.clone();
/// let lazy = LazyValue::new("answer", move || {
///     counter.fetch_add(1, Ordering::SeqCst);
///     Ok(Arc::new(42u32))
/// });
///
/// let a = lazy.get().unwrap();
/// let b = lazy.get().unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// assert_eq!(runs.load(Ordering::SeqCst), 1);
/// ```
pub struct LazyValue<T> {
    name: &'static str,
    cell: OnceCell<T>,
    computing: AtomicBool,
    init: Initializer<T>,
}

impl<T: Clone> LazyValue<T> {
    /// Creates an empty value computed by `init` on first [`get`](Self::get).
    ///
    /// `name` identifies the value in errors and logs.
    pub fn new<F>(name: &'static str, init: F) -> Self
    where
        F: Fn() -> Result<T, BoxError> + Send + Sync + 'static,
    {
        Self {
            name,
            cell: OnceCell::new(),
            computing: AtomicBool::new(false),
            init: Box::new(init),
        }
    }

    /// Returns the memoized value, computing it if this is the first access.
    pub fn get(&self) -> DiResult<T> {
        if let Some(value) = self.cell.get() {
            return Ok(value.clone());
        }

        self.cell
            .get_or_try_init(|| {
                let _computing = ComputingGuard::enter(&self.computing);
                tracing::debug!(value = self.name, "initializing lazy value");
                let result = (self.init)();
                if let Err(err) = &result {
                    tracing::debug!(value = self.name, error = %err, "lazy initialization failed");
                }
                result
            })
            .map(|value| value.clone())
            .map_err(|source| DiError::initialization(self.name, source))
    }

    /// Returns the value only if it has already been computed.
    pub fn get_if_ready(&self) -> Option<T> {
        self.cell.get().cloned()
    }
}

// Clears the computing flag however the initializer exits, unwinding included.
struct ComputingGuard<'a>(&'a AtomicBool);

impl<'a> ComputingGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for ComputingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<T> LazyValue<T> {
    pub fn is_ready(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn state(&self) -> LazyState {
        if self.cell.get().is_some() {
            LazyState::Ready
        } else if self.computing.load(Ordering::Acquire) {
            LazyState::Computing
        } else {
            LazyState::Empty
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> std::fmt::Debug for LazyValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyValue")
            .field("name", &self.name)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[test]
    fn starts_empty_and_becomes_ready() {
        let lazy = LazyValue::new("n", || Ok(Arc::new(7u8)));
        assert_eq!(lazy.state(), LazyState::Empty);
        assert!(lazy.get_if_ready().is_none());

        assert_eq!(*lazy.get().unwrap(), 7);
        assert_eq!(lazy.state(), LazyState::Ready);
        assert!(lazy.is_ready());
    }

    #[test]
    fn failure_resets_to_empty_and_retries() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let lazy = LazyValue::new("flaky", move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err("first attempt fails".into())
            } else {
                Ok(Arc::new("ok".to_string()))
            }
        });

        match lazy.get() {
            Err(DiError::Initialization { capability, source }) => {
                assert_eq!(capability, "flaky");
                assert_eq!(source.to_string(), "first attempt fails");
            }
            other => panic!("expected initialization failure, got {:?}", other.map(|_| ())),
        }
        assert_eq!(lazy.state(), LazyState::Empty);

        assert_eq!(lazy.get().unwrap().as_str(), "ok");
        assert_eq!(attempts.load(Ordering::SeqCst), 2);

        lazy.get().unwrap();
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn panicking_initializer_leaves_value_empty() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let lazy = LazyValue::new("panicky", move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("initializer blew up");
            }
            Ok(Arc::new(5u16))
        });

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| lazy.get()));
        assert!(outcome.is_err());
        assert_eq!(lazy.state(), LazyState::Empty);

        assert_eq!(*lazy.get().unwrap(), 5);
        assert_eq!(lazy.state(), LazyState::Ready);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn computing_state_is_visible_inside_initializer() {
        let slot: Arc<OnceCell<Arc<LazyValue<Arc<u8>>>>> = Arc::new(OnceCell::new());
        let seen = Arc::new(parking_lot::Mutex::new(None));

        let slot_in = slot.clone();
        let seen_in = seen.clone();
        let lazy = Arc::new(LazyValue::new("self-observing", move || {
            if let Some(me) = slot_in.get() {
                *seen_in.lock() = Some(me.state());
            }
            Ok(Arc::new(1u8))
        }));
        let _ = slot.set(lazy.clone());

        lazy.get().unwrap();
        assert_eq!(*seen.lock(), Some(LazyState::Computing));
    }
}
