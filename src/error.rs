//! Error types for the injector.

use std::error::Error as StdError;
use std::sync::Arc;

/// Failure raised by a lazy initializer or a capability factory.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Injector errors
///
/// Every failure of `inject`, `resolve` or a provider surfaces as one of these
/// variants; nothing is swallowed or logged-and-skipped.
///
/// Failures raised *by a capability* while a proxy forwards a call are not
/// represented here: proxies return the delegate's own `Result` unchanged.
///
/// # Examples
///
/// ```rust
/// use wro_di::{DiError, InjectorBuilder};
///
/// trait Missing: Send + Sync {}
///
/// let injector = InjectorBuilder::empty().build();
/// match injector.get::<dyn Missing>() {
///     Err(DiError::UnregisteredCapability(name)) => assert!(name.contains("Missing")),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, thiserror::Error)]
pub enum DiError {
    /// No provider is registered for the capability
    #[error("No provider registered for capability: {0}")]
    UnregisteredCapability(&'static str),
    /// Produced instance does not satisfy the requested capability
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// A lazy initializer failed; the value was reset so a later call may retry
    #[error("Initialization of {capability} failed: {source}")]
    Initialization {
        capability: &'static str,
        #[source]
        source: Arc<dyn StdError + Send + Sync>,
    },
    /// The injector was requested before `build()` published it
    #[error("Injector requested before build() completed")]
    ContainerNotBuilt,
    /// The injector behind a forward reference has been dropped
    #[error("Injector was dropped while a provider still referenced it")]
    ContainerDropped,
    /// `assign` was called with a member the target does not declare
    #[error("{target} has no injectable member named {member}")]
    UnknownMember {
        target: &'static str,
        member: &'static str,
    },
    /// An injectable member was read before anything was assigned to it
    #[error("Member {0} has not been injected")]
    NotInjected(&'static str),
    /// Configuration value missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DiError {
    /// Wraps an initializer failure for `capability`.
    pub fn initialization(capability: &'static str, source: BoxError) -> Self {
        DiError::Initialization {
            capability,
            source: Arc::from(source),
        }
    }
}

/// Result type for injector operations
pub type DiResult<T> = Result<T, DiError>;
