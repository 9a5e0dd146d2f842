//! Resource locators and authorization.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;

use super::ResourceError;
use crate::injector::InjectionTarget;
use crate::proxy::Proxy;

/// Reads the content of resources it accepts.
pub trait UriLocator: Send + Sync {
    fn accept(&self, uri: &str) -> bool;

    fn locate(&self, uri: &str) -> Result<Vec<u8>, ResourceError>;

    fn as_target(&self) -> Option<&dyn InjectionTarget> {
        None
    }
}

/// Picks the locator responsible for a uri.
pub trait UriLocatorFactory: Send + Sync {
    /// The locator that accepts `uri`.
    fn instance(&self, uri: &str) -> Result<Arc<dyn UriLocator>, ResourceError>;

    /// Content of `uri`, read through the locator that accepts it.
    fn locate(&self, uri: &str) -> Result<Vec<u8>, ResourceError> {
        self.instance(uri)?.locate(uri)
    }

    fn as_target(&self) -> Option<&dyn InjectionTarget> {
        None
    }
}

impl UriLocatorFactory for Proxy<dyn UriLocatorFactory> {
    fn instance(&self, uri: &str) -> Result<Arc<dyn UriLocator>, ResourceError> {
        self.delegate().instance(uri)
    }

    fn locate(&self, uri: &str) -> Result<Vec<u8>, ResourceError> {
        self.delegate().locate(uri)
    }

    fn as_target(&self) -> Option<&dyn InjectionTarget> {
        self.delegate().as_target()
    }
}

crate::forwarding!(UriLocatorFactory);

/// Locator factory asking each locator in turn; the first that accepts wins.
#[derive(Default)]
pub struct LocatorChain {
    locators: Vec<Arc<dyn UriLocator>>,
}

impl LocatorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, locator: Arc<dyn UriLocator>) -> Self {
        self.locators.push(locator);
        self
    }
}

impl UriLocatorFactory for LocatorChain {
    fn instance(&self, uri: &str) -> Result<Arc<dyn UriLocator>, ResourceError> {
        self.locators
            .iter()
            .find(|l| l.accept(uri))
            .cloned()
            .ok_or_else(|| ResourceError::NoLocator(uri.to_string()))
    }
}

/// Decides whether a resource may be served.
pub trait ResourceAuthorizationManager: Send + Sync {
    fn is_authorized(&self, uri: &str) -> bool;
}

impl ResourceAuthorizationManager for Proxy<dyn ResourceAuthorizationManager> {
    fn is_authorized(&self, uri: &str) -> bool {
        self.delegate().is_authorized(uri)
    }
}

crate::forwarding!(ResourceAuthorizationManager);

/// Authorizes only uris added explicitly.
#[derive(Default)]
pub struct AuthorizationList {
    allowed: RwLock<HashSet<String>>,
}

impl AuthorizationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, uri: impl Into<String>) {
        self.allowed.write().insert(uri.into());
    }

    pub fn clear(&self) {
        self.allowed.write().clear();
    }
}

impl ResourceAuthorizationManager for AuthorizationList {
    fn is_authorized(&self, uri: &str) -> bool {
        self.allowed.read().contains(uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Prefixed(&'static str);

    impl UriLocator for Prefixed {
        fn accept(&self, uri: &str) -> bool {
            uri.starts_with(self.0)
        }

        fn locate(&self, uri: &str) -> Result<Vec<u8>, ResourceError> {
            Ok(format!("{}:{}", self.0, uri).into_bytes())
        }
    }

    #[test]
    fn chain_uses_first_accepting_locator() {
        let chain = LocatorChain::new()
            .with(Arc::new(Prefixed("classpath:")))
            .with(Arc::new(Prefixed("/")));

        assert_eq!(chain.locate("/a.js").unwrap(), b"/:/a.js".to_vec());
        assert_eq!(
            chain.locate("http://cdn/a.js"),
            Err(ResourceError::NoLocator("http://cdn/a.js".to_string()))
        );
    }

    #[test]
    fn authorization_list_only_allows_added_uris() {
        let list = AuthorizationList::new();
        list.add("/a.js");
        assert!(list.is_authorized("/a.js"));
        assert!(!list.is_authorized("/b.js"));
        list.clear();
        assert!(!list.is_authorized("/a.js"));
    }
}
