//! Naming and hashing of processed content.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::ResourceError;
use crate::injector::InjectionTarget;
use crate::proxy::Proxy;

/// Renames a resource, typically to embed a content fingerprint.
pub trait NamingStrategy: Send + Sync {
    fn rename(&self, original: &str, content: &[u8]) -> Result<String, ResourceError>;

    fn as_target(&self) -> Option<&dyn InjectionTarget> {
        None
    }
}

impl NamingStrategy for Proxy<dyn NamingStrategy> {
    fn rename(&self, original: &str, content: &[u8]) -> Result<String, ResourceError> {
        self.delegate().rename(original, content)
    }

    fn as_target(&self) -> Option<&dyn InjectionTarget> {
        self.delegate().as_target()
    }
}

crate::forwarding!(NamingStrategy);

/// Keeps the original name.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpNamingStrategy;

impl NamingStrategy for NoOpNamingStrategy {
    fn rename(&self, original: &str, _content: &[u8]) -> Result<String, ResourceError> {
        Ok(original.to_string())
    }
}

/// Computes a fingerprint of content.
pub trait HashStrategy: Send + Sync {
    fn hash(&self, content: &[u8]) -> Result<String, ResourceError>;

    fn as_target(&self) -> Option<&dyn InjectionTarget> {
        None
    }
}

impl HashStrategy for Proxy<dyn HashStrategy> {
    fn hash(&self, content: &[u8]) -> Result<String, ResourceError> {
        self.delegate().hash(content)
    }

    fn as_target(&self) -> Option<&dyn InjectionTarget> {
        self.delegate().as_target()
    }
}

crate::forwarding!(HashStrategy);

/// Hex fingerprint from the standard library hasher.
///
/// Stable within one build of the program only.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHashStrategy;

impl HashStrategy for DefaultHashStrategy {
    fn hash(&self, content: &[u8]) -> Result<String, ResourceError> {
        let mut hasher = DefaultHasher::new();
        content.hash(&mut hasher);
        Ok(format!("{:016x}", hasher.finish()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_hash_is_deterministic_and_content_sensitive() {
        let strategy = DefaultHashStrategy;
        let a = strategy.hash(b"body{}").unwrap();
        assert_eq!(a, strategy.hash(b"body{}").unwrap());
        assert_ne!(a, strategy.hash(b"body{ }").unwrap());
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn no_op_naming_keeps_name() {
        assert_eq!(NoOpNamingStrategy.rename("app.js", b"x").unwrap(), "app.js");
    }
}
