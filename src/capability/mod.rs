//! Capability interfaces the injector hands out.
//!
//! Each capability is a `Send + Sync` trait with a forwarding
//! `Proxy<dyn Capability>` impl next to it. Implementations that need other
//! capabilities expose themselves through `as_target()` and get injected
//! before they are handed out.

use serde::Serialize;

pub mod cache;
pub mod callback;
pub mod group;
pub mod locator;
pub mod model;
pub mod processor;
pub mod strategy;

pub use cache::{CacheKey, CacheStrategy, CacheValue, MemoryCacheStrategy};
pub use callback::{LifecycleCallback, LifecycleCallbackRegistry};
pub use group::{DefaultGroupExtractor, GroupExtractor};
pub use locator::{
    AuthorizationList, LocatorChain, ResourceAuthorizationManager, UriLocator, UriLocatorFactory,
};
pub use model::{Group, Model, ModelFactory, ModelTransformer, Resource, StaticModelFactory};
pub use processor::{
    GroupsProcessor, PreProcessorExecutor, ProcessorList, ProcessorsFactory, ResourceProcessor,
};
pub use strategy::{DefaultHashStrategy, HashStrategy, NamingStrategy, NoOpNamingStrategy};

/// Failure raised by a capability.
///
/// Proxies never wrap it: the caller of a proxied method receives exactly the
/// value the underlying implementation returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    #[error("No locator can handle uri: {0}")]
    NoLocator(String),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Access to {0} is not authorized")]
    Unauthorized(String),
    #[error("Processing failed: {0}")]
    Processing(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Injection failed: {0}")]
    Injection(String),
}

impl From<crate::DiError> for ResourceError {
    fn from(err: crate::DiError) -> Self {
        ResourceError::Injection(err.to_string())
    }
}

impl From<std::io::Error> for ResourceError {
    fn from(err: std::io::Error) -> Self {
        ResourceError::Io(err.to_string())
    }
}

/// Kind of a web resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResourceType {
    Js,
    Css,
}

impl ResourceType {
    /// Type of `uri`, judged by its extension.
    pub fn from_uri(uri: &str) -> Option<Self> {
        let path = uri.split(['?', '#']).next().unwrap_or(uri);
        match path.rsplit('.').next()?.to_ascii_lowercase().as_str() {
            "js" => Some(ResourceType::Js),
            "css" => Some(ResourceType::Css),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ResourceType::Js => "application/javascript",
            ResourceType::Css => "text/css",
        }
    }
}
