//! Mapping request uris to groups.

use super::ResourceType;
use crate::injector::InjectionTarget;
use crate::proxy::Proxy;

/// Extracts the requested group from a request uri.
pub trait GroupExtractor: Send + Sync {
    fn group_name(&self, uri: &str) -> Option<String>;

    fn resource_type(&self, uri: &str) -> Option<ResourceType>;

    fn is_minimized(&self, uri: &str) -> bool;

    fn as_target(&self) -> Option<&dyn InjectionTarget> {
        None
    }
}

impl GroupExtractor for Proxy<dyn GroupExtractor> {
    fn group_name(&self, uri: &str) -> Option<String> {
        self.delegate().group_name(uri)
    }

    fn resource_type(&self, uri: &str) -> Option<ResourceType> {
        self.delegate().resource_type(uri)
    }

    fn is_minimized(&self, uri: &str) -> bool {
        self.delegate().is_minimized(uri)
    }

    fn as_target(&self) -> Option<&dyn InjectionTarget> {
        self.delegate().as_target()
    }
}

crate::forwarding!(GroupExtractor);

/// `/any/path/<group>.<js|css>[?minimize=false]`
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultGroupExtractor;

impl DefaultGroupExtractor {
    fn path(uri: &str) -> &str {
        uri.split(['?', '#']).next().unwrap_or(uri)
    }
}

impl GroupExtractor for DefaultGroupExtractor {
    fn group_name(&self, uri: &str) -> Option<String> {
        let file = Self::path(uri).rsplit('/').next()?;
        let (name, _ext) = file.rsplit_once('.')?;
        (!name.is_empty()).then(|| name.to_string())
    }

    fn resource_type(&self, uri: &str) -> Option<ResourceType> {
        ResourceType::from_uri(uri)
    }

    fn is_minimized(&self, uri: &str) -> bool {
        let query = uri.split_once('?').map(|(_, q)| q).unwrap_or("");
        !query.split('&').any(|pair| pair == "minimize=false")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_group_type_and_minimize_flag() {
        let extractor = DefaultGroupExtractor;
        let uri = "/wro/core.js?minimize=false";
        assert_eq!(extractor.group_name(uri).as_deref(), Some("core"));
        assert_eq!(extractor.resource_type(uri), Some(ResourceType::Js));
        assert!(!extractor.is_minimized(uri));
        assert!(extractor.is_minimized("/wro/core.css"));
    }

    #[test]
    fn uri_without_extension_has_no_group() {
        assert_eq!(DefaultGroupExtractor.group_name("/wro/core"), None);
        assert_eq!(DefaultGroupExtractor.group_name("/wro/.js"), None);
    }
}
