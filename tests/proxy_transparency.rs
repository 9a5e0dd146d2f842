/// Proxies forward calls unchanged, values and errors alike.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use proptest::prelude::*;
use wro_di::{
    HashStrategy, InjectorBuilder, NamingStrategy, Proxy, ResourceError, UriLocator,
    UriLocatorFactory,
};

/// Naming strategy echoing its input, or failing on demand.
struct Scripted {
    calls: AtomicUsize,
}

impl NamingStrategy for Scripted {
    fn rename(&self, original: &str, content: &[u8]) -> Result<String, ResourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if content.is_empty() {
            Err(ResourceError::Processing(format!("empty content for {}", original)))
        } else {
            Ok(format!("{}-{}", content.len(), original))
        }
    }
}

fn scripted() -> Arc<Scripted> {
    Arc::new(Scripted {
        calls: AtomicUsize::new(0),
    })
}

#[test]
fn test_proxy_returns_delegate_value() {
    let delegate = scripted();
    let proxy = Proxy::create(delegate.clone() as Arc<dyn NamingStrategy>);

    assert_eq!(proxy.rename("app.js", b"abc").unwrap(), "3-app.js");
    assert_eq!(delegate.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_proxy_returns_delegate_error_unwrapped() {
    let proxy = Proxy::create(scripted() as Arc<dyn NamingStrategy>);

    assert_eq!(
        proxy.rename("app.js", b""),
        Err(ResourceError::Processing("empty content for app.js".to_string()))
    );
}

#[test]
fn test_proxy_delegate_is_fixed() {
    let delegate: Arc<dyn NamingStrategy> = scripted();
    let proxy = Proxy::new(delegate.clone());

    assert!(Arc::ptr_eq(proxy.delegate(), &delegate));
    assert!(Arc::ptr_eq(proxy.clone().delegate(), &delegate));
}

struct Missing;

impl UriLocatorFactory for Missing {
    fn instance(&self, uri: &str) -> Result<Arc<dyn UriLocator>, ResourceError> {
        Err(ResourceError::NotFound(uri.to_string()))
    }
}

#[test]
fn test_injector_proxies_surface_delegate_errors() {
    let mut builder = InjectorBuilder::empty();
    builder.bind_singleton::<dyn UriLocatorFactory, _>("locators", || {
        Ok(Arc::new(Missing) as Arc<dyn UriLocatorFactory>)
    });
    let injector = builder.build();

    let locators = injector.get::<dyn UriLocatorFactory>().unwrap();
    assert_eq!(
        locators.locate("/missing.js"),
        Err(ResourceError::NotFound("/missing.js".to_string()))
    );
}

struct Length;

impl HashStrategy for Length {
    fn hash(&self, content: &[u8]) -> Result<String, ResourceError> {
        if content.len() > 64 {
            return Err(ResourceError::Processing("too long".into()));
        }
        Ok(content.len().to_string())
    }
}

proptest! {
    #[test]
    fn proxied_hash_matches_direct_hash(content in proptest::collection::vec(any::<u8>(), 0..128)) {
        let direct = Length;
        let proxy = Proxy::create(Arc::new(Length) as Arc<dyn HashStrategy>);
        prop_assert_eq!(proxy.hash(&content), direct.hash(&content));
    }

    #[test]
    fn nested_proxies_stay_transparent(depth in 1usize..8, name in "[a-z]{1,12}\\.js") {
        let mut strategy: Arc<dyn NamingStrategy> = scripted();
        for _ in 0..depth {
            strategy = Proxy::create(strategy);
        }
        prop_assert_eq!(strategy.rename(&name, b"xy").unwrap(), format!("2-{}", name));
    }
}
