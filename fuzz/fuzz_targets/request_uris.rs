#![no_main]

use libfuzzer_sys::fuzz_target;
use wro_di::{DefaultGroupExtractor, GroupExtractor, ModelAsJsonHandler, RequestHandler, ResourceType};

fuzz_target!(|data: &[u8]| {
    let Ok(uri) = std::str::from_utf8(data) else {
        return;
    };

    let extractor = DefaultGroupExtractor;
    if let Some(name) = extractor.group_name(uri) {
        assert!(!name.is_empty());
        assert!(!name.contains('/'));
    }
    assert_eq!(extractor.resource_type(uri), ResourceType::from_uri(uri));
    let _ = extractor.is_minimized(uri);

    let handler = ModelAsJsonHandler::new();
    if handler.accept(uri) {
        assert!(uri.contains(ModelAsJsonHandler::PATH));
    }
});
