#![no_main]

use libfuzzer_sys::fuzz_target;
use wro_di::{ConfigValue, MapConfigSource, WroConfig};

const KEYS: [&str; 5] = [
    "debug",
    "cache_update_period",
    "model_update_period",
    "ignore_missing_resources",
    "encoding",
];

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    let Ok(raw) = std::str::from_utf8(&data[1..]) else {
        return;
    };

    let key = KEYS[data[0] as usize % KEYS.len()];
    let value = ConfigValue::parse(raw);
    let source = MapConfigSource::new().set(key, value.clone());

    // Either a valid configuration or a config error, never a panic
    if let Ok(config) = WroConfig::from_sources(&[&source]) {
        if key == "encoding" {
            assert_eq!(Some(config.encoding.as_str()), value.as_str());
        }
    }
});
