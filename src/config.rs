//! Optimizer configuration and the read-only context handed to consumers.
//!
//! Values are read from a chain of [`ConfigSource`]s in priority order: the
//! first source that knows a key wins, and keys nobody knows keep their
//! defaults.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{DiError, DiResult};
use crate::proxy::Proxy;

/// A single configuration value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl ConfigValue {
    /// Parses text the way environment variables are read.
    pub fn parse(raw: &str) -> Self {
        if let Ok(i) = raw.parse::<i64>() {
            ConfigValue::Integer(i)
        } else if let Ok(f) = raw.parse::<f64>() {
            ConfigValue::Float(f)
        } else if let Ok(b) = raw.parse::<bool>() {
            ConfigValue::Boolean(b)
        } else {
            ConfigValue::String(raw.to_string())
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Boolean(b) => Some(*b),
            ConfigValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ConfigValue::Integer(i) => u64::try_from(*i).ok(),
            ConfigValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigValue::Boolean(b) => write!(f, "{}", b),
            ConfigValue::Integer(i) => write!(f, "{}", i),
            ConfigValue::Float(x) => write!(f, "{}", x),
            ConfigValue::String(s) => f.write_str(s),
        }
    }
}

/// Where configuration values come from.
pub trait ConfigSource: Send + Sync + std::fmt::Debug {
    /// Value for `key`, if this source defines it.
    fn get(&self, key: &str) -> Option<ConfigValue>;

    /// Keys this source defines.
    fn keys(&self) -> Vec<String>;
}

/// Reads `<PREFIX>_<KEY>` environment variables.
#[derive(Debug, Clone)]
pub struct EnvironmentConfigSource {
    prefix: String,
}

impl EnvironmentConfigSource {
    pub const DEFAULT_PREFIX: &'static str = "WRO";

    pub fn new() -> Self {
        Self::with_prefix(Self::DEFAULT_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().to_uppercase(),
        }
    }

    fn variable(&self, key: &str) -> String {
        format!("{}_{}", self.prefix, key.to_uppercase())
    }
}

impl Default for EnvironmentConfigSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSource for EnvironmentConfigSource {
    fn get(&self, key: &str) -> Option<ConfigValue> {
        env::var(self.variable(key))
            .ok()
            .map(|raw| ConfigValue::parse(&raw))
    }

    fn keys(&self) -> Vec<String> {
        let prefix = format!("{}_", self.prefix);
        env::vars()
            .filter_map(|(name, _)| name.strip_prefix(&prefix).map(str::to_lowercase))
            .collect()
    }
}

/// Flat JSON object read from a file, loaded on first use.
#[derive(Debug)]
pub struct JsonConfigSource {
    path: PathBuf,
    values: RwLock<Option<HashMap<String, ConfigValue>>>,
}

impl JsonConfigSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            values: RwLock::new(None),
        }
    }

    /// Re-reads the file, replacing any cached values.
    pub fn reload(&self) -> DiResult<()> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            DiError::Config(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        let parsed: HashMap<String, ConfigValue> = serde_json::from_str(&content).map_err(|e| {
            DiError::Config(format!("invalid JSON in {}: {}", self.path.display(), e))
        })?;
        *self.values.write() = Some(parsed);
        Ok(())
    }

    fn ensure_loaded(&self) {
        if self.values.read().is_some() {
            return;
        }
        if let Err(err) = self.reload() {
            tracing::warn!(error = %err, "configuration file ignored");
            *self.values.write() = Some(HashMap::new());
        }
    }
}

impl ConfigSource for JsonConfigSource {
    fn get(&self, key: &str) -> Option<ConfigValue> {
        self.ensure_loaded();
        self.values.read().as_ref()?.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.ensure_loaded();
        self.values
            .read()
            .as_ref()
            .map(|values| values.keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// In-memory source, mostly for tests and programmatic overrides.
#[derive(Debug, Default, Clone)]
pub struct MapConfigSource {
    values: HashMap<String, ConfigValue>,
}

impl MapConfigSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: ConfigValue) -> Self {
        self.values.insert(key.into(), value);
        self
    }
}

impl ConfigSource for MapConfigSource {
    fn get(&self, key: &str) -> Option<ConfigValue> {
        self.values.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}

/// Optimizer settings.
///
/// Update periods are in seconds; `0` disables periodic refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WroConfig {
    pub debug: bool,
    pub cache_update_period: u64,
    pub model_update_period: u64,
    pub ignore_missing_resources: bool,
    pub encoding: String,
}

impl Default for WroConfig {
    fn default() -> Self {
        Self {
            debug: true,
            cache_update_period: 0,
            model_update_period: 0,
            ignore_missing_resources: true,
            encoding: "UTF-8".to_string(),
        }
    }
}

impl WroConfig {
    /// Builds a configuration from `sources`, earlier sources taking priority.
    ///
    /// Fails with [`DiError::Config`] when a source holds a value of the wrong
    /// kind for its key.
    pub fn from_sources(sources: &[&dyn ConfigSource]) -> DiResult<Self> {
        let lookup = |key: &str| sources.iter().find_map(|source| source.get(key));
        let invalid = |key: &str, value: &ConfigValue| {
            DiError::Config(format!("invalid value for {}: {}", key, value))
        };

        let mut config = Self::default();
        if let Some(value) = lookup("debug") {
            config.debug = value.as_bool().ok_or_else(|| invalid("debug", &value))?;
        }
        if let Some(value) = lookup("cache_update_period") {
            config.cache_update_period = value
                .as_u64()
                .ok_or_else(|| invalid("cache_update_period", &value))?;
        }
        if let Some(value) = lookup("model_update_period") {
            config.model_update_period = value
                .as_u64()
                .ok_or_else(|| invalid("model_update_period", &value))?;
        }
        if let Some(value) = lookup("ignore_missing_resources") {
            config.ignore_missing_resources = value
                .as_bool()
                .ok_or_else(|| invalid("ignore_missing_resources", &value))?;
        }
        if let Some(value) = lookup("encoding") {
            config.encoding = value
                .as_str()
                .filter(|s| !s.is_empty())
                .ok_or_else(|| invalid("encoding", &value))?
                .to_string();
        }

        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Configuration from `WRO_*` environment variables.
    pub fn from_env() -> DiResult<Self> {
        Self::from_sources(&[&EnvironmentConfigSource::new()])
    }
}

/// Read-only view of the running configuration.
///
/// This is what components should depend on instead of [`WroConfig`]. The
/// injector hands it out behind a fresh [`Proxy`] on every request.
pub trait ReadOnlyContext: Send + Sync {
    fn config(&self) -> &WroConfig;
}

impl ReadOnlyContext for Proxy<dyn ReadOnlyContext> {
    fn config(&self) -> &WroConfig {
        self.delegate().config()
    }
}

crate::forwarding!(ReadOnlyContext);

/// The context built from the configuration given to the builder.
#[derive(Debug, Clone, Default)]
pub struct Context {
    config: Arc<WroConfig>,
}

impl Context {
    pub fn new(config: WroConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl ReadOnlyContext for Context {
    fn config(&self) -> &WroConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_source_knows_a_key() {
        let config = WroConfig::from_sources(&[]).unwrap();
        assert_eq!(config, WroConfig::default());
        assert!(config.debug);
        assert_eq!(config.encoding, "UTF-8");
    }

    #[test]
    fn earlier_sources_take_priority() {
        let high = MapConfigSource::new().set("debug", ConfigValue::Boolean(false));
        let low = MapConfigSource::new()
            .set("debug", ConfigValue::Boolean(true))
            .set("cache_update_period", ConfigValue::Integer(60));

        let config = WroConfig::from_sources(&[&high, &low]).unwrap();
        assert!(!config.debug);
        assert_eq!(config.cache_update_period, 60);
    }

    #[test]
    fn wrong_kind_of_value_is_a_config_error() {
        let source = MapConfigSource::new().set("model_update_period", ConfigValue::Integer(-5));
        match WroConfig::from_sources(&[&source]) {
            Err(DiError::Config(msg)) => assert!(msg.contains("model_update_period")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn parse_recognizes_scalars() {
        assert_eq!(ConfigValue::parse("42"), ConfigValue::Integer(42));
        assert_eq!(ConfigValue::parse("false"), ConfigValue::Boolean(false));
        assert_eq!(ConfigValue::parse("UTF-8"), ConfigValue::String("UTF-8".into()));
        assert_eq!(ConfigValue::String("true".into()).as_bool(), Some(true));
    }

    #[test]
    fn partial_json_deserializes_with_defaults() {
        let config: WroConfig = serde_json::from_str(r#"{"debug": false}"#).unwrap();
        assert!(!config.debug);
        assert!(config.ignore_missing_resources);
    }
}
