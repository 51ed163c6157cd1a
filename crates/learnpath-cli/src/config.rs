//! Configuration for the learnpath CLI and server.
//!
//! [`LearnpathConfig`] loads from TOML files, environment variables, and
//! defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `LEARNPATH_CONFIG` environment variable
//! 3. XDG default: `~/.config/learnpath/config.toml`
//! 4. Built-in defaults
//!
//! `LEARNPATH_<SECTION>_<KEY>` variables overlay whatever the file sets.
//! The overlay arrives as TOML strings, so numeric and boolean fields also
//! accept their string spelling (`port = "9001"`).

use confyg::{Confygery, env};
use learnpath_core::traits::ConfigProvider;
use learnpath_core::{Error, Result};
use learnpath_graph::{ConceptGraph, GraphCache, default_graph, load_graph};
use learnpath_llm::{ProviderKind, ProviderSettings};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "LEARNPATH_CONFIG";

/// Prefix for per-key environment overrides.
pub const ENV_PREFIX: &str = "LEARNPATH";

/// Sections that accept `LEARNPATH_<SECTION>_<KEY>` overrides.
const ENV_SECTIONS: [&str; 3] = ["server", "graph", "llm"];

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnpathConfig {
    /// Project name, shown in logs and the health report.
    pub project_name: String,

    /// HTTP server settings.
    pub server: ServerConfig,

    /// Default graph and cache behaviour.
    pub graph: GraphConfig,

    /// LLM provider settings.
    pub llm: LlmConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,

    /// Port to listen on.
    #[serde(deserialize_with = "from_str_or_value")]
    pub port: u16,
}

/// Graph configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// JSON file holding the default graph; the built-in curriculum when unset.
    pub default_path: Option<String>,

    /// Serve the default graph when generation fails.
    #[serde(deserialize_with = "from_str_or_value")]
    pub fallback_to_default: bool,
}

/// LLM configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Backend: `gemini`, `claude`, or `none`.
    pub provider: ProviderKind,

    /// Model ID; the backend default when unset.
    pub model: Option<String>,

    /// API key; read from `GEMINI_API_KEY` / `ANTHROPIC_API_KEY` when unset.
    pub api_key: Option<String>,

    /// Attempts per model call, the first included.
    #[serde(deserialize_with = "from_str_or_value")]
    pub max_attempts: u32,

    /// Upper bound in seconds on one graph generation.
    #[serde(deserialize_with = "from_str_or_value")]
    pub timeout_secs: u64,
}

// ============================================================================
// Default implementations
// ============================================================================

impl Default for LearnpathConfig {
    fn default() -> Self {
        Self {
            project_name: "learnpath".to_string(),
            server: ServerConfig::default(),
            graph: GraphConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            default_path: None,
            fallback_to_default: true,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: None,
            api_key: None,
            max_attempts: 3,
            timeout_secs: 60,
        }
    }
}

// ============================================================================
// Config loading
// ============================================================================

impl LearnpathConfig {
    /// Load configuration from file, environment, and defaults.
    ///
    /// A config path that does not exist is not an error; defaults apply.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let sections: Vec<String> = ENV_SECTIONS.iter().map(|s| s.to_string()).collect();
        let overlay = env::scan(ENV_PREFIX, &sections).toml();
        Self::load_with_overlay(config_path, &overlay)
    }

    /// Load from file and defaults, then apply a TOML overlay in the shape
    /// the environment scanner produces.
    fn load_with_overlay(config_path: Option<&str>, overlay: &str) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path)
            && path.exists()
        {
            builder
                .add_file(&path.to_string_lossy())
                .map_err(|e| Error::config(format!("config file: {e}")))?;
        }

        builder
            .add_str(overlay)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        log::debug!(
            "loaded config: provider={}, server={}:{}",
            config.llm.provider,
            config.server.host,
            config.server.port
        );
        Ok(config)
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        resolve_path_with(explicit, std::env::var(CONFIG_ENV).ok())
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("learnpath").join("config.toml"))
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten this config into environment variable pairs with `LEARNPATH_` prefix.
    pub fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value: toml::Value =
            toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_toml_value(&value, ENV_PREFIX, &mut vars);
        Ok(vars)
    }

    /// `host:port` to bind the HTTP server to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Provider settings for [`learnpath_llm::build_provider`].
    pub fn provider_settings(&self) -> ProviderSettings {
        ProviderSettings {
            kind: self.llm.provider,
            model: self.llm.model.clone(),
            api_key: self.llm.api_key.clone(),
            max_attempts: self.llm.max_attempts,
        }
    }

    /// Load the configured default graph, or the built-in one.
    pub fn load_default_graph(&self) -> Result<ConceptGraph> {
        match self.default_graph_path() {
            Some(path) => load_graph(path),
            None => Ok(default_graph()),
        }
    }

    /// A topic cache wired to this config's timeout and fallback policy.
    pub fn build_cache(&self, default: &ConceptGraph) -> GraphCache {
        let cache = GraphCache::new().with_timeout(self.generator_timeout());
        if self.fallback_to_default() {
            cache.with_fallback(default.clone())
        } else {
            cache
        }
    }
}

fn resolve_path_with(explicit: Option<&str>, from_env: Option<String>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(PathBuf::from(path));
    }
    if let Some(path) = from_env.filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    LearnpathConfig::default_config_path()
}

/// Accept either a native TOML value or its string spelling.
fn from_str_or_value<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Value(T),
        Text(String),
    }

    match Raw::<T>::deserialize(deserializer)? {
        Raw::Value(value) => Ok(value),
        Raw::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

// ============================================================================
// ConfigProvider implementation
// ============================================================================

impl ConfigProvider for LearnpathConfig {
    fn project_name(&self) -> &str {
        &self.project_name
    }

    fn default_graph_path(&self) -> Option<PathBuf> {
        self.graph
            .default_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }

    fn fallback_to_default(&self) -> bool {
        self.graph.fallback_to_default
    }

    fn generator_timeout(&self) -> Duration {
        Duration::from_secs(self.llm.timeout_secs.max(1))
    }
}

// ============================================================================
// Helper: flatten TOML to env vars
// ============================================================================

/// Recursively flatten a TOML value into `KEY=value` pairs.
fn flatten_toml_value(value: &toml::Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, val) in table {
                let env_key = format!("{}_{}", prefix, key.to_uppercase());
                flatten_toml_value(val, &env_key, out);
            }
        }
        toml::Value::Array(arr) => {
            if let Ok(json) = serde_json::to_string(arr) {
                out.push((prefix.to_string(), json));
            }
        }
        toml::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        toml::Value::Integer(i) => out.push((prefix.to_string(), i.to_string())),
        toml::Value::Float(f) => out.push((prefix.to_string(), f.to_string())),
        toml::Value::Boolean(b) => out.push((prefix.to_string(), b.to_string())),
        toml::Value::Datetime(dt) => out.push((prefix.to_string(), dt.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use confyg::env::{KV, KVMap};
    use learnpath_graph::{Concept, save_graph};
    use std::collections::HashMap;

    /// Overlay TOML for `LEARNPATH_*` pairs, built the way the env scanner does.
    fn overlay_from(vars: &[(String, String)]) -> String {
        let mut map = KVMap::new(ENV_PREFIX);
        for section in ENV_SECTIONS {
            let prefix = format!("{ENV_PREFIX}_{}", section.to_uppercase());
            let kvs: Vec<KV> = vars
                .iter()
                .filter(|(key, _)| key.starts_with(&format!("{prefix}_")))
                .map(|(key, value)| {
                    let mut kv = KV::new(key.clone(), value.clone());
                    kv.normalise_key(&prefix);
                    kv
                })
                .collect();
            map.insert(section, kvs);
        }
        map.toml()
    }

    fn var(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    fn write_config(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_config_default() {
        let config = LearnpathConfig::default();
        assert_eq!(config.project_name, "learnpath");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(config.graph.default_path.is_none());
        assert!(config.graph.fallback_to_default);
        assert_eq!(config.llm.provider, ProviderKind::Gemini);
        assert_eq!(config.llm.max_attempts, 3);
        assert_eq!(config.llm.timeout_secs, 60);
    }

    #[test]
    fn test_config_from_toml() {
        let config: LearnpathConfig = toml::from_str(
            r#"
            project_name = "music"

            [server]
            host = "0.0.0.0"
            port = 9000

            [graph]
            default_path = "/data/music.json"
            fallback_to_default = false

            [llm]
            provider = "claude"
            model = "claude-3-5-haiku-latest"
            timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.project_name, "music");
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert_eq!(
            config.default_graph_path(),
            Some(PathBuf::from("/data/music.json"))
        );
        assert!(!config.fallback_to_default());
        assert_eq!(config.llm.provider, ProviderKind::Claude);
        assert_eq!(config.generator_timeout(), Duration::from_secs(5));
        assert_eq!(config.llm.max_attempts, 3);
    }

    #[test]
    fn test_config_to_toml_round_trip() {
        let config = LearnpathConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("provider = \"gemini\""));

        let parsed: LearnpathConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.llm.provider, config.llm.provider);
    }

    #[test]
    fn test_config_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
                project_name = "loaded"
                [server]
                port = 9090
                [llm]
                provider = "none"
            "#,
        );

        let config = LearnpathConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.project_name, "loaded");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.llm.provider, ProviderKind::None);
    }

    #[test]
    fn test_config_load_missing_file_uses_defaults() {
        let config = LearnpathConfig::load(Some("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.project_name, "learnpath");
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_env_overlay_numeric_and_bool_keys() {
        let overlay = overlay_from(&[
            var("LEARNPATH_SERVER_PORT", "9001"),
            var("LEARNPATH_SERVER_HOST", "0.0.0.0"),
            var("LEARNPATH_LLM_MAX_ATTEMPTS", "5"),
            var("LEARNPATH_LLM_TIMEOUT_SECS", "12"),
            var("LEARNPATH_GRAPH_FALLBACK_TO_DEFAULT", "false"),
        ]);
        assert!(overlay.contains("port = '9001'"));

        let config =
            LearnpathConfig::load_with_overlay(Some("/nonexistent/config.toml"), &overlay)
                .unwrap();
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.llm.max_attempts, 5);
        assert_eq!(config.llm.timeout_secs, 12);
        assert!(!config.graph.fallback_to_default);
    }

    #[test]
    fn test_env_overlay_wins_over_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(&dir, "[server]\nport = 9090\n[llm]\nprovider = \"none\"");
        let overlay = overlay_from(&[var("LEARNPATH_SERVER_PORT", "9191")]);

        let config =
            LearnpathConfig::load_with_overlay(Some(path.to_str().unwrap()), &overlay).unwrap();
        assert_eq!(config.server.port, 9191);
        assert_eq!(config.llm.provider, ProviderKind::None);
    }

    #[test]
    fn test_env_overlay_rejects_bad_number() {
        let overlay = overlay_from(&[var("LEARNPATH_SERVER_PORT", "eighty")]);
        let err = LearnpathConfig::load_with_overlay(Some("/nonexistent/config.toml"), &overlay)
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_exported_env_vars_load_back() {
        let mut original = LearnpathConfig::default();
        original.server.port = 9300;
        original.graph.fallback_to_default = false;
        original.llm.provider = ProviderKind::Claude;
        original.llm.max_attempts = 4;
        original.llm.timeout_secs = 30;

        let overlay = overlay_from(&original.to_env_vars().unwrap());
        let loaded =
            LearnpathConfig::load_with_overlay(Some("/nonexistent/config.toml"), &overlay)
                .unwrap();
        assert_eq!(loaded.server.port, 9300);
        assert!(!loaded.graph.fallback_to_default);
        assert_eq!(loaded.llm.provider, ProviderKind::Claude);
        assert_eq!(loaded.llm.max_attempts, 4);
        assert_eq!(loaded.llm.timeout_secs, 30);
    }

    #[test]
    fn test_resolve_path_precedence() {
        assert_eq!(
            resolve_path_with(Some("/explicit.toml"), Some("/env.toml".into())),
            Some(PathBuf::from("/explicit.toml"))
        );
        assert_eq!(
            resolve_path_with(None, Some("/env.toml".into())),
            Some(PathBuf::from("/env.toml"))
        );
        assert_eq!(
            resolve_path_with(None, None),
            LearnpathConfig::default_config_path()
        );
        assert_eq!(
            resolve_path_with(None, Some(String::new())),
            LearnpathConfig::default_config_path()
        );
    }

    #[test]
    fn test_default_config_path_shape() {
        if let Some(path) = LearnpathConfig::default_config_path() {
            let text = path.to_string_lossy();
            assert!(text.contains("learnpath"));
            assert!(text.ends_with("config.toml"));
        }
    }

    #[test]
    fn test_blank_graph_path_means_builtin() {
        let mut config = LearnpathConfig::default();
        config.graph.default_path = Some(String::new());
        assert!(config.default_graph_path().is_none());
        assert_eq!(config.load_default_graph().unwrap(), default_graph());
    }

    #[test]
    fn test_load_default_graph_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("graph.json");
        let graph = ConceptGraph::new().with_concept(Concept::new("Scales"));
        save_graph(&graph, &path).unwrap();

        let mut config = LearnpathConfig::default();
        config.graph.default_path = Some(path.to_string_lossy().into_owned());
        assert_eq!(config.load_default_graph().unwrap(), graph);
    }

    #[test]
    fn test_load_default_graph_missing_file() {
        let mut config = LearnpathConfig::default();
        config.graph.default_path = Some("/nonexistent/graph.json".into());
        assert!(matches!(
            config.load_default_graph(),
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_build_cache_policy() {
        let default = default_graph();
        let mut config = LearnpathConfig::default();
        config.llm.timeout_secs = 7;

        let cache = config.build_cache(&default);
        assert!(cache.fallback().is_some());
        assert_eq!(cache.timeout(), Duration::from_secs(7));

        config.graph.fallback_to_default = false;
        assert!(config.build_cache(&default).fallback().is_none());
    }

    #[test]
    fn test_provider_settings() {
        let mut config = LearnpathConfig::default();
        config.llm.provider = ProviderKind::Claude;
        config.llm.api_key = Some("sk".into());
        config.llm.max_attempts = 5;

        let settings = config.provider_settings();
        assert_eq!(settings.kind, ProviderKind::Claude);
        assert_eq!(settings.api_key.as_deref(), Some("sk"));
        assert_eq!(settings.max_attempts, 5);
    }

    #[test]
    fn test_to_env_vars() {
        let vars = LearnpathConfig::default().to_env_vars().unwrap();
        let map: HashMap<_, _> = vars.into_iter().collect();
        assert_eq!(map.get("LEARNPATH_PROJECT_NAME").unwrap(), "learnpath");
        assert_eq!(map.get("LEARNPATH_SERVER_PORT").unwrap(), "8000");
        assert_eq!(map.get("LEARNPATH_LLM_PROVIDER").unwrap(), "gemini");
        assert_eq!(map.get("LEARNPATH_GRAPH_FALLBACK_TO_DEFAULT").unwrap(), "true");
        assert!(!map.contains_key("LEARNPATH_LLM_API_KEY"));
    }

    #[test]
    fn test_config_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LearnpathConfig>();
    }
}
