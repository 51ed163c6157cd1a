//! Core traits for learnpath.
//!
//! [`ConfigProvider`] abstracts the settings the graph, LLM, and server
//! layers read, so they can be driven from the CLI's TOML config or from a
//! hand-built struct in tests.

use std::path::PathBuf;
use std::time::Duration;

/// Trait for learnpath configuration.
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use learnpath_core::traits::ConfigProvider;
///
/// #[derive(Clone)]
/// struct FixedConfig;
///
/// impl ConfigProvider for FixedConfig {
///     fn project_name(&self) -> &str {
///         "ml-curriculum"
///     }
///
///     fn default_graph_path(&self) -> Option<PathBuf> {
///         None
///     }
/// }
///
/// assert!(FixedConfig.fallback_to_default());
/// ```
pub trait ConfigProvider: Send + Sync + Clone + 'static {
    /// The project name, used in log lines and CLI banners.
    fn project_name(&self) -> &str;

    /// JSON file holding the default concept graph.
    ///
    /// `None` means the built-in curriculum is used.
    fn default_graph_path(&self) -> Option<PathBuf>;

    /// Whether generator failures recover to the default graph.
    fn fallback_to_default(&self) -> bool {
        true
    }

    /// Upper bound on a single graph-generation call.
    fn generator_timeout(&self) -> Duration {
        Duration::from_secs(60)
    }
}
