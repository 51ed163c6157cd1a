//! The learnpath CLI application.

use crate::cli::{BaseCommand, CliArgs, GraphSubcommand};
use crate::config::LearnpathConfig;
use crate::{config_handlers, graph_handlers};
use learnpath_api::AppState;
use learnpath_core::traits::ConfigProvider;
use learnpath_core::{Error, Result};
use learnpath_graph::{is_valid, quick_summary};
use learnpath_llm::{LlmGraphGenerator, LlmProvider, build_provider};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Entry point
// ============================================================================

/// Parse-independent entry point used by the binary.
///
/// `config` subcommands run before the config is loaded so a broken file
/// can still be inspected and repaired.
pub async fn run(args: CliArgs) -> Result<()> {
    init_logging(args.verbose, args.quiet);

    match args.command {
        Some(BaseCommand::Config(cmd)) => {
            config_handlers::handle_config_command(args.config.as_deref(), cmd.command)
        }
        command => {
            let config = LearnpathConfig::load(args.config.as_deref())?;
            LearnpathCli::new(config).run(command).await
        }
    }
}

/// Initialise tracing-based logging on stderr.
///
/// Uses `RUST_LOG` if set, otherwise defaults based on verbosity flags.
pub fn init_logging(verbose: bool, quiet: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if quiet {
        EnvFilter::new("warn")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // A subscriber may already be installed (tests).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

// ============================================================================
// LearnpathCli
// ============================================================================

/// CLI application over a loaded configuration.
pub struct LearnpathCli {
    config: LearnpathConfig,
    version: String,
}

impl LearnpathCli {
    /// Create the application.
    pub fn new(config: LearnpathConfig) -> Self {
        Self {
            config,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Override the version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// The loaded configuration.
    pub fn config(&self) -> &LearnpathConfig {
        &self.config
    }

    /// Run one command.
    pub async fn run(&self, command: Option<BaseCommand>) -> Result<()> {
        match command {
            Some(BaseCommand::Version) => {
                println!("learnpath {}", self.version);
                Ok(())
            }
            Some(BaseCommand::Health) => {
                for line in self.health_report() {
                    println!("{line}");
                }
                self.config.load_default_graph().map(|_| ())
            }
            Some(BaseCommand::Serve { host, port }) => self.serve(host, port).await,
            Some(BaseCommand::Path(args)) => graph_handlers::handle_path(&self.config, args),
            Some(BaseCommand::Resolve { goal, source }) => {
                graph_handlers::handle_resolve(&self.config, &goal, &source)
            }
            Some(BaseCommand::Graph(cmd)) => self.handle_graph(cmd.command).await,
            Some(BaseCommand::Config(cmd)) => {
                config_handlers::handle_config_command(None, cmd.command)
            }
            None => {
                println!("learnpath {}: use --help for usage", self.version);
                Ok(())
            }
        }
    }

    /// Shared server state: default graph, topic cache, and the provider if
    /// one is configured.
    ///
    /// A provider that cannot be built (typically a missing API key) is
    /// logged and left out; path building keeps working without it.
    pub fn build_state(&self) -> Result<AppState> {
        let default = self.config.load_default_graph()?;
        let cache = self.config.build_cache(&default);
        let state = AppState::new(default, cache);

        match self.provider() {
            Ok(Some(provider)) => Ok(state.with_provider(provider)),
            Ok(None) => {
                tracing::info!("no LLM provider configured; generation, suggestions and chat disabled");
                Ok(state)
            }
            Err(e) => {
                tracing::warn!(error = %e, "LLM provider unavailable");
                Ok(state)
            }
        }
    }

    fn provider(&self) -> Result<Option<Arc<dyn LlmProvider>>> {
        build_provider(&self.config.provider_settings())
    }

    async fn serve(&self, host: Option<String>, port: Option<u16>) -> Result<()> {
        let host = host.unwrap_or_else(|| self.config.server.host.clone());
        let port = port.unwrap_or(self.config.server.port);
        let state = self.build_state()?;

        let listener = TcpListener::bind((host.as_str(), port)).await?;
        tracing::info!(
            project = self.config.project_name(),
            "serving on http://{host}:{port}"
        );

        learnpath_api::serve_with_shutdown(listener, state, async {
            if tokio::signal::ctrl_c().await.is_err() {
                tracing::warn!("could not listen for ctrl-c; stop the process to exit");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    async fn handle_graph(&self, command: GraphSubcommand) -> Result<()> {
        match command {
            GraphSubcommand::Validate { source } => {
                graph_handlers::handle_validate(&self.config, &source)
            }
            GraphSubcommand::Stats { source } => graph_handlers::handle_stats(&self.config, &source),
            GraphSubcommand::Show { source } => graph_handlers::handle_show(&self.config, &source),
            GraphSubcommand::Generate { topic, output } => {
                let provider = self.provider()?.ok_or_else(|| {
                    Error::config("graph generation needs llm.provider set to gemini or claude")
                })?;
                let generator = LlmGraphGenerator::new(provider);
                graph_handlers::handle_generate(
                    &self.config,
                    &generator,
                    &topic,
                    output.as_deref().map(Path::new),
                )
                .await
                .map(|_| ())
            }
        }
    }

    /// Human-readable status lines for `learnpath health`.
    pub fn health_report(&self) -> Vec<String> {
        let mut lines = vec![format!("{} {}", self.config.project_name(), self.version)];

        let config_path = LearnpathConfig::resolve_config_path(None)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string());
        lines.push(format!("config:   {config_path}"));

        let source = self
            .config
            .default_graph_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in".to_string());
        match self.config.load_default_graph() {
            Ok(graph) => {
                let validity = if is_valid(&graph) { "valid" } else { "has errors" };
                lines.push(format!(
                    "graph:    {source}: {} ({validity})",
                    quick_summary(&graph)
                ));
            }
            Err(e) => lines.push(format!("graph:    {source}: ERROR {e}")),
        }

        let provider = match self.provider() {
            Ok(Some(p)) => format!("{} ready", p.name()),
            Ok(None) => "disabled".to_string(),
            Err(e) => format!("ERROR {e}"),
        };
        lines.push(format!("provider: {provider}"));
        lines
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;
    use learnpath_llm::ProviderKind;

    fn offline_config() -> LearnpathConfig {
        let mut config = LearnpathConfig::default();
        config.llm.provider = ProviderKind::None;
        config
    }

    fn cli() -> LearnpathCli {
        LearnpathCli::new(offline_config()).with_version("0.1.0")
    }

    fn command(argv: &[&str]) -> Option<BaseCommand> {
        CliArgs::parse_from(argv).command
    }

    #[test]
    fn test_with_version() {
        assert_eq!(cli().version, "0.1.0");
        assert_eq!(cli().config().project_name(), "learnpath");
    }

    #[tokio::test]
    async fn test_run_simple_commands() {
        let app = cli();
        assert!(app.run(command(&["learnpath", "version"])).await.is_ok());
        assert!(app.run(None).await.is_ok());
        assert!(app.run(command(&["learnpath", "health"])).await.is_ok());
        assert!(
            app.run(command(&["learnpath", "resolve", "--goal", "vision"]))
                .await
                .is_ok()
        );
        assert!(
            app.run(command(&["learnpath", "path", "--goal", "nlp", "--known", "Introduction to ML"]))
                .await
                .is_ok()
        );
        assert!(app.run(command(&["learnpath", "graph", "stats"])).await.is_ok());
    }

    #[tokio::test]
    async fn test_health_fails_on_missing_graph() {
        let mut config = offline_config();
        config.graph.default_path = Some("/nonexistent/graph.json".into());
        let app = LearnpathCli::new(config);

        let report = app.health_report();
        assert!(report.iter().any(|l| l.contains("ERROR")));
        assert!(app.run(command(&["learnpath", "health"])).await.is_err());
    }

    #[test]
    fn test_health_report_offline() {
        let report = cli().health_report();
        assert_eq!(report[0], "learnpath 0.1.0");
        assert!(report.iter().any(|l| l.contains("built-in") && l.contains("(valid)")));
        assert!(report.iter().any(|l| l == "provider: disabled"));
    }

    #[test]
    fn test_build_state_without_provider() {
        let state = cli().build_state().unwrap();
        assert!(!state.has_provider());
        assert_eq!(state.default_graph().len(), 8);
        assert!(state.cache().fallback().is_some());
    }

    #[test]
    fn test_build_state_with_explicit_key() {
        let mut config = offline_config();
        config.llm.provider = ProviderKind::Claude;
        config.llm.api_key = Some("sk-test".into());
        let state = LearnpathCli::new(config).build_state().unwrap();
        assert!(state.has_provider());
    }

    #[tokio::test]
    async fn test_generate_without_provider_errors() {
        let err = cli()
            .run(command(&["learnpath", "graph", "generate", "--topic", "rust"]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_run_dispatches_config_before_loading() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is [not toml").unwrap();
        let path = path.to_str().unwrap();

        let args = CliArgs::parse_from(["learnpath", "--config", path, "config", "path"]);
        assert!(run(args).await.is_ok());

        let args = CliArgs::parse_from(["learnpath", "--config", path, "version"]);
        assert!(run(args).await.is_err());
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging(false, false);
        init_logging(true, false);
        init_logging(false, true);
    }
}
