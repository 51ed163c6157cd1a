//! CLI argument parsing and command definitions.

use clap::{Args, Parser, Subcommand};

// ============================================================================
// CLI argument types
// ============================================================================

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "learnpath", author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "LEARNPATH_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<BaseCommand>,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum BaseCommand {
    /// Start the HTTP API server.
    Serve {
        /// Host to bind to (overrides `server.host`).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides `server.port`).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Build a learning path towards a goal.
    Path(PathArgs),

    /// Show which concept a goal resolves to.
    Resolve {
        /// Free-text goal.
        #[arg(short, long)]
        goal: String,

        #[command(flatten)]
        source: GraphSource,
    },

    /// Print version information.
    Version,

    /// Check configuration, default graph, and provider setup.
    Health,

    /// Graph operations.
    Graph(GraphCommand),

    /// Configuration operations.
    Config(ConfigCommand),
}

/// Where to read a concept graph from.
#[derive(Args, Debug, Default, Clone)]
pub struct GraphSource {
    /// JSON graph file; the configured default graph when omitted.
    #[arg(long = "graph")]
    pub graph: Option<String>,
}

/// Arguments of `learnpath path`.
#[derive(Args, Debug)]
pub struct PathArgs {
    /// Free-text goal.
    #[arg(short, long, default_value = "")]
    pub goal: String,

    /// Known concepts, comma separated or repeated.
    #[arg(short, long, value_delimiter = ',')]
    pub known: Vec<String>,

    /// Concepts to review first, in priority order.
    #[arg(short, long, value_delimiter = ',')]
    pub struggling: Vec<String>,

    #[command(flatten)]
    pub source: GraphSource,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Get a configuration value by dotted key.
    Get {
        /// Dotted key (e.g., "server.port").
        key: String,
    },

    /// Set a configuration value by dotted key.
    Set {
        /// Dotted key (e.g., "llm.provider").
        key: String,

        /// Value to set.
        value: String,
    },

    /// Create a default configuration file.
    Init {
        /// Output file path (defaults to XDG config path).
        #[arg(short, long)]
        file: Option<String>,

        /// Overwrite existing file.
        #[arg(long)]
        force: bool,
    },

    /// Export configuration as environment variables.
    Export {
        /// Format as Docker --env flags.
        #[arg(long)]
        docker_env: bool,
    },
}

/// Graph-specific subcommands.
#[derive(Parser, Debug)]
pub struct GraphCommand {
    /// Graph subcommand to execute.
    #[command(subcommand)]
    pub command: GraphSubcommand,
}

/// Available graph subcommands.
#[derive(Subcommand, Debug)]
pub enum GraphSubcommand {
    /// Validate graph integrity.
    Validate {
        #[command(flatten)]
        source: GraphSource,
    },

    /// Show graph statistics.
    Stats {
        #[command(flatten)]
        source: GraphSource,
    },

    /// Print the graph as JSON.
    Show {
        #[command(flatten)]
        source: GraphSource,
    },

    /// Generate a graph for a topic with the configured LLM provider.
    Generate {
        /// Topic to generate a graph for.
        #[arg(short, long)]
        topic: String,

        /// Output file; stdout when omitted.
        #[arg(short, long)]
        output: Option<String>,
    },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_args_default() {
        let args = CliArgs::parse_from(["learnpath"]);
        assert!(!args.verbose);
        assert!(!args.quiet);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_cli_args_flags() {
        let args = CliArgs::parse_from(["learnpath", "-v", "--config", "/tmp/c.toml"]);
        assert!(args.verbose);
        assert_eq!(args.config.as_deref(), Some("/tmp/c.toml"));
    }

    #[test]
    fn test_serve_command() {
        let args = CliArgs::parse_from(["learnpath", "serve"]);
        match args.command {
            Some(BaseCommand::Serve { host, port }) => {
                assert!(host.is_none());
                assert!(port.is_none());
            }
            _ => panic!("Expected Serve command"),
        }

        let args = CliArgs::parse_from(["learnpath", "serve", "--port", "8080"]);
        match args.command {
            Some(BaseCommand::Serve { port, .. }) => assert_eq!(port, Some(8080)),
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_path_command() {
        let args = CliArgs::parse_from([
            "learnpath",
            "path",
            "--goal",
            "deep learning",
            "--known",
            "Introduction to ML,Supervised Learning",
            "--struggling",
            "Unsupervised Learning",
            "--graph",
            "g.json",
        ]);
        match args.command {
            Some(BaseCommand::Path(path)) => {
                assert_eq!(path.goal, "deep learning");
                assert_eq!(path.known, vec!["Introduction to ML", "Supervised Learning"]);
                assert_eq!(path.struggling, vec!["Unsupervised Learning"]);
                assert_eq!(path.source.graph.as_deref(), Some("g.json"));
                assert!(!path.json);
            }
            _ => panic!("Expected Path command"),
        }
    }

    #[test]
    fn test_path_command_repeated_known() {
        let args = CliArgs::parse_from(["learnpath", "path", "-k", "A", "-k", "B", "--json"]);
        match args.command {
            Some(BaseCommand::Path(path)) => {
                assert_eq!(path.goal, "");
                assert_eq!(path.known, vec!["A", "B"]);
                assert!(path.json);
            }
            _ => panic!("Expected Path command"),
        }
    }

    #[test]
    fn test_resolve_command() {
        let args = CliArgs::parse_from(["learnpath", "resolve", "--goal", "nlp"]);
        match args.command {
            Some(BaseCommand::Resolve { goal, source }) => {
                assert_eq!(goal, "nlp");
                assert!(source.graph.is_none());
            }
            _ => panic!("Expected Resolve command"),
        }
    }

    #[test]
    fn test_version_and_health() {
        let args = CliArgs::parse_from(["learnpath", "version"]);
        assert!(matches!(args.command, Some(BaseCommand::Version)));
        let args = CliArgs::parse_from(["learnpath", "health"]);
        assert!(matches!(args.command, Some(BaseCommand::Health)));
    }

    #[test]
    fn test_graph_subcommands() {
        let args = CliArgs::parse_from(["learnpath", "graph", "validate", "--graph", "x.json"]);
        match args.command {
            Some(BaseCommand::Graph(GraphCommand {
                command: GraphSubcommand::Validate { source },
            })) => assert_eq!(source.graph.as_deref(), Some("x.json")),
            _ => panic!("Expected Graph Validate command"),
        }

        let args = CliArgs::parse_from(["learnpath", "graph", "stats"]);
        assert!(matches!(
            args.command,
            Some(BaseCommand::Graph(GraphCommand {
                command: GraphSubcommand::Stats { .. }
            }))
        ));

        let args = CliArgs::parse_from(["learnpath", "graph", "show"]);
        assert!(matches!(
            args.command,
            Some(BaseCommand::Graph(GraphCommand {
                command: GraphSubcommand::Show { .. }
            }))
        ));
    }

    #[test]
    fn test_graph_generate_command() {
        let args = CliArgs::parse_from([
            "learnpath", "graph", "generate", "--topic", "music theory", "-o", "out.json",
        ]);
        match args.command {
            Some(BaseCommand::Graph(GraphCommand {
                command: GraphSubcommand::Generate { topic, output },
            })) => {
                assert_eq!(topic, "music theory");
                assert_eq!(output.as_deref(), Some("out.json"));
            }
            _ => panic!("Expected Graph Generate command"),
        }
    }

    #[test]
    fn test_config_commands() {
        let args = CliArgs::parse_from(["learnpath", "config", "set", "llm.provider", "claude"]);
        match args.command {
            Some(BaseCommand::Config(ConfigCommand {
                command: ConfigAction::Set { key, value },
            })) => {
                assert_eq!(key, "llm.provider");
                assert_eq!(value, "claude");
            }
            _ => panic!("Expected Config Set command"),
        }

        let args = CliArgs::parse_from(["learnpath", "config", "init", "--force"]);
        match args.command {
            Some(BaseCommand::Config(ConfigCommand {
                command: ConfigAction::Init { file, force },
            })) => {
                assert!(file.is_none());
                assert!(force);
            }
            _ => panic!("Expected Config Init command"),
        }

        let args = CliArgs::parse_from(["learnpath", "config", "export", "--docker-env"]);
        assert!(matches!(
            args.command,
            Some(BaseCommand::Config(ConfigCommand {
                command: ConfigAction::Export { docker_env: true }
            }))
        ));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        CliArgs::command().debug_assert();
    }
}
