//! Command-line interface for learnpath.
//!
//! - [`cli`]: clap argument types
//! - [`config`]: [`LearnpathConfig`], loaded with `confyg`
//! - [`app`]: command dispatch and server start-up
//! - [`graph_handlers`] / [`config_handlers`]: command implementations

pub mod app;
pub mod cli;
pub mod config;
pub mod config_handlers;
pub mod graph_handlers;

pub use app::{LearnpathCli, init_logging, run};
pub use cli::{BaseCommand, CliArgs};
pub use config::LearnpathConfig;
