//! Concept graphs and learning path construction.
//!
//! This crate holds the core of learnpath: the concept graph model, goal
//! resolution, the prerequisite-first path builder, and the topic-keyed
//! cache of generated graphs.
//!
//! # Modules
//!
//! - [`types`]: `Concept`, `Resource`, `ConceptGraph`
//! - [`resolver`]: free-text goal to concept name (`GoalMatcher`)
//! - [`path`]: `build_path` and `recommend`
//! - [`normalize`]: raw generator output to `ConceptGraph`
//! - [`cache`]: `GraphCache` and the `GraphGenerator` trait
//! - [`defaults`]: the built-in machine-learning curriculum
//! - [`validation`], [`stats`], [`persistence`]: tooling for graph files
//!
//! # Example
//!
//! ```
//! use learnpath_graph::{default_graph, recommend};
//! use std::collections::HashSet;
//!
//! let graph = default_graph();
//! let known: HashSet<String> = ["Introduction to ML".to_string()].into();
//! let rec = recommend("deep learning", &known, &[] as &[&str], &graph).unwrap();
//!
//! assert_eq!(rec.goal_concept, "Deep Learning Basics");
//! assert_eq!(
//!     rec.path.as_slice(),
//!     ["Supervised Learning", "Unsupervised Learning", "Deep Learning Basics"]
//! );
//! ```

pub mod cache;
pub mod defaults;
pub mod normalize;
pub mod path;
pub mod persistence;
pub mod resolver;
pub mod stats;
pub mod types;
pub mod validation;

pub use cache::{DEFAULT_GENERATOR_TIMEOUT, GraphCache, GraphGenerator, normalize_topic};
pub use defaults::default_graph;
pub use normalize::{normalize_raw, parse_generator_output, strip_code_fence};
pub use path::{LearningPath, Recommendation, build_path, recommend, recommend_with};
pub use persistence::{load_graph, load_graph_from_str, save_graph, to_json_pretty};
pub use resolver::{ExactMatcher, GoalMatcher, SubstringMatcher, resolve_goal, resolve_goal_with};
pub use stats::{GraphStats, compute_stats, longest_chain, quick_summary};
pub use types::{Concept, ConceptGraph, PLACEHOLDER_URL, Resource};
pub use validation::{ValidationIssue, ValidationResult, is_valid, validate_graph};

#[cfg(any(test, feature = "test-utils"))]
pub use cache::mock::{MockBehavior, MockGraphGenerator};
