//! Handler functions for graph and path CLI commands.
//!
//! Rendering is split from printing so the output can be checked in tests.

use learnpath_core::traits::ConfigProvider;
use learnpath_core::{Error, Result};
use learnpath_graph::{
    ConceptGraph, GraphCache, GraphGenerator, GraphStats, Recommendation, ValidationIssue,
    ValidationResult, compute_stats, default_graph, load_graph, quick_summary, recommend,
    resolve_goal, save_graph, to_json_pretty, validate_graph,
};
use serde_json::json;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::cli::{GraphSource, PathArgs};

// ============================================================================
// Helper: resolve graph source
// ============================================================================

/// Load the graph named by `--graph`, else the configured default graph,
/// else the built-in curriculum.
pub fn load_source<C: ConfigProvider>(config: &C, source: &GraphSource) -> Result<ConceptGraph> {
    let path = source
        .graph
        .as_deref()
        .map(PathBuf::from)
        .or_else(|| config.default_graph_path());

    match path {
        Some(path) => {
            log::debug!("loading graph from {}", path.display());
            load_graph(path)
        }
        None => Ok(default_graph()),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// `learnpath path`
pub fn handle_path<C: ConfigProvider>(config: &C, args: PathArgs) -> Result<()> {
    let graph = load_source(config, &args.source)?;
    let known: HashSet<String> = args.known.iter().cloned().collect();
    let rec = recommend(&args.goal, &known, &args.struggling, &graph)?;

    if args.json {
        let body = json!({
            "goal_concept": rec.goal_concept,
            "path": rec.path,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print!("{}", render_path(&rec));
    }
    Ok(())
}

/// `learnpath resolve`
pub fn handle_resolve<C: ConfigProvider>(config: &C, goal: &str, source: &GraphSource) -> Result<()> {
    let graph = load_source(config, source)?;
    let concept = resolve_goal(goal, &graph)?;
    println!("{concept}");
    Ok(())
}

/// `learnpath graph validate`
pub fn handle_validate<C: ConfigProvider>(config: &C, source: &GraphSource) -> Result<()> {
    let graph = load_source(config, source)?;
    let result = validate_graph(&graph);
    print!("{}", render_validation(&result));

    if result.valid {
        Ok(())
    } else {
        Err(Error::malformed(format!(
            "graph validation failed with {} error(s)",
            result.errors.len()
        )))
    }
}

/// `learnpath graph stats`
pub fn handle_stats<C: ConfigProvider>(config: &C, source: &GraphSource) -> Result<()> {
    let graph = load_source(config, source)?;
    print!("{}", render_stats(&compute_stats(&graph)));
    Ok(())
}

/// `learnpath graph show`
pub fn handle_show<C: ConfigProvider>(config: &C, source: &GraphSource) -> Result<()> {
    let graph = load_source(config, source)?;
    println!("{}", to_json_pretty(&graph)?);
    Ok(())
}

/// `learnpath graph generate`
///
/// Runs one generation under the configured timeout. The fallback graph is
/// never substituted here: a failed generation is reported as an error.
pub async fn handle_generate<C: ConfigProvider>(
    config: &C,
    generator: &dyn GraphGenerator,
    topic: &str,
    output: Option<&Path>,
) -> Result<ConceptGraph> {
    let cache = GraphCache::new().with_timeout(config.generator_timeout());
    let graph = cache.get_or_build(topic, generator).await?;
    let graph = ConceptGraph::clone(&graph);

    match output {
        Some(path) => {
            save_graph(&graph, path)?;
            eprintln!("{} written to {}", quick_summary(&graph), path.display());
        }
        None => println!("{}", to_json_pretty(&graph)?),
    }
    Ok(graph)
}

// ============================================================================
// Rendering
// ============================================================================

/// Numbered path listing.
pub fn render_path(rec: &Recommendation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Goal: {}", rec.goal_concept);
    if rec.path.is_empty() {
        let _ = writeln!(out, "  (nothing left to study)");
    }
    for (i, concept) in rec.path.iter().enumerate() {
        let _ = writeln!(out, "  {}. {concept}", i + 1);
    }
    out
}

/// Validation report with a summary line.
pub fn render_validation(result: &ValidationResult) -> String {
    let mut out = String::new();
    if result.valid {
        let _ = writeln!(out, "Graph is valid.");
    } else {
        let _ = writeln!(out, "Graph has validation issues:");
    }

    for (label, issues) in [
        ("ERROR", &result.errors),
        ("WARN ", &result.warnings),
        ("INFO ", &result.info),
    ] {
        for issue in issues {
            render_issue(&mut out, label, issue);
        }
    }

    let _ = writeln!(
        out,
        "\nSummary: {} error(s), {} warning(s)",
        result.errors.len(),
        result.warnings.len()
    );
    out
}

fn render_issue(out: &mut String, label: &str, issue: &ValidationIssue) {
    let _ = writeln!(out, "  {label} [{}]: {}", issue.code, issue.message);
    for item in issue.concepts.iter().chain(&issue.links) {
        let _ = writeln!(out, "    - {item}");
    }
}

/// Statistics table.
pub fn render_stats(stats: &GraphStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Graph Statistics");
    let _ = writeln!(out, "================");
    let _ = writeln!(out, "Concepts:          {}", stats.concept_count);
    let _ = writeln!(out, "  Roots:           {}", stats.root_count);
    let _ = writeln!(out, "Prerequisites:     {}", stats.edge_count);
    let _ = writeln!(out, "  Dangling:        {}", stats.dangling_count);
    let _ = writeln!(out, "Avg prerequisites: {:.2}", stats.avg_prerequisites);
    let _ = writeln!(out, "Max prerequisites: {}", stats.max_prerequisites);

    if let Some(ref name) = stats.most_depended_on {
        let _ = writeln!(
            out,
            "Most depended on:  {name} ({} dependents)",
            stats.max_dependents
        );
    }

    if stats.has_cycle {
        let _ = writeln!(out, "Longest chain:     (graph has a cycle)");
    } else if !stats.longest_chain.is_empty() {
        let _ = writeln!(
            out,
            "Longest chain:     {}",
            stats.longest_chain.join(" -> ")
        );
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
