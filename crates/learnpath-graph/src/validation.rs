//! Concept graph validation and integrity checking.
//!
//! Path building tolerates every issue reported here (cycles, dangling
//! references, duplicates). Validation exists so graph authors can find
//! them before a learner does.

use crate::types::ConceptGraph;
use petgraph::algo::toposort;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// Types
// ============================================================================

/// Result of graph validation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the graph is valid (no critical issues).
    pub valid: bool,
    /// Critical issues that should be fixed.
    pub errors: Vec<ValidationIssue>,
    /// Non-critical issues (warnings).
    pub warnings: Vec<ValidationIssue>,
    /// Informational findings.
    pub info: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Create a new empty (valid) result.
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            info: Vec::new(),
        }
    }

    /// Add an error (marks graph as invalid).
    pub fn add_error(&mut self, issue: ValidationIssue) {
        self.valid = false;
        self.errors.push(issue);
    }

    /// Add a warning.
    pub fn add_warning(&mut self, issue: ValidationIssue) {
        self.warnings.push(issue);
    }

    /// Add an informational finding.
    pub fn add_info(&mut self, issue: ValidationIssue) {
        self.info.push(issue);
    }

    /// Total issue count (errors + warnings).
    pub fn total_issues(&self) -> usize {
        self.errors.len() + self.warnings.len()
    }

    /// Find an issue of any severity by code.
    pub fn find(&self, code: &str) -> Option<&ValidationIssue> {
        self.errors
            .iter()
            .chain(&self.warnings)
            .chain(&self.info)
            .find(|issue| issue.code == code)
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// A validation issue found in the graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Issue code, e.g. `PREREQUISITE_CYCLE`.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Affected concept names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concepts: Vec<String>,
    /// Affected prerequisite links, rendered `prerequisite -> concept`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
}

impl ValidationIssue {
    /// Create a new issue.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            concepts: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Attach affected concepts.
    pub fn with_concepts(mut self, concepts: Vec<String>) -> Self {
        self.concepts = concepts;
        self
    }

    /// Attach affected links.
    pub fn with_links(mut self, links: Vec<String>) -> Self {
        self.links = links;
        self
    }
}

// ============================================================================
// Validation functions
// ============================================================================

/// Validate a concept graph.
///
/// Errors: self-referencing concepts, prerequisite cycles.
/// Warnings: prerequisites naming unknown concepts, repeated prerequisites.
/// Info: concepts with no prerequisites that nothing depends on.
pub fn validate_graph(graph: &ConceptGraph) -> ValidationResult {
    let mut result = ValidationResult::new();

    check_self_loops(graph, &mut result);
    check_prerequisite_cycles(graph, &mut result);
    check_dangling(graph, &mut result);
    check_duplicates(graph, &mut result);
    check_isolated(graph, &mut result);

    result
}

/// Quick check if graph has any validation errors.
pub fn is_valid(graph: &ConceptGraph) -> bool {
    validate_graph(graph).valid
}

// ============================================================================
// Individual checks
// ============================================================================

fn check_self_loops(graph: &ConceptGraph, result: &mut ValidationResult) {
    let self_loops: Vec<String> = graph
        .iter()
        .filter(|c| c.prerequisites.contains(&c.name))
        .map(|c| c.name.clone())
        .collect();

    if !self_loops.is_empty() {
        result.add_error(
            ValidationIssue::new(
                "SELF_LOOPS",
                format!("{} concept(s) list themselves as a prerequisite", self_loops.len()),
            )
            .with_concepts(self_loops),
        );
    }
}

/// Cycles of length two or more. Self-loops are reported separately.
fn check_prerequisite_cycles(graph: &ConceptGraph, result: &mut ValidationResult) {
    let (mut digraph, _) = graph.to_digraph();
    digraph.retain_edges(|g, e| g.edge_endpoints(e).is_some_and(|(a, b)| a != b));

    if let Err(cycle) = toposort(&digraph, None) {
        let concept = digraph[cycle.node_id()].to_string();
        result.add_error(
            ValidationIssue::new(
                "PREREQUISITE_CYCLE",
                format!("Cycle detected in prerequisites involving {concept:?}"),
            )
            .with_concepts(vec![concept]),
        );
    }
}

fn check_dangling(graph: &ConceptGraph, result: &mut ValidationResult) {
    let dangling: Vec<String> = graph
        .iter()
        .flat_map(|c| {
            c.prerequisites
                .iter()
                .filter(|p| !graph.contains(p))
                .map(move |p| format!("{p} -> {}", c.name))
        })
        .collect();

    if !dangling.is_empty() {
        result.add_warning(
            ValidationIssue::new(
                "DANGLING_PREREQUISITES",
                format!("{} prerequisite(s) name unknown concepts", dangling.len()),
            )
            .with_links(dangling),
        );
    }
}

fn check_duplicates(graph: &ConceptGraph, result: &mut ValidationResult) {
    let mut duplicates: Vec<String> = Vec::new();

    for concept in graph.iter() {
        let mut seen: HashSet<&str> = HashSet::new();
        for prereq in &concept.prerequisites {
            if !seen.insert(prereq) {
                duplicates.push(format!("{prereq} -> {}", concept.name));
            }
        }
    }

    if !duplicates.is_empty() {
        result.add_warning(
            ValidationIssue::new(
                "DUPLICATE_PREREQUISITES",
                format!("{} repeated prerequisite(s) found", duplicates.len()),
            )
            .with_links(duplicates),
        );
    }
}

fn check_isolated(graph: &ConceptGraph, result: &mut ValidationResult) {
    let depended_on: HashSet<&str> = graph
        .iter()
        .flat_map(|c| c.prerequisites.iter().map(String::as_str))
        .collect();

    let isolated: Vec<String> = graph
        .iter()
        .filter(|c| c.prerequisites.is_empty() && !depended_on.contains(c.name.as_str()))
        .map(|c| c.name.clone())
        .collect();

    // A single-concept graph is trivially isolated; not worth reporting.
    if !isolated.is_empty() && graph.len() > 1 {
        result.add_info(
            ValidationIssue::new(
                "ISOLATED_CONCEPTS",
                format!("{} concept(s) are not connected to any other", isolated.len()),
            )
            .with_concepts(isolated),
        );
    }
}

// ============================================================================
// Tests
// ============================================================================
