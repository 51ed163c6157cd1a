//! Concept graph statistics.
//!
//! Counts, dependency rankings, and the longest prerequisite chain.

use crate::types::ConceptGraph;
use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Types
// ============================================================================

/// Summary statistics for a concept graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphStats {
    /// Number of concepts.
    pub concept_count: usize,
    /// Number of prerequisite references, dangling ones included.
    pub edge_count: usize,
    /// Concepts with no prerequisites.
    pub root_count: usize,
    /// Prerequisite references naming unknown concepts.
    pub dangling_count: usize,
    /// Mean number of prerequisites per concept.
    pub avg_prerequisites: f32,
    /// Largest prerequisite list.
    pub max_prerequisites: usize,
    /// Concept listed as a prerequisite most often (first in graph order on ties).
    pub most_depended_on: Option<String>,
    /// How many concepts list `most_depended_on`.
    pub max_dependents: usize,
    /// Whether the prerequisite relation contains a cycle.
    pub has_cycle: bool,
    /// Longest prerequisite chain, foundation first. Empty when cyclic.
    pub longest_chain: Vec<String>,
}

// ============================================================================
// Functions
// ============================================================================

/// Compute statistics for a graph.
pub fn compute_stats(graph: &ConceptGraph) -> GraphStats {
    let concept_count = graph.len();
    let edge_count = graph.edge_count();

    let root_count = graph.iter().filter(|c| c.prerequisites.is_empty()).count();
    let dangling_count = graph
        .iter()
        .flat_map(|c| &c.prerequisites)
        .filter(|p| !graph.contains(p))
        .count();

    let avg_prerequisites = if concept_count > 0 {
        edge_count as f32 / concept_count as f32
    } else {
        0.0
    };
    let max_prerequisites = graph
        .iter()
        .map(|c| c.prerequisites.len())
        .max()
        .unwrap_or(0);

    let mut dependents: HashMap<&str, usize> = HashMap::new();
    for concept in graph.iter() {
        for prereq in &concept.prerequisites {
            *dependents.entry(prereq.as_str()).or_insert(0) += 1;
        }
    }
    let (most_depended_on, max_dependents) = graph
        .names()
        .filter_map(|name| dependents.get(name).map(|&n| (name, n)))
        .fold((None, 0), |best, (name, n)| {
            if n > best.1 { (Some(name.to_string()), n) } else { best }
        });

    let chain = longest_chain(graph);

    GraphStats {
        concept_count,
        edge_count,
        root_count,
        dangling_count,
        avg_prerequisites,
        max_prerequisites,
        most_depended_on,
        max_dependents,
        has_cycle: chain.is_none(),
        longest_chain: chain.unwrap_or_default(),
    }
}

/// Longest prerequisite chain, foundation first.
///
/// Returns `None` if the prerequisite relation is cyclic. Dangling
/// prerequisites do not extend a chain.
pub fn longest_chain(graph: &ConceptGraph) -> Option<Vec<String>> {
    let (digraph, _) = graph.to_digraph();
    let order = toposort(&digraph, None).ok()?;

    // length of the longest chain ending at each node, and its predecessor
    let mut best: HashMap<NodeIndex, (usize, Option<NodeIndex>)> = HashMap::new();
    for &node in &order {
        let entry = digraph
            .neighbors_directed(node, Direction::Incoming)
            .filter_map(|pred| best.get(&pred).map(|&(len, _)| (len + 1, Some(pred))))
            .max_by_key(|&(len, _)| len)
            .unwrap_or((1, None));
        best.insert(node, entry);
    }

    let mut tail = order
        .iter()
        .copied()
        .max_by_key(|node| best.get(node).map_or(0, |&(len, _)| len));

    let mut chain = Vec::new();
    while let Some(node) = tail {
        chain.push(digraph[node].to_string());
        tail = best.get(&node).and_then(|&(_, pred)| pred);
    }
    chain.reverse();
    Some(chain)
}

/// One-line summary of graph size.
pub fn quick_summary(graph: &ConceptGraph) -> String {
    format!(
        "{} concepts, {} prerequisite links",
        graph.len(),
        graph.edge_count()
    )
}

// ============================================================================
// Tests
// ============================================================================
