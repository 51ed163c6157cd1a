//! Goal resolution: free-text goal → concept name.
//!
//! The goal is trimmed and lower-cased, then compared against each concept
//! name (lower-cased) in the graph's stored order. The first match wins.
//! When nothing matches, the first concept in the graph is used, so
//! resolution never fails on a non-empty graph.

use crate::types::ConceptGraph;
use learnpath_core::{Error, Result};

/// Strategy deciding whether a concept name satisfies a goal.
///
/// Both arguments arrive already lower-cased; the goal is also trimmed.
pub trait GoalMatcher: Send + Sync {
    /// Whether `concept` (lower-cased) satisfies `goal` (normalized).
    fn matches(&self, goal: &str, concept: &str) -> bool;

    /// Name of this matcher for logging.
    fn name(&self) -> &str {
        "unnamed"
    }
}

/// Matches when the concept name contains the goal as a substring.
#[derive(Clone, Copy, Debug, Default)]
pub struct SubstringMatcher;

impl GoalMatcher for SubstringMatcher {
    fn matches(&self, goal: &str, concept: &str) -> bool {
        concept.contains(goal)
    }

    fn name(&self) -> &str {
        "substring"
    }
}

/// Matches only when the concept name equals the goal, ignoring case.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactMatcher;

impl GoalMatcher for ExactMatcher {
    fn matches(&self, goal: &str, concept: &str) -> bool {
        concept == goal
    }

    fn name(&self) -> &str {
        "exact"
    }
}

/// Trim and lower-case a goal string.
pub fn normalize_goal(goal: &str) -> String {
    goal.trim().to_lowercase()
}

/// Resolve a goal with the default [`SubstringMatcher`].
///
/// # Errors
///
/// Returns [`Error::EmptyGraph`] if the graph has no concepts.
pub fn resolve_goal<'g>(goal: &str, graph: &'g ConceptGraph) -> Result<&'g str> {
    resolve_goal_with(&SubstringMatcher, goal, graph)
}

/// Resolve a goal with a caller-chosen matcher.
///
/// # Errors
///
/// Returns [`Error::EmptyGraph`] if the graph has no concepts.
pub fn resolve_goal_with<'g, M: GoalMatcher + ?Sized>(
    matcher: &M,
    goal: &str,
    graph: &'g ConceptGraph,
) -> Result<&'g str> {
    let first = graph.first().ok_or(Error::EmptyGraph)?;
    let goal = normalize_goal(goal);

    let matched = graph
        .names()
        .find(|name| matcher.matches(&goal, &name.to_lowercase()));

    match matched {
        Some(name) => Ok(name),
        None => {
            log::debug!(
                "no concept matched goal {goal:?} ({} matcher), using {:?}",
                matcher.name(),
                first.name
            );
            Ok(first.name.as_str())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::defaults::default_graph;
    use crate::types::Concept;

    #[test]
    fn test_resolve_substring_match() {
        let graph = default_graph();
        assert_eq!(resolve_goal("ml", &graph).unwrap(), "Introduction to ML");
        assert_eq!(
            resolve_goal("deep learning", &graph).unwrap(),
            "Deep Learning Basics"
        );
    }

    #[test]
    fn test_resolve_normalizes_input() {
        let graph = default_graph();
        assert_eq!(
            resolve_goal("   NLP  ", &graph).unwrap(),
            "Natural Language Processing (NLP)"
        );
        assert_eq!(resolve_goal("MLOPS", &graph).unwrap(), "MLOps Fundamentals");
    }

    #[test]
    fn test_resolve_first_match_in_stored_order() {
        // "learning" appears in several names; stored order decides.
        let graph = default_graph();
        assert_eq!(
            resolve_goal("learning", &graph).unwrap(),
            "Supervised Learning"
        );
    }

    #[test]
    fn test_resolve_no_match_falls_back_to_first() {
        let graph = default_graph();
        assert_eq!(
            resolve_goal("zzz-no-match", &graph).unwrap(),
            "Introduction to ML"
        );
    }

    #[test]
    fn test_resolve_blank_goal_matches_first() {
        let graph = default_graph();
        assert_eq!(resolve_goal("   ", &graph).unwrap(), "Introduction to ML");
    }

    #[test]
    fn test_resolve_empty_graph() {
        let graph = ConceptGraph::new();
        assert!(matches!(
            resolve_goal("anything", &graph),
            Err(Error::EmptyGraph)
        ));
        assert!(matches!(
            resolve_goal_with(&ExactMatcher, "", &graph),
            Err(Error::EmptyGraph)
        ));
    }

    #[test]
    fn test_exact_matcher() {
        let graph = ConceptGraph::new()
            .with_concept(Concept::new("Linear Algebra"))
            .with_concept(Concept::new("Algebra"));

        assert_eq!(
            resolve_goal_with(&ExactMatcher, "algebra", &graph).unwrap(),
            "Algebra"
        );
        assert_eq!(resolve_goal("algebra", &graph).unwrap(), "Linear Algebra");
        assert_eq!(
            resolve_goal_with(&ExactMatcher, "geometry", &graph).unwrap(),
            "Linear Algebra"
        );
    }

    #[test]
    fn test_matcher_names() {
        assert_eq!(SubstringMatcher.name(), "substring");
        assert_eq!(ExactMatcher.name(), "exact");
    }

    #[test]
    fn test_dyn_matcher() {
        let graph = default_graph();
        let matcher: Box<dyn GoalMatcher> = Box::new(SubstringMatcher);
        assert_eq!(
            resolve_goal_with(matcher.as_ref(), "vision", &graph).unwrap(),
            "Computer Vision (CV)"
        );
    }
}
