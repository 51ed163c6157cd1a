//! Learning path construction.
//!
//! Depth-first, prerequisite-first, post-order: a concept is emitted only
//! after every prerequisite it still needs. Struggling concepts are seeded
//! before the target, so they and their unmet prerequisites land earlier in
//! the path.
//!
//! Policy, not errors:
//!
//! - Known concepts are never entered, so their whole prerequisite subtree is
//!   skipped unless reached through an unknown concept. A known target
//!   therefore disappears from the path.
//! - Prerequisites missing from the graph are leaves.
//! - Cycles are not detected; the `visited` guard cuts them at re-entry.
//!
//! Traversal uses an explicit stack of frames instead of recursion so deep
//! prerequisite chains cannot overflow the thread stack.

use crate::resolver::{GoalMatcher, SubstringMatcher, resolve_goal_with};
use crate::types::ConceptGraph;
use learnpath_core::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// Types
// ============================================================================

/// Ordered, duplicate-free sequence of concept names to study.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LearningPath(Vec<String>);

impl LearningPath {
    /// Concept names in study order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Number of concepts in the path.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Position of a concept in the path.
    pub fn position(&self, concept: &str) -> Option<usize> {
        self.0.iter().position(|c| c == concept)
    }

    /// Whether the path includes a concept.
    pub fn contains(&self, concept: &str) -> bool {
        self.position(concept).is_some()
    }

    /// Iterate concept names in order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Consume into the underlying vector.
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl IntoIterator for LearningPath {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Collects names into a path, keeping the first occurrence of each.
impl FromIterator<String> for LearningPath {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        LearningPath(
            iter.into_iter()
                .filter(|c| seen.insert(c.clone()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a LearningPath {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Result of resolving a goal and building its path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Concept the goal resolved to.
    pub goal_concept: String,
    /// Concepts to study, in order.
    pub path: LearningPath,
}

/// One level of the traversal stack.
struct Frame<'a> {
    concept: &'a str,
    /// Index of the next prerequisite to visit.
    cursor: usize,
}

// ============================================================================
// Path building
// ============================================================================

/// Build the learning path towards `target`.
///
/// Struggling concepts are visited in the given order before `target`.
/// Deterministic: identical inputs over an unchanged graph yield an
/// identical path.
pub fn build_path<S: AsRef<str>>(
    target: &str,
    known: &HashSet<String>,
    struggling: &[S],
    graph: &ConceptGraph,
) -> LearningPath {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut emitted: Vec<&str> = Vec::new();

    let seeds = struggling.iter().map(|s| s.as_ref()).chain([target]);
    for seed in seeds {
        visit(seed, graph, known, &mut visited, &mut emitted);
    }

    let mut seen = HashSet::with_capacity(emitted.len());
    let ordered = emitted
        .into_iter()
        .filter(|c| seen.insert(*c))
        .map(str::to_string)
        .collect();

    LearningPath(ordered)
}

/// Post-order walk from `seed`, appending newly finished concepts.
fn visit<'a>(
    seed: &'a str,
    graph: &'a ConceptGraph,
    known: &HashSet<String>,
    visited: &mut HashSet<&'a str>,
    emitted: &mut Vec<&'a str>,
) {
    if visited.contains(seed) || known.contains(seed) {
        return;
    }
    visited.insert(seed);

    let mut stack = vec![Frame {
        concept: seed,
        cursor: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let prerequisites = graph.prerequisites_of(frame.concept);
        match prerequisites.get(frame.cursor) {
            Some(next) => {
                frame.cursor += 1;
                let next = next.as_str();
                if !visited.contains(next) && !known.contains(next) {
                    visited.insert(next);
                    stack.push(Frame {
                        concept: next,
                        cursor: 0,
                    });
                }
            }
            None => {
                emitted.push(frame.concept);
                stack.pop();
            }
        }
    }
}

/// Resolve `goal` with the substring matcher and build its path.
///
/// # Errors
///
/// Returns [`learnpath_core::Error::EmptyGraph`] if the graph has no concepts.
pub fn recommend<S: AsRef<str>>(
    goal: &str,
    known: &HashSet<String>,
    struggling: &[S],
    graph: &ConceptGraph,
) -> Result<Recommendation> {
    recommend_with(&SubstringMatcher, goal, known, struggling, graph)
}

/// Resolve `goal` with a caller-chosen matcher and build its path.
///
/// # Errors
///
/// Returns [`learnpath_core::Error::EmptyGraph`] if the graph has no concepts.
pub fn recommend_with<M: GoalMatcher + ?Sized, S: AsRef<str>>(
    matcher: &M,
    goal: &str,
    known: &HashSet<String>,
    struggling: &[S],
    graph: &ConceptGraph,
) -> Result<Recommendation> {
    let target = resolve_goal_with(matcher, goal, graph)?;
    let path = build_path(target, known, struggling, graph);

    log::debug!(
        "goal {goal:?} -> {target:?}: {} concept(s), {} known, {} struggling",
        path.len(),
        known.len(),
        struggling.len()
    );

    Ok(Recommendation {
        goal_concept: target.to_string(),
        path,
    })
}

// ============================================================================
// Tests
// ============================================================================
