//! Prompt templates sent to the model.

use learnpath_graph::{ConceptGraph, PLACEHOLDER_URL};
use std::collections::HashSet;

/// Goal used in the path prompt when the learner gave none.
pub const DEFAULT_GOAL: &str = "Understand Machine Learning Concepts";

/// System prompt for graph generation.
pub const GRAPH_SYSTEM_PROMPT: &str =
    "You are an assistant that builds structured knowledge graphs for educational purposes.";

/// System prompt for path suggestions.
pub const PATH_SYSTEM_PROMPT: &str = "You create personalized learning paths.";

/// System prompt for study questions.
pub const CHAT_SYSTEM_PROMPT: &str =
    "You are a study assistant. Answer the learner's question concisely and accurately.";

/// Prompt asking for a knowledge graph about `topic`.
pub fn graph_prompt(topic: &str) -> String {
    format!(
        r#"Given a topic, generate a knowledge graph as a JSON object.
The keys of the JSON object MUST be the concept names (e.g., "Introduction to ML").
Each value MUST be an object containing:
- "prerequisites": an array of concept names that must be learned before this concept.
- "resources": an array of objects, each with "type" (e.g. "video", "article", "book"), "title", and "url".
Give each concept at least 3 articles, 2 videos, and 1 book.
Use real, valid URLs where possible. If no real URL is available, use "{PLACEHOLDER_URL}".
Every prerequisite MUST itself be a key of the object. Do not create cycles.
Aim for 8-12 core concepts relevant to the topic, foundations first.

Topic: {topic}"#
    )
}

/// Prompt asking for a learning path over an existing graph.
pub fn path_prompt(
    goal: &str,
    known: &HashSet<String>,
    struggling: &[String],
    graph: &ConceptGraph,
) -> String {
    let goal = if goal.trim().is_empty() {
        DEFAULT_GOAL
    } else {
        goal.trim()
    };

    let mut known: Vec<&str> = known.iter().map(String::as_str).collect();
    known.sort_unstable();

    let listing = graph
        .iter()
        .map(|c| format!("- {}: Prerequisites: [{}]", c.name, c.prerequisites.join(", ")))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Based on the learner's goal, their current knowledge, and the knowledge graph below, produce a sequential learning path.

Goal: {goal}
Known concepts: {known}
Struggling concepts (prioritize review): {struggling}

Available concepts and their prerequisites:
{listing}

Instructions:
1. List every prerequisite of a concept before the concept itself.
2. Place struggling concepts early; if their prerequisites are not met, list those first.
3. Leave out concepts the learner already knows.
4. Make the path progress logically towards the goal.
5. Only use concept names from the list above, spelled exactly.
6. Respond with a JSON object with a single key "path" holding an array of concept names.

Example: {{"path": ["Introduction to ML", "Supervised Learning", "Deep Learning Basics"]}}"#,
        known = join_or_none(&known),
        struggling = join_or_none(struggling),
    )
}

/// Prompt answering a free-form question.
pub fn chat_prompt(question: &str) -> String {
    format!(
        r#"If the question is unclear, ask for clarification.
Respond with a JSON object with a single key "answer" holding your reply as a string.

Question: {question}"#
    )
}

fn join_or_none<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<&str>>()
            .join(", ")
    }
}
