//! Concept graph data model.
//!
//! A [`ConceptGraph`] maps concept names to [`Concept`]s and remembers the
//! order in which concepts were inserted. That order drives goal resolution
//! (first match wins, first concept is the fallback), so it is part of the
//! graph's identity and survives serialization.

use petgraph::graph::{DiGraph, NodeIndex};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// URL assigned to resources that arrive without one.
pub const PLACEHOLDER_URL: &str = "https://example.com/placeholder_resource";

// ============================================================================
// Resource
// ============================================================================

/// A study resource attached to a concept.
///
/// Opaque to traversal. Fields other than `type`, `title`, and `url` are
/// kept in `extra` and written back out unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Resource kind ("video", "article", "book", ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Human-readable title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Link to the resource.
    pub url: String,
    /// Any other fields supplied with the resource.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource {
    /// Create a resource with kind, title, and URL.
    pub fn new(kind: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            title: Some(title.into()),
            url: url.into(),
            extra: Map::new(),
        }
    }

    /// Whether the URL is the placeholder assigned during normalization.
    pub fn has_placeholder_url(&self) -> bool {
        self.url == PLACEHOLDER_URL
    }
}

// ============================================================================
// Concept
// ============================================================================

/// A named unit of learnable material.
#[derive(Clone, Debug, PartialEq)]
pub struct Concept {
    /// Unique, case-sensitive display name.
    pub name: String,
    /// Names of concepts that must be learned first, in source order.
    pub prerequisites: Vec<String>,
    /// Study resources, passed through untouched.
    pub resources: Vec<Resource>,
}

impl Concept {
    /// Create a concept with no prerequisites or resources.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prerequisites: Vec::new(),
            resources: Vec::new(),
        }
    }

    /// Set the prerequisites.
    pub fn with_prerequisites<I, S>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prerequisites = prerequisites.into_iter().map(Into::into).collect();
        self
    }

    /// Append a resource.
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }
}

/// Body of a concept as it appears in the JSON object form.
#[derive(Serialize)]
struct ConceptBody<'a> {
    prerequisites: &'a [String],
    resources: &'a [Resource],
}

// ============================================================================
// ConceptGraph
// ============================================================================

/// Insertion-ordered mapping from concept name to [`Concept`].
///
/// Read-only once built; share it across requests behind an `Arc`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConceptGraph {
    concepts: Vec<Concept>,
    index: HashMap<String, usize>,
}

impl ConceptGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a concept.
    ///
    /// Re-inserting an existing name replaces the concept but keeps its
    /// original position. Returns the replaced concept, if any.
    pub fn insert(&mut self, concept: Concept) -> Option<Concept> {
        match self.index.get(&concept.name) {
            Some(&pos) => Some(std::mem::replace(&mut self.concepts[pos], concept)),
            None => {
                self.index.insert(concept.name.clone(), self.concepts.len());
                self.concepts.push(concept);
                None
            }
        }
    }

    /// Builder-style insert.
    pub fn with_concept(mut self, concept: Concept) -> Self {
        self.insert(concept);
        self
    }

    /// Look up a concept by exact name.
    pub fn get(&self, name: &str) -> Option<&Concept> {
        self.index.get(name).map(|&pos| &self.concepts[pos])
    }

    /// Whether a concept with this exact name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Prerequisites of a concept.
    ///
    /// Names missing from the graph have no prerequisites.
    pub fn prerequisites_of(&self, name: &str) -> &[String] {
        self.get(name)
            .map(|c| c.prerequisites.as_slice())
            .unwrap_or(&[])
    }

    /// The first concept in iteration order.
    pub fn first(&self) -> Option<&Concept> {
        self.concepts.first()
    }

    /// Iterate concepts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.iter()
    }

    /// Iterate concept names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.concepts.iter().map(|c| c.name.as_str())
    }

    /// Number of concepts.
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    /// Whether the graph has no concepts.
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Total number of prerequisite references, dangling ones included.
    pub fn edge_count(&self) -> usize {
        self.concepts.iter().map(|c| c.prerequisites.len()).sum()
    }

    /// Build a petgraph view with an edge `prerequisite -> concept` for every
    /// prerequisite that exists in the graph.
    pub(crate) fn to_digraph(&self) -> (DiGraph<&str, ()>, HashMap<&str, NodeIndex>) {
        let mut graph = DiGraph::new();
        let mut indices = HashMap::new();

        for name in self.names() {
            indices.insert(name, graph.add_node(name));
        }

        for concept in &self.concepts {
            let to = indices[concept.name.as_str()];
            for prereq in &concept.prerequisites {
                if let Some(&from) = indices.get(prereq.as_str()) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        (graph, indices)
    }
}

impl FromIterator<Concept> for ConceptGraph {
    fn from_iter<I: IntoIterator<Item = Concept>>(iter: I) -> Self {
        let mut graph = ConceptGraph::new();
        for concept in iter {
            graph.insert(concept);
        }
        graph
    }
}

impl Serialize for ConceptGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.concepts.len()))?;
        for concept in &self.concepts {
            map.serialize_entry(
                &concept.name,
                &ConceptBody {
                    prerequisites: &concept.prerequisites,
                    resources: &concept.resources,
                },
            )?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ConceptGraph {
    /// Accepts every shape [`normalize_raw`](crate::normalize_raw) accepts.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        crate::normalize::normalize_raw(raw).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> ConceptGraph {
        ConceptGraph::new()
            .with_concept(Concept::new("A"))
            .with_concept(Concept::new("B").with_prerequisites(["A"]))
            .with_concept(Concept::new("C").with_prerequisites(["A", "B", "Z"]))
    }

    #[test]
    fn test_insertion_order_preserved() {
        let graph = sample();
        let names: Vec<&str> = graph.names().collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(graph.first().unwrap().name, "A");
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut graph = sample();
        let old = graph.insert(Concept::new("A").with_prerequisites(["C"]));
        assert!(old.unwrap().prerequisites.is_empty());
        assert_eq!(graph.names().next(), Some("A"));
        assert_eq!(graph.prerequisites_of("A"), ["C".to_string()]);
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn test_missing_concept_has_no_prerequisites() {
        let graph = sample();
        assert!(graph.prerequisites_of("Z").is_empty());
        assert!(!graph.contains("Z"));
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn test_to_digraph_skips_dangling() {
        let graph = sample();
        let (digraph, indices) = graph.to_digraph();
        assert_eq!(digraph.node_count(), 3);
        assert_eq!(digraph.edge_count(), 3);
        assert!(indices.contains_key("C"));
        assert!(!indices.contains_key("Z"));
    }

    #[test]
    fn test_serialize_object_form_in_order() {
        let graph = ConceptGraph::new()
            .with_concept(Concept::new("Zeta"))
            .with_concept(
                Concept::new("Alpha")
                    .with_prerequisites(["Zeta"])
                    .with_resource(Resource::new("video", "Intro", "https://v.example")),
            );

        let json = serde_json::to_string(&graph).unwrap();
        assert!(json.find("Zeta").unwrap() < json.find("Alpha").unwrap());

        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["Alpha"]["prerequisites"][0], "Zeta");
        assert_eq!(value["Alpha"]["resources"][0]["type"], "video");
        assert_eq!(value["Zeta"]["resources"], serde_json::json!([]));
    }

    #[test]
    fn test_deserialize_preserves_order_and_extras() {
        let json = r#"{
            "Second": {"prerequisites": [], "resources": [
                {"type": "book", "title": "T", "url": "https://b.example", "author": "X"}
            ]},
            "First": {"prerequisites": ["Second"], "resources": []}
        }"#;
        let graph: ConceptGraph = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = graph.names().collect();
        assert_eq!(names, vec!["Second", "First"]);

        let resource = &graph.get("Second").unwrap().resources[0];
        assert_eq!(resource.extra["author"], "X");
        assert_eq!(resource.kind.as_deref(), Some("book"));
    }

    #[test]
    fn test_from_iterator() {
        let graph: ConceptGraph = vec![Concept::new("x"), Concept::new("y")]
            .into_iter()
            .collect();
        assert_eq!(graph.len(), 2);
        assert!(!graph.is_empty());
    }

    #[test]
    fn test_placeholder_detection() {
        let resource = Resource::new("video", "t", PLACEHOLDER_URL);
        assert!(resource.has_placeholder_url());
    }
}
