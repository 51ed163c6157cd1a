//! Graph persistence.
//!
//! Graphs are stored as the JSON object form, one key per concept in graph
//! order. Loading accepts every shape the normalizer accepts, so files
//! written by hand or copied from a generator response load the same way.

use crate::normalize::normalize_raw;
use crate::types::ConceptGraph;
use learnpath_core::{Error, Result};
use serde_json::Value;
use std::path::Path;

/// Save a graph to a pretty-printed JSON file.
pub fn save_graph(graph: &ConceptGraph, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = to_json_pretty(graph)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }
    std::fs::write(path, json).map_err(|e| Error::io_with_path(e, path))?;

    log::debug!("saved {} concepts to {}", graph.len(), path.display());
    Ok(())
}

/// Load a graph from a JSON file.
pub fn load_graph(path: impl AsRef<Path>) -> Result<ConceptGraph> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::file_not_found(path));
    }
    let json = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;

    let graph = load_graph_from_str(&json)?;
    log::debug!("loaded {} concepts from {}", graph.len(), path.display());
    Ok(graph)
}

/// Load a graph from a JSON string.
pub fn load_graph_from_str(json: &str) -> Result<ConceptGraph> {
    let raw: Value = serde_json::from_str(json)?;
    normalize_raw(raw)
}

/// Render a graph as pretty-printed JSON.
pub fn to_json_pretty(graph: &ConceptGraph) -> Result<String> {
    Ok(serde_json::to_string_pretty(graph)?)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::defaults::default_graph;
    use crate::types::{Concept, Resource};
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_preserves_graph() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("graph.json");
        let graph = default_graph();

        save_graph(&graph, &path).unwrap();
        let loaded = load_graph(&path).unwrap();

        assert_eq!(loaded, graph);
        let names: Vec<&str> = loaded.names().collect();
        assert_eq!(names[0], "Introduction to ML");
        assert_eq!(names[7], "MLOps Fundamentals");
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("g.json");
        let graph = ConceptGraph::new().with_concept(Concept::new("Only"));

        save_graph(&graph, &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_graph(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_load_from_str_list_form() {
        let graph = load_graph_from_str(
            r#"[{"concept_name": "A"}, {"concept_name": "B", "prerequisites": ["A"]}]"#,
        )
        .unwrap();
        assert_eq!(graph.prerequisites_of("B"), ["A"]);
    }

    #[test]
    fn test_load_from_str_invalid_json() {
        let err = load_graph_from_str("{not json").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_load_from_str_bad_shape() {
        let err = load_graph_from_str(r#"{"A": {"prerequisites": 7}}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedRawStructure(_)));
    }

    #[test]
    fn test_pretty_output_keeps_resources() {
        let graph = ConceptGraph::new().with_concept(
            Concept::new("A").with_resource(Resource::new("video", "Intro", "https://v.example")),
        );
        let json = to_json_pretty(&graph).unwrap();
        assert!(json.contains("\"type\": \"video\""));
        assert!(json.contains('\n'));
    }
}
