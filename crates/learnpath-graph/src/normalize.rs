//! Normalization of raw generator output into a [`ConceptGraph`].
//!
//! Accepted shapes:
//!
//! ```text
//! { "Name": { "prerequisites": [..], "resources": [..] }, .. }
//! [ { "Name": { .. } }, .. ]
//! [ { "concept_name": "Name", "prerequisites": [..], .. }, .. ]
//! ```
//!
//! Missing `prerequisites` / `resources` default to empty lists. Resources
//! whose URL is missing, null or empty receive [`PLACEHOLDER_URL`]. Array items that fit
//! neither item shape are skipped with a warning; any other malformed input
//! is [`Error::MalformedRawStructure`].

use crate::types::{Concept, ConceptGraph, PLACEHOLDER_URL, Resource};
use learnpath_core::{Error, Result};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Fields that carry the concept name in the list-of-objects form.
const NAME_FIELDS: &[&str] = &["concept_name", "name"];

/// Fields that belong to a concept body, never to a concept name.
const BODY_FIELDS: &[&str] = &["prerequisites", "resources"];

static JSON_FENCE: LazyLock<Result<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?[ \t]*\r?\n(.*)\r?\n[ \t]*```")
        .map_err(|e| Error::config(format!("invalid fence pattern: {e}")))
});

// ============================================================================
// Text → JSON
// ============================================================================

/// Strip a surrounding fenced code block, if any.
pub fn strip_code_fence(text: &str) -> &str {
    match JSON_FENCE.as_ref() {
        Ok(re) => re
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map_or(text, |m| m.as_str()),
        Err(_) => text,
    }
}

/// Parse model output text into JSON, unwrapping a ```json fence first.
///
/// # Errors
///
/// Returns [`Error::MalformedRawStructure`] when the text is not JSON.
pub fn parse_generator_output(text: &str) -> Result<Value> {
    let body = strip_code_fence(text).trim();
    serde_json::from_str(body).map_err(|e| Error::malformed(format!("output is not JSON: {e}")))
}

// ============================================================================
// JSON → ConceptGraph
// ============================================================================

/// Convert a raw structure into a [`ConceptGraph`].
///
/// Pure shape conversion: an empty object or array yields an empty graph.
///
/// # Errors
///
/// Returns [`Error::MalformedRawStructure`] for unsupported shapes.
pub fn normalize_raw(raw: Value) -> Result<ConceptGraph> {
    match raw {
        Value::Object(map) => {
            let mut graph = ConceptGraph::new();
            for (name, body) in map {
                graph.insert(concept_from_body(name, body)?);
            }
            Ok(graph)
        }
        Value::Array(items) => {
            let mut graph = ConceptGraph::new();
            for (idx, item) in items.into_iter().enumerate() {
                match concept_from_item(item)? {
                    Some(concept) => {
                        graph.insert(concept);
                    }
                    None => log::warn!("skipping graph item {idx}: no concept name"),
                }
            }
            Ok(graph)
        }
        other => Err(Error::malformed(format!(
            "expected an object or an array, got {}",
            kind_of(&other)
        ))),
    }
}

/// Convert one array item. `Ok(None)` means the item carried no name.
fn concept_from_item(item: Value) -> Result<Option<Concept>> {
    let Value::Object(mut map) = item else {
        return Ok(None);
    };

    for field in NAME_FIELDS {
        if let Some(Value::String(name)) = map.get(*field) {
            let name = name.clone();
            map.remove(*field);
            return concept_from_body(name, Value::Object(map)).map(Some);
        }
    }

    if map.len() == 1 {
        if let Some((name, body)) = map.into_iter().next() {
            if !BODY_FIELDS.contains(&name.as_str()) {
                return concept_from_body(name, body).map(Some);
            }
        }
    }

    Ok(None)
}

/// Build a concept from its `{prerequisites, resources}` body.
fn concept_from_body(name: String, body: Value) -> Result<Concept> {
    let Value::Object(mut body) = body else {
        return Err(Error::malformed(format!(
            "concept {name:?} must be an object, got {}",
            kind_of(&body)
        )));
    };

    let prerequisites = match body.remove("prerequisites") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(Error::malformed(format!(
                    "prerequisite of {name:?} must be a string, got {}",
                    kind_of(&other)
                ))),
            })
            .collect::<Result<Vec<_>>>()?,
        Some(other) => {
            return Err(Error::malformed(format!(
                "prerequisites of {name:?} must be an array, got {}",
                kind_of(&other)
            )));
        }
    };

    let resources = match body.remove("resources") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| resource_from_value(&name, item))
            .collect::<Result<Vec<_>>>()?,
        Some(other) => {
            return Err(Error::malformed(format!(
                "resources of {name:?} must be an array, got {}",
                kind_of(&other)
            )));
        }
    };

    if !body.is_empty() {
        log::debug!("concept {name:?}: ignoring {} extra field(s)", body.len());
    }

    Ok(Concept {
        name,
        prerequisites,
        resources,
    })
}

/// Parse a resource, filling in the placeholder URL when needed.
fn resource_from_value(concept: &str, value: Value) -> Result<Resource> {
    let Value::Object(mut map) = value else {
        return Err(Error::malformed(format!(
            "resource of {concept:?} must be an object, got {}",
            kind_of(&value)
        )));
    };

    if needs_placeholder(&map) {
        map.insert("url".to_string(), Value::String(PLACEHOLDER_URL.to_string()));
    }

    serde_json::from_value(Value::Object(map))
        .map_err(|e| Error::malformed(format!("resource of {concept:?}: {e}")))
}

fn needs_placeholder(map: &Map<String, Value>) -> bool {
    match map.get("url") {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Tests
// ============================================================================
