//! Payload shape detection.
//!
//! The analysis service has placed its layers in several spots over time.
//! Sources are tried in a fixed priority order and the first NON-EMPTY one
//! wins: an empty array or object is treated as absent, never as data.

use serde_json::{Map, Value};

/// Known flat analysis fields.
pub const FLAT_FIELDS: &[&str] = &[
    "linguistic_analysis",
    "hebrew_greek_analysis",
    "numeric_analysis",
    "gematria_analysis",
    "historical_analysis",
    "archaeological_context",
    "theological_analysis",
    "divine_concepts",
    "integrated_synthesis",
    "complete_conclusion",
];

/// Array locations, highest priority first.
const LAYER_ARRAY_PATHS: &[&[&str]] = &[
    &["analysis", "analysis_layers"],
    &["analysis", "layers"],
    &["layers"],
    &["analysis_layers"],
];

/// Synthesis mapping locations, highest priority first.
const SYNTHESIS_PATHS: &[&[&str]] = &[&["analysis", "synthesis"], &["synthesis"]];

/// Keys the pipeline wraps the synthesis mapping in.
const SYNTHESIS_WRAPPERS: &[&str] = &["integrated_synthesis", "synthesis"];

/// One discovered layer: identifier plus raw content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer<'a> {
    pub key: &'a str,
    pub content: &'a Value,
}

/// Where the layers of a response live.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape<'a> {
    /// Array of single-key layer entries.
    LayeredArray {
        path: &'static str,
        entries: &'a [Value],
    },
    /// Known field names directly on an object.
    FlatFields {
        path: &'static str,
        fields: Vec<Layer<'a>>,
    },
    /// Nothing recognisable.
    Unrecognized,
}

fn lookup<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(root, |node, segment| node.get(*segment))
}

fn non_empty_array(value: Option<&Value>) -> Option<&[Value]> {
    match value {
        Some(Value::Array(items)) if !items.is_empty() => Some(items.as_slice()),
        _ => None,
    }
}

fn non_empty_object(value: Option<&Value>) -> Option<&Map<String, Value>> {
    match value {
        Some(Value::Object(map)) if !map.is_empty() => Some(map),
        _ => None,
    }
}

/// Whether a flat field value carries data.
fn has_data(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Known flat fields of an object, in the object's own key order.
fn flat_fields(map: &Map<String, Value>) -> Vec<Layer<'_>> {
    map.iter()
        .filter(|(key, value)| FLAT_FIELDS.contains(&key.as_str()) && has_data(value))
        .map(|(key, content)| Layer {
            key: key.as_str(),
            content,
        })
        .collect()
}

fn path_label(path: &[&str]) -> &'static str {
    match path {
        ["analysis", "analysis_layers"] => "analysis.analysis_layers",
        ["analysis", "layers"] => "analysis.layers",
        ["layers"] => "layers",
        ["analysis_layers"] => "analysis_layers",
        _ => "unknown",
    }
}

impl<'a> ResponseShape<'a> {
    /// Classify a response. Never fails; unknown input is `Unrecognized`.
    pub fn detect(response: &'a Value) -> Self {
        for path in LAYER_ARRAY_PATHS {
            if let Some(entries) = non_empty_array(lookup(response, path)) {
                return ResponseShape::LayeredArray {
                    path: path_label(path),
                    entries,
                };
            }
        }

        if let Some(root) = response.as_object() {
            let fields = flat_fields(root);
            if !fields.is_empty() {
                return ResponseShape::FlatFields { path: "$", fields };
            }
        }

        if let Some(analysis) = non_empty_object(response.get("analysis")) {
            let fields = flat_fields(analysis);
            if !fields.is_empty() {
                return ResponseShape::FlatFields {
                    path: "analysis",
                    fields,
                };
            }
        }

        ResponseShape::Unrecognized
    }

    /// Layers in payload order.
    ///
    /// Array entries must be single-key objects. For multi-key entries only
    /// the first key is used and the rest are logged; non-object and empty
    /// entries are logged and skipped.
    pub fn layers(&self) -> Vec<Layer<'a>> {
        match self {
            ResponseShape::LayeredArray { path, entries } => {
                let entries: &'a [Value] = *entries;
                entries
                    .iter()
                    .enumerate()
                    .filter_map(|(index, entry)| layer_from_entry(path, index, entry))
                    .collect()
            }
            ResponseShape::FlatFields { fields, .. } => fields.clone(),
            ResponseShape::Unrecognized => Vec::new(),
        }
    }
}

fn layer_from_entry<'a>(path: &str, index: usize, entry: &'a Value) -> Option<Layer<'a>> {
    let Some(map) = entry.as_object() else {
        tracing::warn!(path, index, "Skipping layer entry that is not an object");
        return None;
    };

    let mut pairs = map.iter();
    let Some((key, content)) = pairs.next() else {
        tracing::warn!(path, index, "Skipping empty layer entry");
        return None;
    };

    let ignored: Vec<&str> = pairs.map(|(k, _)| k.as_str()).collect();
    if !ignored.is_empty() {
        tracing::warn!(
            path,
            index,
            layer = %key,
            ignored = ?ignored,
            "Layer entry has more than one key, using the first"
        );
    }

    Some(Layer {
        key: key.as_str(),
        content,
    })
}

/// Find the synthesis mapping, if any.
///
/// A known single-key wrapper around another non-empty mapping (the
/// pipeline's `{"integrated_synthesis": {...}}`) is unwrapped. Any other
/// single key is an ordinary labeled entry.
pub fn find_synthesis(response: &Value) -> Option<&Map<String, Value>> {
    let synthesis = SYNTHESIS_PATHS
        .iter()
        .find_map(|path| non_empty_object(lookup(response, path)))?;

    if let Some((key, value)) = synthesis.iter().next() {
        if synthesis.len() == 1 && SYNTHESIS_WRAPPERS.contains(&key.as_str()) {
            if let Some(inner) = non_empty_object(Some(value)) {
                return Some(inner);
            }
        }
    }
    Some(synthesis)
}
