//! Typed layer content and its recursive HTML formatter.

use serde_json::{Map, Number, Value};
use std::fmt;

use crate::html::escape_html;
use crate::titles::prettify_key;

/// Separator between formatted list items.
pub const LIST_SEPARATOR: &str = ", ";

/// Non-container JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Content of a layer, converted from JSON with entry order preserved.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(String),
    Scalar(Scalar),
    List(Vec<Content>),
    Mapping(Vec<(String, Content)>),
}

impl From<&Value> for Content {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Content::Scalar(Scalar::Null),
            Value::Bool(b) => Content::Scalar(Scalar::Bool(*b)),
            Value::Number(n) => Content::Scalar(Scalar::Number(n.clone())),
            Value::String(s) => Content::Text(s.clone()),
            Value::Array(items) => Content::List(items.iter().map(Content::from).collect()),
            Value::Object(map) => Content::Mapping(
                map.iter()
                    .map(|(k, v)| (k.clone(), Content::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Content {
    /// Convert back to JSON, keeping entry order.
    pub fn to_value(&self) -> Value {
        match self {
            Content::Text(s) => Value::String(s.clone()),
            Content::Scalar(Scalar::Null) => Value::Null,
            Content::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
            Content::Scalar(Scalar::Number(n)) => Value::Number(n.clone()),
            Content::List(items) => Value::Array(items.iter().map(Content::to_value).collect()),
            Content::Mapping(entries) => {
                let map: Map<String, Value> = entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_value()))
                    .collect();
                Value::Object(map)
            }
        }
    }

    /// Compact single-line JSON text, unescaped.
    pub fn to_compact_json(&self) -> String {
        self.to_value().to_string()
    }

    /// Format as escaped HTML.
    ///
    /// - text is escaped as-is
    /// - lists are joined with `, `; mappings inside a list become compact JSON
    /// - mappings emit one `<strong>Label:</strong> value<br>` line per entry;
    ///   a mapping nested as an entry value becomes compact JSON
    /// - an empty mapping is `{}`, never the empty string
    /// - other scalars are stringified
    pub fn to_html(&self) -> String {
        match self {
            Content::Text(s) => escape_html(s),
            Content::Scalar(scalar) => escape_html(&scalar.to_string()),
            Content::List(items) => items
                .iter()
                .map(Content::to_inline_html)
                .collect::<Vec<_>>()
                .join(LIST_SEPARATOR),
            Content::Mapping(entries) if entries.is_empty() => "{}".to_string(),
            Content::Mapping(entries) => {
                let mut html = String::new();
                for (key, value) in entries {
                    html.push_str("<strong>");
                    html.push_str(&escape_html(&label_for(key)));
                    html.push_str(":</strong> ");
                    html.push_str(&value.to_inline_html());
                    html.push_str("<br>");
                }
                html
            }
        }
    }

    /// Formatting for values nested inside a list or a mapping entry.
    fn to_inline_html(&self) -> String {
        match self {
            Content::Mapping(_) => escape_html(&self.to_compact_json()),
            other => other.to_html(),
        }
    }
}

fn label_for(key: &str) -> String {
    let pretty = prettify_key(key);
    if pretty.is_empty() {
        key.to_string()
    } else {
        pretty
    }
}

/// Format any JSON value as escaped HTML. See [`Content::to_html`].
pub fn format_content(value: &Value) -> String {
    Content::from(value).to_html()
}
