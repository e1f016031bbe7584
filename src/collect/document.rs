//! Document records and front-matter access
//!
//! A [`Document`] is the engine's input unit: a resolved date identity, the
//! raw body text, and optionally the structured front-matter the host already
//! parsed (YAML handed over as `serde_json::Value`). File enumeration and
//! metadata caching stay host-side.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One dated document handed to the extraction pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Resolved date identity (filename stem or explicit date field),
    /// parsed with the configured date format
    pub date_key: String,
    /// Raw body text, front-matter stripped
    pub body: String,
    /// Parsed front-matter, if the document carries any
    #[serde(default)]
    pub frontmatter: Option<Value>,
}

impl Document {
    /// Create a document without front-matter
    pub fn new(date_key: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            date_key: date_key.into(),
            body: body.into(),
            frontmatter: None,
        }
    }

    /// Builder: attach parsed front-matter
    pub fn frontmatter(mut self, value: Value) -> Self {
        self.frontmatter = Some(value);
        self
    }
}

/// Look up a front-matter key, trying the literal key first and then a
/// dot-separated nested path (`"nested.field"`)
pub fn deep_get<'a>(frontmatter: &'a Value, key: &str) -> Option<&'a Value> {
    if let Some(direct) = frontmatter.get(key) {
        return Some(direct);
    }
    let mut current = frontmatter;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

/// Extract the front-matter tag list
///
/// Accepts both a sequence of strings and a single comma-separated string;
/// leading `#` on entries is tolerated and stripped.
pub fn frontmatter_tags(frontmatter: &Value) -> Vec<String> {
    let Some(tags) = frontmatter.get("tags") else {
        return Vec::new();
    };

    let raw: Vec<String> = match tags {
        Value::Array(entries) => entries
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };

    raw.iter()
        .map(|t| t.trim().trim_start_matches('#').to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// The existence predicate for front-matter values
///
/// True for non-blank strings, non-empty arrays and mappings, any boolean
/// (including `false`) and any number (including `0`); false for absent
/// keys, `null`, blank strings and empty arrays.
pub fn value_exists(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::Bool(_)) | Some(Value::Number(_)) => true,
    }
}
