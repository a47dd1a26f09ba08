//! Format-agnostic feature properties
//!
//! Each decoded geometry carries a key/value mapping of whatever metadata
//! its source feature declared: a GeoJSON `properties` object, or the
//! name/description fields of an XML feature. Values use a closed variant
//! model rather than dynamic typing, and display attributes (title,
//! subtitle, stroke color) are derived with fixed key-priority rules.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A property value: the closed set of shapes arbitrary JSON/XML
/// attribute data can take
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    /// Absent/null value
    Null,
    /// Boolean
    Bool(bool),
    /// Any JSON number, widened to f64
    Number(f64),
    /// UTF-8 string
    String(String),
    /// Ordered list
    Array(Vec<PropValue>),
    /// Nested mapping
    Map(BTreeMap<String, PropValue>),
}

impl PropValue {
    /// Returns the string content if this value is a string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for PropValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(k, v)| (k, PropValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// An immutable mapping from property key to [`PropValue`]
///
/// Derived accessors implement the display heuristics shared by all three
/// decoders:
///
/// | Accessor | Keys, in priority order |
/// |----------|-------------------------|
/// | [`title`](Self::title) | `title`, `name` |
/// | [`subtitle`](Self::subtitle) | `subtitle`, `description`, `address` |
/// | [`color`](Self::color) | `color`, `colour` |
///
/// Missing keys simply yield `None`; the accessors never fail and never
/// mutate the mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties(BTreeMap<String, PropValue>);

impl Properties {
    /// An empty mapping
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a decoded GeoJSON `properties` object
    #[must_use]
    pub fn from_json_object(object: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(
            object
                .into_iter()
                .map(|(k, v)| (k, PropValue::from(v)))
                .collect(),
        )
    }

    /// Build from string pairs, skipping `None` values
    ///
    /// Convenience for the XML decoders, whose metadata fields are all
    /// optional strings.
    #[must_use]
    pub fn from_string_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Option<String>)>,
    {
        Self(
            pairs
                .into_iter()
                .filter_map(|(k, v)| v.map(|v| (k.to_string(), PropValue::String(v))))
                .collect(),
        )
    }

    /// Look up a raw value by key
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.0.get(key)
    }

    /// True if the mapping has no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of entries in the mapping
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Derived display title: `title`, then `name`
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.first_string(&["title", "name"])
    }

    /// Derived display subtitle: `subtitle`, then `description`, then `address`
    #[must_use]
    pub fn subtitle(&self) -> Option<&str> {
        self.first_string(&["subtitle", "description", "address"])
    }

    /// Derived stroke color: `color` or `colour`, interpreted as hex
    ///
    /// The raw value is normalized (see [`normalize_hex_color`]); values
    /// that do not look like hex color strings yield `None`.
    #[must_use]
    pub fn color(&self) -> Option<String> {
        self.first_string(&["color", "colour"])
            .and_then(normalize_hex_color)
    }

    fn first_string(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.0.get(*key)?.as_str())
    }
}

impl FromIterator<(String, PropValue)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, PropValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Normalize a hex color string into a grouping key
///
/// Trims whitespace, strips one leading `#`, lowercases, and accepts only
/// the usual hex digit counts (3, 4, 6 or 8). Anything else is not a color.
#[must_use]
pub fn normalize_hex_color(raw: &str) -> Option<String> {
    let hex = raw.trim().trim_start_matches('#');
    let valid_len = matches!(hex.len(), 3 | 4 | 6 | 8);
    if valid_len && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(hex.to_ascii_lowercase())
    } else {
        None
    }
}
