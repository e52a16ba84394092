use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// Physical storage (table) name of an entity.
pub const TABLE_NAME: &str = "relational:table_name";

/// Physical column name of a field.
pub const COLUMN_NAME: &str = "relational:column_name";

/// Set on projection descriptors; holds the view type they satisfy.
pub const PROJECTION_OF: &str = "lensdb:projection_of";

///
/// AnnotationValue
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl AnnotationValue {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for AnnotationValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for AnnotationValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for AnnotationValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for AnnotationValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

///
/// Annotations
///
/// Free-form name → value metadata attached to descriptors and fields.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Annotations(BTreeMap<String, AnnotationValue>);

impl Annotations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AnnotationValue> {
        self.0.get(name)
    }

    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AnnotationValue::as_text)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Insert or overwrite.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AnnotationValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Insert only when `name` is not already present.
    pub fn set_if_absent(&mut self, name: &str, value: impl FnOnce() -> AnnotationValue) {
        if !self.0.contains_key(name) {
            self.0.insert(name.to_string(), value());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnnotationValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
