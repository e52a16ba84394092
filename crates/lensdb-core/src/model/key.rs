use crate::path::TypePath;
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// EntityKey
///
/// Lookup key of a descriptor inside the model. Base entities are keyed by
/// their backing type (or their name when they have none); projections are
/// keyed by view and base together, so several descriptors may share a
/// name without sharing a key.
///

#[derive(Clone, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct EntityKey(String);

impl EntityKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key of a projection of `view` over the entity keyed `base`.
    #[must_use]
    pub fn projection(view: &TypePath, base: &Self) -> Self {
        Self(format!("projection<{view}>@{base}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&TypePath> for EntityKey {
    fn from(path: &TypePath) -> Self {
        Self(path.as_str().to_string())
    }
}

impl From<&str> for EntityKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl AsRef<str> for EntityKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
