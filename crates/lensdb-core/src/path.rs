use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// TypePath
///
/// Stable identity of a declared type: its module path plus its name.
/// Views declared through `view!` use `module_path!()::Name`.
///

#[derive(
    Clone, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct TypePath(String);

impl TypePath {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last `::` segment of the path.
    #[must_use]
    pub fn ident(&self) -> &str {
        self.0.rsplit("::").next().unwrap_or(&self.0)
    }

    /// Path of the concrete type synthesized for this view.
    #[must_use]
    pub fn synthesized(&self) -> Self {
        Self(format!("{}::{SYNTHESIZED_IDENT}", self.0))
    }

    #[must_use]
    pub fn is_synthesized(&self) -> bool {
        self.ident() == SYNTHESIZED_IDENT
    }
}

/// Ident given to every synthesized concrete type.
pub const SYNTHESIZED_IDENT: &str = "__Projection";

impl From<&str> for TypePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for TypePath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

impl AsRef<str> for TypePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

///
/// TESTS
///
