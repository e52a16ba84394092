//! The storage engine's supported primitive set.
//!
//! Every field a synthesized projection can hold is one of these scalar
//! kinds (optionally nullable). Anything else is declarable in the type
//! catalog but rejected at synthesis time.

#[macro_use]
mod macros;

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

///
/// ScalarKind
///
/// Canonical scalar kind shared by the catalog, the synthesizer and the
/// value layer.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[remain::sorted]
pub enum ScalarKind {
    Blob,
    Bool,
    Float32,
    Float64,
    Int,
    Text,
    Uint,
    Ulid,
}

impl ScalarKind {
    /// Return the full metadata descriptor for one scalar kind.
    #[must_use]
    pub const fn metadata(self) -> ScalarMetadata {
        scalar_kind_registry!(metadata_from_registry, self)
    }

    /// Stable human-readable label for diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        scalar_kind_registry!(label_from_registry, self)
    }

    /// Kinds in one family can be compared with each other.
    #[must_use]
    pub const fn family(self) -> ScalarFamily {
        self.metadata().family
    }

    /// Whether `<`/`>` style comparisons are meaningful for this kind.
    #[must_use]
    pub const fn supports_ordering(self) -> bool {
        self.metadata().supports_ordering
    }

    /// Whether this scalar may participate in a primary key.
    #[must_use]
    pub const fn is_keyable(self) -> bool {
        self.metadata().is_keyable
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ScalarKind {
    type Err = UnknownScalarKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_SCALAR_KINDS
            .into_iter()
            .find(|kind| kind.label() == s)
            .ok_or_else(|| UnknownScalarKind(s.to_string()))
    }
}

///
/// UnknownScalarKind
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownScalarKind(pub String);

impl fmt::Display for UnknownScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown scalar kind '{}'", self.0)
    }
}

impl std::error::Error for UnknownScalarKind {}

///
/// ScalarMetadata
///
/// Capability metadata shared across the catalog and core layers.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScalarMetadata {
    pub family: ScalarFamily,
    pub supports_ordering: bool,
    pub is_keyable: bool,
}

///
/// ScalarFamily
///
/// Coarse routing family used by predicate comparison and decoding.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ScalarFamily {
    Blob,
    Bool,
    Identifier,
    Numeric,
    Textual,
}

/// Ordered list of all scalar kinds in registry order.
pub const ALL_SCALAR_KINDS: [ScalarKind; 8] = scalar_kind_registry!(all_kinds_from_registry);

///
/// TESTS
///
