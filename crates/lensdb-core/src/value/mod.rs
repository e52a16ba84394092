mod json;
mod ty;

#[cfg(test)]
mod tests;

use crate::path::TypePath;
use lensdb_primitives::ScalarKind;
use std::cmp::Ordering;
use thiserror::Error as ThisError;
use ulid::Ulid;

// re-exports
pub(crate) use json::json_label;
pub use ty::ValueType;

///
/// Value
///
/// Runtime value held by a row column or a projection slot.
///
/// Null → the slot of an `Optional` field holds nothing.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Blob(Vec<u8>),
    Bool(bool),
    Float32(f32),
    Float64(f64),
    Int(i64),
    Null,
    Text(String),
    Uint(u64),
    Ulid(Ulid),
}

impl Value {
    /// Scalar kind of this value, `None` for `Null`.
    #[must_use]
    pub const fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            Self::Blob(_) => Some(ScalarKind::Blob),
            Self::Bool(_) => Some(ScalarKind::Bool),
            Self::Float32(_) => Some(ScalarKind::Float32),
            Self::Float64(_) => Some(ScalarKind::Float64),
            Self::Int(_) => Some(ScalarKind::Int),
            Self::Null => None,
            Self::Text(_) => Some(ScalarKind::Text),
            Self::Uint(_) => Some(ScalarKind::Uint),
            Self::Ulid(_) => Some(ScalarKind::Ulid),
        }
    }

    /// Stable human-readable value kind label for diagnostics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self.scalar_kind() {
            Some(kind) => kind.label(),
            None => "Null",
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Order two values for predicate evaluation.
    ///
    /// Values of the same kind compare naturally and numeric kinds compare
    /// with each other by value. Kinds without an ordering (`Blob`), other
    /// mixed kinds, and `Null` against a value are unordered.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        if self.scalar_kind().is_some_and(|kind| !kind.supports_ordering()) {
            return None;
        }

        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Float32(a), Self::Float32(b)) => a.partial_cmp(b),
            (Self::Float64(a), Self::Float64(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Uint(a), Self::Uint(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Uint(b)) => Some(i128::from(*a).cmp(&i128::from(*b))),
            (Self::Uint(a), Self::Int(b)) => Some(i128::from(*a).cmp(&i128::from(*b))),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Ulid(a), Self::Ulid(b)) => Some(a.cmp(b)),
            (Self::Null, Self::Null) => Some(Ordering::Equal),
            (a, b) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        }
    }

    // Widened numeric value for mixed integer/float comparisons.
    #[allow(clippy::cast_precision_loss)]
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float32(n) => Some(f64::from(*n)),
            Self::Float64(n) => Some(*n),
            Self::Int(n) => Some(*n as f64),
            Self::Uint(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Equality for predicate evaluation; `None` when the two values cannot
    /// be compared at all.
    #[must_use]
    pub fn equals(&self, other: &Self) -> Option<bool> {
        match (self, other) {
            (Self::Blob(a), Self::Blob(b)) => Some(a == b),
            _ => self.compare(other).map(Ordering::is_eq),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Blob(bytes)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Self::Float32(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float64(n)
    }
}

impl From<Ulid> for Value {
    fn from(id: Ulid) -> Self {
        Self::Ulid(id)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

macro_rules! value_from_int {
    ($variant:ident, $wide:ty; $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Self::$variant(<$wide>::from(n))
                }
            }
        )*
    };
}

value_from_int!(Int, i64; i8, i16, i32, i64);
value_from_int!(Uint, u64; u8, u16, u32, u64);

///
/// TypeMismatchError
///
/// A value was offered for a field whose declared type does not accept it,
/// or for a field the target shape does not have.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum TypeMismatchError {
    #[error("field '{field}' of '{owner}' expects {expected}, got {found}")]
    WrongType {
        owner: TypePath,
        field: String,
        expected: ValueType,
        found: String,
    },

    #[error("'{owner}' has no field '{field}'")]
    UnknownField { owner: TypePath, field: String },
}
