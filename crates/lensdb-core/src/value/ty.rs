use crate::{path::TypePath, value::Value};
use lensdb_primitives::ScalarKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

///
/// ValueType
///
/// Declared type of a field or accessor.
///
/// Only `Scalar` and `Optional` are storable; `List` and `Named` can be
/// declared on records and capabilities but no shape can hold them.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ValueType {
    Scalar(ScalarKind),
    Optional(ScalarKind),
    List(Box<Self>),
    Named(TypePath),
}

impl ValueType {
    /// Whether a synthesized shape can hold a slot of this type.
    #[must_use]
    pub const fn is_storable(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::Optional(_))
    }

    #[must_use]
    pub const fn scalar(&self) -> Option<ScalarKind> {
        match self {
            Self::Scalar(kind) | Self::Optional(kind) => Some(*kind),
            Self::List(_) | Self::Named(_) => None,
        }
    }

    #[must_use]
    pub const fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Zero value a fresh slot of this type starts with.
    /// `None` for non-storable types.
    #[must_use]
    pub fn zero_value(&self) -> Option<Value> {
        match self {
            Self::Scalar(kind) => Some(scalar_zero(*kind)),
            Self::Optional(_) => Some(Value::Null),
            Self::List(_) | Self::Named(_) => None,
        }
    }

    /// Whether `value` may be stored in a slot of this type.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value.scalar_kind()) {
            (Self::Optional(_), None) => true,
            (Self::Scalar(kind) | Self::Optional(kind), Some(found)) => *kind == found,
            _ => false,
        }
    }
}

fn scalar_zero(kind: ScalarKind) -> Value {
    match kind {
        ScalarKind::Blob => Value::Blob(Vec::new()),
        ScalarKind::Bool => Value::Bool(false),
        ScalarKind::Float32 => Value::Float32(0.0),
        ScalarKind::Float64 => Value::Float64(0.0),
        ScalarKind::Int => Value::Int(0),
        ScalarKind::Text => Value::Text(String::new()),
        ScalarKind::Uint => Value::Uint(0),
        ScalarKind::Ulid => Value::Ulid(Ulid::nil()),
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::Optional(kind) => write!(f, "Option<{kind}>"),
            Self::List(item) => write!(f, "List<{item}>"),
            Self::Named(path) => write!(f, "{path}"),
        }
    }
}

impl From<ScalarKind> for ValueType {
    fn from(kind: ScalarKind) -> Self {
        Self::Scalar(kind)
    }
}
