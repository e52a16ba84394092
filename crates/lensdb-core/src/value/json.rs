//! Generic structured-record encoding of values.
//!
//! Outbound values serialize untagged (a `Text` becomes a JSON string, an
//! `Int` a JSON number). Inbound decoding is driven by the declared
//! `ValueType`, since untagged JSON cannot tell `Int` from `Uint`.
//!
//! JSON has no NaN or infinity, so non-finite floats refuse to encode
//! rather than turning into a `null` that would not decode back.

use crate::value::{Value, ValueType};
use lensdb_primitives::ScalarKind;
use serde::{Serialize, Serializer};
use serde_json::Value as Json;
use ulid::Ulid;

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Blob(bytes) => bytes.serialize(serializer),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Float32(n) if !n.is_finite() => Err(non_finite(f64::from(*n))),
            Self::Float64(n) if !n.is_finite() => Err(non_finite(*n)),
            Self::Float32(n) => serializer.serialize_f32(*n),
            Self::Float64(n) => serializer.serialize_f64(*n),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Null => serializer.serialize_none(),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Uint(n) => serializer.serialize_u64(*n),
            Self::Ulid(id) => serializer.serialize_str(&id.to_string()),
        }
    }
}

fn non_finite<E: serde::ser::Error>(n: f64) -> E {
    E::custom(format!("cannot encode non-finite float {n}"))
}

impl Value {
    /// Decode one JSON value as the declared type.
    /// Returns `None` when the JSON shape does not fit.
    #[must_use]
    pub fn from_json(ty: &ValueType, json: &Json) -> Option<Self> {
        match (ty, json) {
            (ValueType::Optional(_), Json::Null) => Some(Self::Null),
            (ValueType::Scalar(kind) | ValueType::Optional(kind), json) => scalar_from_json(*kind, json),
            (ValueType::List(_) | ValueType::Named(_), _) => None,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn scalar_from_json(kind: ScalarKind, json: &Json) -> Option<Value> {
    match kind {
        ScalarKind::Blob => json
            .as_array()?
            .iter()
            .map(|byte| byte.as_u64().and_then(|b| u8::try_from(b).ok()))
            .collect::<Option<Vec<_>>>()
            .map(Value::Blob),
        ScalarKind::Bool => json.as_bool().map(Value::Bool),
        ScalarKind::Float32 => json.as_f64().map(|n| Value::Float32(n as f32)),
        ScalarKind::Float64 => json.as_f64().map(Value::Float64),
        ScalarKind::Int => json.as_i64().map(Value::Int),
        ScalarKind::Text => json.as_str().map(|s| Value::Text(s.to_string())),
        ScalarKind::Uint => json.as_u64().map(Value::Uint),
        ScalarKind::Ulid => json
            .as_str()
            .and_then(|s| Ulid::from_string(s).ok())
            .map(Value::Ulid),
    }
}

/// Label of a JSON value's kind, for mismatch diagnostics.
pub(crate) const fn json_label(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
