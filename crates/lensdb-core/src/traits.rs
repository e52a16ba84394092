use crate::{
    contract::{MemberDecl, TypeCatalog, TypeDecl},
    error::ConfigurationError,
    path::TypePath,
    value::{Value, ValueType},
};
use lensdb_primitives::ScalarKind;
use ulid::Ulid;

///
/// FieldValue
///
/// Rust types that can sit in a projection slot.
/// `from_value` is the inverse of `to_value` for values of `value_type()`.
///

pub trait FieldValue: Sized {
    fn value_type() -> ValueType;

    fn to_value(&self) -> Value;

    fn from_value(value: &Value) -> Option<Self>;
}

impl FieldValue for String {
    fn value_type() -> ValueType {
        ValueType::Scalar(ScalarKind::Text)
    }

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_text().map(ToString::to_string)
    }
}

impl FieldValue for bool {
    fn value_type() -> ValueType {
        ValueType::Scalar(ScalarKind::Bool)
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FieldValue for Vec<u8> {
    fn value_type() -> ValueType {
        ValueType::Scalar(ScalarKind::Blob)
    }

    fn to_value(&self) -> Value {
        Value::Blob(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Blob(bytes) => Some(bytes.clone()),
            _ => None,
        }
    }
}

impl FieldValue for Ulid {
    fn value_type() -> ValueType {
        ValueType::Scalar(ScalarKind::Ulid)
    }

    fn to_value(&self) -> Value {
        Value::Ulid(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Ulid(id) => Some(*id),
            _ => None,
        }
    }
}

impl FieldValue for f32 {
    fn value_type() -> ValueType {
        ValueType::Scalar(ScalarKind::Float32)
    }

    fn to_value(&self) -> Value {
        Value::Float32(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float32(n) => Some(*n),
            _ => None,
        }
    }
}

impl FieldValue for f64 {
    fn value_type() -> ValueType {
        ValueType::Scalar(ScalarKind::Float64)
    }

    fn to_value(&self) -> Value {
        Value::Float64(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float64(n) => Some(*n),
            _ => None,
        }
    }
}

// Narrow integers widen into Int/Uint and narrow back with a range check.
macro_rules! impl_field_value_int {
    ($variant:ident, $kind:ident; $($t:ty),*) => {
        $(
            impl FieldValue for $t {
                fn value_type() -> ValueType {
                    ValueType::Scalar(ScalarKind::$kind)
                }

                fn to_value(&self) -> Value {
                    Value::from(*self)
                }

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(n) => <$t>::try_from(*n).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_field_value_int!(Int, Int; i8, i16, i32, i64);
impl_field_value_int!(Uint, Uint; u8, u16, u32, u64);

impl<T: FieldValue> FieldValue for Option<T> {
    fn value_type() -> ValueType {
        match T::value_type() {
            ValueType::Scalar(kind) => ValueType::Optional(kind),
            other => other,
        }
    }

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, FieldValue::to_value)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

///
/// ViewKind
///
/// Static view declaration, implemented by `view!` for the trait object
/// type of each declared view trait.
///

pub trait ViewKind {
    const PATH: &'static str;

    /// Read accessors declared directly on this view, in declaration order.
    fn members() -> Vec<MemberDecl>;

    /// Direct parent views.
    fn extends() -> Vec<TypePath>;

    /// Declare every parent view (and theirs) in `catalog`.
    fn declare_parents(catalog: &mut TypeCatalog) -> Result<(), ConfigurationError>;

    #[must_use]
    fn path() -> TypePath {
        TypePath::new(Self::PATH)
    }

    #[must_use]
    fn decl() -> TypeDecl {
        TypeDecl::capability(Self::path(), Self::members()).with_extends(Self::extends())
    }
}
