use crate::{
    Error,
    convert::UnsupportedOperationError,
    path::TypePath,
    projection::Projection,
    synth::ShapeHandle,
    value::{TypeMismatchError, Value},
};
use std::cmp::Ordering;

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CompareOp {
    /// Whether the operator needs an ordering rather than plain equality.
    #[must_use]
    pub const fn is_ordering(self) -> bool {
        matches!(self, Self::Lt | Self::Lte | Self::Gt | Self::Gte)
    }

    const fn accepts(self, ord: Ordering) -> bool {
        match self {
            Self::Eq => ord.is_eq(),
            Self::Ne => ord.is_ne(),
            Self::Lt => ord.is_lt(),
            Self::Lte => ord.is_le(),
            Self::Gt => ord.is_gt(),
            Self::Gte => ord.is_ge(),
        }
    }
}

///
/// ComparePredicate
///
/// `field <op> value` over a materialized projection. Values that cannot
/// be compared never match; `check` rejects such predicates up front.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ComparePredicate {
    pub field: String,
    pub op: CompareOp,
    pub value: Value,
}

impl ComparePredicate {
    #[must_use]
    pub fn new(field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Check the predicate against the shape it will run over.
    ///
    /// The field must exist, the operand must belong to the field's scalar
    /// family (`Null` only for optional fields), and ordering operators need
    /// a kind that supports ordering.
    pub(crate) fn check(&self, owner: &TypePath, shape: &ShapeHandle) -> Result<(), Error> {
        let Some(field) = shape.slot(&self.field).map(|slot| &shape.fields()[slot]) else {
            return Err(TypeMismatchError::UnknownField {
                owner: owner.clone(),
                field: self.field.clone(),
            }
            .into());
        };
        let Some(kind) = field.value_type.scalar() else {
            return Ok(());
        };

        let operand_fits = match self.value.scalar_kind() {
            None => field.value_type.is_optional(),
            Some(found) => found.family() == kind.family(),
        };
        if !operand_fits {
            return Err(TypeMismatchError::WrongType {
                owner: owner.clone(),
                field: self.field.clone(),
                expected: field.value_type.clone(),
                found: self.value.label().to_string(),
            }
            .into());
        }

        if self.op.is_ordering() && !kind.supports_ordering() {
            return Err(UnsupportedOperationError {
                operation: "ordered comparison",
                target: format!("{owner}.{}", self.field),
            }
            .into());
        }

        Ok(())
    }

    #[must_use]
    pub fn matches(&self, instance: &Projection) -> bool {
        let Some(found) = instance.value(&self.field) else {
            return false;
        };

        match self.op {
            CompareOp::Eq => found.equals(&self.value) == Some(true),
            CompareOp::Ne => found.equals(&self.value) == Some(false),
            op => found.compare(&self.value).is_some_and(|ord| op.accepts(ord)),
        }
    }
}
