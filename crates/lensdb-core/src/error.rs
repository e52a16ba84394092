use crate::{
    alias::AliasConflictError,
    contract::ContractError,
    convert::{ConversionError, UnsupportedOperationError},
    model::EntityKey,
    path::TypePath,
    synth::SynthesisError,
    validate::ErrorTree,
    value::{TypeMismatchError, ValueType},
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Crate-level error. Every failure is raised synchronously at the call
/// site and is a configuration or programmer error; nothing here is
/// transient or worth retrying.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error(transparent)]
    AliasConflict(#[from] AliasConflictError),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error(transparent)]
    TypeMismatch(#[from] TypeMismatchError),

    #[error(transparent)]
    UnsupportedOperation(#[from] UnsupportedOperationError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("model validation failed:\n{0}")]
    Validation(ErrorTree),
}

impl Error {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Configuration(_) | Self::TypeMismatch(_) | Self::Validation(_) => {
                ErrorClass::InvariantViolation
            }
            Self::Contract(_) | Self::Synthesis(_) | Self::UnsupportedOperation(_) => {
                ErrorClass::Unsupported
            }
            Self::AliasConflict(_) => ErrorClass::Conflict,
            Self::Conversion(_) => ErrorClass::Corruption,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}: {self}", self.class())
    }
}

///
/// ConfigurationError
///
/// The model was set up inconsistently: a missing backing type, an
/// unknown entity, a contract that does not fit the entity it is
/// registered against, or unreadable configuration.
///

#[derive(Debug, ThisError)]
pub enum ConfigurationError {
    #[error(
        "cannot register projections for entity '{entity}' as it does not have a backing type"
    )]
    MissingBackingType { entity: String },

    #[error("unknown entity '{0}'")]
    UnknownEntity(EntityKey),

    #[error("entity '{0}' is already registered")]
    DuplicateEntity(EntityKey),

    #[error("the type '{view}' cannot be used as a view of entity '{entity}'")]
    NotAView {
        view: TypePath,
        entity: String,
        #[source]
        source: ContractError,
    },

    #[error("contract for '{view}' does not match its declaration in the catalog")]
    UndeclaredContract { view: TypePath },

    #[error("view '{view}' reads field '{field}' which entity '{entity}' does not have")]
    FieldNotOnEntity {
        view: TypePath,
        field: String,
        entity: String,
    },

    #[error(
        "view '{view}' reads field '{field}' as {found}, but entity '{entity}' stores {expected}"
    )]
    FieldTypeMismatch {
        view: TypePath,
        field: String,
        entity: String,
        expected: ValueType,
        found: ValueType,
    },

    #[error("type '{0}' is already declared with a different shape")]
    ConflictingDeclaration(TypePath),

    #[error("type '{0}' does not resolve to any entity")]
    UnresolvedType(TypePath),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

///
/// ErrorClass
/// Error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Corruption,
    Conflict,
    Unsupported,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Corruption => "corruption",
            Self::Conflict => "conflict",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}
