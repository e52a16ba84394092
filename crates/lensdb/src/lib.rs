//! ## Crate layout
//! - `core`: values, contracts, synthesis, the model and its alias table,
//!   the instance builder, the conversion adapter and the in-memory host.
//! - `primitives`: the scalar kinds a projection slot can hold.
//!
//! Views are declared with [`view!`]; the `prelude` carries the vocabulary
//! application code needs to register and read them.

pub use lensdb_core as core;
pub use lensdb_primitives as primitives;

mod macros;

/// re-exports
///
/// `view!` expands against these paths so callers only depend on `lensdb`.
pub mod __reexports {
    pub use lensdb_core::{
        contract::{MemberDecl, TypeCatalog},
        error::ConfigurationError,
        path::TypePath,
        projection::Projection,
        traits::{FieldValue, ViewKind},
    };
}

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use crate::core::Error;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        core::{
            Error,
            builder::FieldSetter,
            config::{ModelConfig, ProjectionFields},
            db::{CompareOp, LoadOrigin, MemoryStore, Row, Session},
            prelude::*,
        },
        view,
    };
}
