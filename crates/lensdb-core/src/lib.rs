//! Core runtime for lensdb: declared types and view contracts, shape
//! synthesis, the entity model with its alias table, projection instances,
//! the conversion adapter and a small in-memory host for queries.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod alias;
pub mod builder;
pub mod config;
pub mod contract;
pub mod convert;
pub mod db;
pub mod error;
pub mod model;
pub mod obs;
pub mod path;
pub mod projection;
pub mod synth;
pub mod traits;
pub mod validate;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

pub use error::Error;

///
/// CONSTANTS
///

/// Maximum number of fields a synthesized shape may carry.
pub const MAX_SHAPE_FIELDS: usize = 256;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, stores, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        contract::{FieldContract, MemberDecl, TypeDecl, ViewContract},
        model::{EntityDescriptor, EntityKey, FieldDescriptor, Model},
        path::TypePath,
        projection::Projection,
        traits::{FieldValue, ViewKind},
        value::{Value, ValueType},
    };
    pub use lensdb_primitives::ScalarKind;
}
