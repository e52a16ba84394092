//! Shape synthesis.
//!
//! A view has no storage of its own, so each view contract is turned into
//! a `Shape`: an ordered slot layout that projection instances carry. Shapes
//! are produced once per view type and shared through `ShapeHandle`.

mod fingerprint;


use crate::{
    MAX_SHAPE_FIELDS,
    contract::{FieldContract, ViewContract},
    obs::sink::{self, ModelEvent},
    path::TypePath,
    value::ValueType,
};
use std::{
    collections::{BTreeMap, HashMap, hash_map::Entry},
    fmt,
    sync::{Arc, Mutex, PoisonError},
};
use thiserror::Error as ThisError;

// re-exports
pub use fingerprint::ShapeFingerprint;

///
/// SynthesisError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SynthesisError {
    #[error("field '{field}' of '{view}' has type {value_type}, which cannot be stored")]
    UnsupportedValueType {
        view: TypePath,
        field: String,
        value_type: ValueType,
    },

    #[error("'{view}' inherits field '{field}' as both {first} and {second}")]
    ConflictingField {
        view: TypePath,
        field: String,
        first: ValueType,
        second: ValueType,
    },

    #[error("'{view}' was already synthesized from a different contract")]
    ShapeMismatch { view: TypePath },

    #[error("'{view}' has {count} fields, more than the {MAX_SHAPE_FIELDS} a shape can carry")]
    TooManyFields { view: TypePath, count: usize },
}

///
/// Shape
///
/// Slot layout satisfying one view contract: one slot per field,
/// own fields first, then inherited ones.
///

#[derive(Debug)]
pub struct Shape {
    view_type: TypePath,
    type_path: TypePath,
    fields: Vec<FieldContract>,
    fingerprint: ShapeFingerprint,
}

///
/// ShapeHandle
///
/// Cheap, shared reference to a synthesized shape. Two handles are equal
/// only if they point at the same shape.
///

#[derive(Clone)]
pub struct ShapeHandle(Arc<Shape>);

impl ShapeHandle {
    pub(crate) fn new(view_type: TypePath, type_path: TypePath, fields: Vec<FieldContract>) -> Self {
        let fingerprint = ShapeFingerprint::of(&view_type, &fields);

        Self(Arc::new(Shape {
            view_type,
            type_path,
            fields,
            fingerprint,
        }))
    }

    /// View (or base entity) type this shape satisfies.
    #[must_use]
    pub fn view_type(&self) -> &TypePath {
        &self.0.view_type
    }

    /// Path of the concrete type standing behind the view.
    #[must_use]
    pub fn type_path(&self) -> &TypePath {
        &self.0.type_path
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldContract] {
        &self.0.fields
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.fields.is_empty()
    }

    /// Slot index of a field.
    #[must_use]
    pub fn slot(&self, field: &str) -> Option<usize> {
        self.0.fields.iter().position(|f| f.name == field)
    }

    #[must_use]
    pub fn fingerprint(&self) -> ShapeFingerprint {
        self.0.fingerprint
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ShapeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ShapeHandle {}

impl fmt::Debug for ShapeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeHandle")
            .field("view_type", self.view_type())
            .field("fields", &self.len())
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

///
/// TypeSynthesizer
///
/// Produces and caches one shape per view type. The cache is checked and
/// filled under a single lock, so concurrent first use of a view yields
/// exactly one shape.
///

#[derive(Debug, Default)]
pub struct TypeSynthesizer {
    cache: Mutex<HashMap<TypePath, ShapeHandle>>,
}

impl TypeSynthesizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn synthesize(&self, contract: &ViewContract) -> Result<ShapeHandle, SynthesisError> {
        let view = contract.view_type();
        let fields = flatten(contract)?;

        let (handle, created) = {
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            match cache.entry(view.clone()) {
                Entry::Occupied(entry) => {
                    let handle = entry.get();
                    if handle.fingerprint() != ShapeFingerprint::of(view, &fields) {
                        return Err(SynthesisError::ShapeMismatch { view: view.clone() });
                    }

                    (handle.clone(), false)
                }
                Entry::Vacant(entry) => {
                    let handle = ShapeHandle::new(view.clone(), view.synthesized(), fields);

                    (entry.insert(handle).clone(), true)
                }
            }
        };

        // Recorded outside the cache lock; a sink may call back in.
        if created {
            sink::record(ModelEvent::ShapeSynthesized {
                view: view.as_str(),
                fields: handle.len(),
            });
        } else {
            sink::record(ModelEvent::ShapeCacheHit {
                view: view.as_str(),
            });
        }

        Ok(handle)
    }

    /// Cached shape for a view, if one was synthesized.
    #[must_use]
    pub fn get(&self, view: &TypePath) -> Option<ShapeHandle> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(view)
            .cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Collapse a contract and its ancestors into one ordered slot list,
// rejecting unstorable types and conflicting inherited declarations.
fn flatten(contract: &ViewContract) -> Result<Vec<FieldContract>, SynthesisError> {
    let view = contract.view_type();
    let mut seen: BTreeMap<&str, &ValueType> = BTreeMap::new();
    let mut fields = Vec::new();

    for field in contract.iter_fields() {
        if let Some(first) = seen.get(field.name.as_str()) {
            if **first != field.value_type {
                return Err(SynthesisError::ConflictingField {
                    view: view.clone(),
                    field: field.name.clone(),
                    first: (*first).clone(),
                    second: field.value_type.clone(),
                });
            }
            continue;
        }
        if !field.value_type.is_storable() {
            return Err(SynthesisError::UnsupportedValueType {
                view: view.clone(),
                field: field.name.clone(),
                value_type: field.value_type.clone(),
            });
        }

        seen.insert(&field.name, &field.value_type);
        fields.push(field.clone());
    }

    if fields.len() > MAX_SHAPE_FIELDS {
        return Err(SynthesisError::TooManyFields {
            view: view.clone(),
            count: fields.len(),
        });
    }

    Ok(fields)
}
