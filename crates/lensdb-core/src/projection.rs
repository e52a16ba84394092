use crate::{
    path::TypePath,
    synth::ShapeHandle,
    traits::FieldValue,
    value::Value,
};
use serde::{Serialize, Serializer, ser::SerializeMap};
use std::{any::Any, fmt, sync::Arc};

///
/// ProvenanceTag
///
/// Opaque marker the host attaches to a projection to track where it came
/// from. It lives outside the projection's fields and is never encoded.
///

#[derive(Clone)]
pub struct ProvenanceTag(Arc<dyn Any + Send + Sync>);

impl ProvenanceTag {
    #[must_use]
    pub fn new<T: Any + Send + Sync>(tag: T) -> Self {
        Self(Arc::new(tag))
    }

    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.0).downcast_ref::<T>()
    }
}

impl fmt::Debug for ProvenanceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProvenanceTag(..)")
    }
}

///
/// Projection
///
/// Concrete instance of a synthesized shape: one value per slot plus an
/// optional provenance tag. Field values are fixed once the projection
/// leaves its builder; only the tag may change afterwards.
///

#[derive(Clone, Debug)]
pub struct Projection {
    shape: ShapeHandle,
    values: Vec<Value>,
    tag: Option<ProvenanceTag>,
}

impl Projection {
    /// Projection with every slot at its type's zero value.
    pub(crate) fn zeroed(shape: ShapeHandle) -> Self {
        let values = shape
            .fields()
            .iter()
            .map(|field| field.value_type.zero_value().unwrap_or(Value::Null))
            .collect();

        Self {
            shape,
            values,
            tag: None,
        }
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.values.get_mut(index)
    }

    #[must_use]
    pub const fn shape(&self) -> &ShapeHandle {
        &self.shape
    }

    #[must_use]
    pub fn view_type(&self) -> &TypePath {
        self.shape.view_type()
    }

    /// Raw value of a field.
    #[must_use]
    pub fn value(&self, field: &str) -> Option<&Value> {
        self.shape.slot(field).and_then(|slot| self.values.get(slot))
    }

    /// Typed value of a field; `None` if absent or of another type.
    #[must_use]
    pub fn read<T: FieldValue>(&self, field: &str) -> Option<T> {
        self.value(field).and_then(T::from_value)
    }

    /// Typed value of a field, falling back to the zero value when the
    /// field is absent from this projection's shape.
    #[must_use]
    pub fn read_or_zero<T: FieldValue + Default>(&self, field: &str) -> T {
        self.read(field).unwrap_or_default()
    }

    /// `(field, value)` pairs in slot order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.shape
            .fields()
            .iter()
            .map(|field| field.name.as_str())
            .zip(self.values.iter())
    }

    #[must_use]
    pub const fn provenance(&self) -> Option<&ProvenanceTag> {
        self.tag.as_ref()
    }

    /// Downcast the provenance tag.
    #[must_use]
    pub fn provenance_as<T: Any>(&self) -> Option<&T> {
        self.tag.as_ref().and_then(ProvenanceTag::downcast_ref::<T>)
    }

    pub fn set_provenance(&mut self, tag: ProvenanceTag) {
        self.tag = Some(tag);
    }

    pub fn take_provenance(&mut self) -> Option<ProvenanceTag> {
        self.tag.take()
    }
}

// Tags do not take part in equality.
impl PartialEq for Projection {
    fn eq(&self, other: &Self) -> bool {
        self.shape.fingerprint() == other.shape.fingerprint() && self.values == other.values
    }
}

// Generic structured-record encoding: a map of field name to value.
impl Serialize for Projection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.values() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
