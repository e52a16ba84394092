//! Decoding boundary for view types.
//!
//! A view type has no storage of its own, so decoding into one first
//! resolves the view to its synthesized shape. Encoding goes through the
//! generic `Serialize` impl on `Projection`; the adapter only reads.

use crate::{
    Error,
    contract::TypeCatalog,
    obs::sink::{self, ModelEvent},
    path::TypePath,
    projection::Projection,
    synth::{ShapeHandle, TypeSynthesizer},
    value::{TypeMismatchError, Value, json_label},
};
use serde::{
    Deserialize,
    de::{DeserializeSeed, Deserializer, Error as _},
};
use serde_json::Value as Json;
use thiserror::Error as ThisError;

///
/// ConversionError
///

#[derive(Debug, ThisError)]
pub enum ConversionError {
    #[error("malformed input: {0}")]
    Malformed(String),

    #[error("cannot decode '{view}' from a JSON {found}, expected an object")]
    NotARecord { view: TypePath, found: &'static str },
}

///
/// UnsupportedOperationError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{operation} is not supported for '{target}'")]
pub struct UnsupportedOperationError {
    pub operation: &'static str,
    pub target: String,
}

///
/// ConversionAdapter
///

#[derive(Clone, Copy, Debug)]
pub struct ConversionAdapter<'a> {
    catalog: &'a TypeCatalog,
    synthesizer: &'a TypeSynthesizer,
}

impl<'a> ConversionAdapter<'a> {
    #[must_use]
    pub const fn new(catalog: &'a TypeCatalog, synthesizer: &'a TypeSynthesizer) -> Self {
        Self {
            catalog,
            synthesizer,
        }
    }

    /// Whether this adapter decodes `ty`: true for view contracts only.
    #[must_use]
    pub fn can_handle(&self, ty: &TypePath) -> bool {
        self.catalog.is_view_contract(ty)
    }

    /// Shape values of `ty` are decoded into.
    pub fn resolve(&self, ty: &TypePath) -> Result<ShapeHandle, Error> {
        let contract = self.catalog.get_contract(ty)?;

        Ok(self.synthesizer.synthesize(&contract)?)
    }

    /// Decode a JSON document as an instance of view `ty`.
    pub fn read_json(&self, ty: &TypePath, json: &str) -> Result<Projection, Error> {
        let shape = self.resolve(ty)?;
        let json: Json =
            serde_json::from_str(json).map_err(|err| ConversionError::Malformed(err.to_string()))?;

        decode(&shape, &json)
    }

    /// Decode an already-parsed JSON value as an instance of view `ty`.
    pub fn read_value(&self, ty: &TypePath, json: &Json) -> Result<Projection, Error> {
        let shape = self.resolve(ty)?;

        decode(&shape, json)
    }

    /// Seed decoding any self-describing format into an instance of `ty`.
    pub fn seed(&self, ty: &TypePath) -> Result<ProjectionSeed, Error> {
        Ok(ProjectionSeed {
            shape: self.resolve(ty)?,
        })
    }

    /// Writing through a view is never supported.
    pub fn write(&self, ty: &TypePath, _projection: &Projection) -> Result<Json, Error> {
        Err(UnsupportedOperationError {
            operation: "writing a view",
            target: ty.to_string(),
        }
        .into())
    }
}

///
/// ProjectionSeed
///
/// `DeserializeSeed` producing a projection of a fixed shape.
///

#[derive(Clone, Debug)]
pub struct ProjectionSeed {
    shape: ShapeHandle,
}

impl ProjectionSeed {
    #[must_use]
    pub const fn new(shape: ShapeHandle) -> Self {
        Self { shape }
    }
}

impl<'de> DeserializeSeed<'de> for ProjectionSeed {
    type Value = Projection;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Projection, D::Error> {
        let json = Json::deserialize(deserializer)?;

        decode(&self.shape, &json).map_err(D::Error::custom)
    }
}

// Missing fields keep their zero value; unknown fields are skipped.
fn decode(shape: &ShapeHandle, json: &Json) -> Result<Projection, Error> {
    let view = shape.view_type();
    let Json::Object(record) = json else {
        return Err(ConversionError::NotARecord {
            view: view.clone(),
            found: json_label(json),
        }
        .into());
    };

    let mut instance = Projection::zeroed(shape.clone());
    for (slot, field) in shape.fields().iter().enumerate() {
        let Some(raw) = record.get(&field.name) else {
            continue;
        };
        let value = Value::from_json(&field.value_type, raw).ok_or_else(|| {
            TypeMismatchError::WrongType {
                owner: view.clone(),
                field: field.name.clone(),
                expected: field.value_type.clone(),
                found: json_label(raw).to_string(),
            }
        })?;
        if let Some(target) = instance.slot_mut(slot) {
            *target = value;
        }
    }

    sink::record(ModelEvent::InstanceDecoded {
        view: view.as_str(),
    });

    Ok(instance)
}


///
/// TESTS
///
