//! Standalone construction of projection instances, outside any query.

use crate::{
    Error,
    contract::ViewContract,
    obs::sink::{self, ModelEvent},
    projection::Projection,
    synth::TypeSynthesizer,
    value::Value,
};

// re-exports
pub use crate::value::TypeMismatchError;

///
/// InstanceBuilder
///
/// Builds projections from a contract and a sequence of field
/// assignments. Only touches the synthesizer's shape cache.
///

#[derive(Clone, Copy, Debug)]
pub struct InstanceBuilder<'a> {
    synthesizer: &'a TypeSynthesizer,
}

impl<'a> InstanceBuilder<'a> {
    #[must_use]
    pub const fn new(synthesizer: &'a TypeSynthesizer) -> Self {
        Self { synthesizer }
    }

    /// Build one instance. Fields `configure` leaves unset keep the zero
    /// value of their type.
    pub fn build(
        &self,
        contract: &ViewContract,
        configure: impl FnOnce(&mut FieldSetter<'_>) -> Result<(), TypeMismatchError>,
    ) -> Result<Projection, Error> {
        let shape = self.synthesizer.synthesize(contract)?;
        let mut instance = Projection::zeroed(shape);

        configure(&mut FieldSetter {
            instance: &mut instance,
        })?;

        sink::record(ModelEvent::InstanceBuilt {
            view: contract.view_type().as_str(),
        });

        Ok(instance)
    }
}

///
/// FieldSetter
///
/// Type-checked write access to an instance under construction.
///

#[derive(Debug)]
pub struct FieldSetter<'p> {
    instance: &'p mut Projection,
}

impl<'p> FieldSetter<'p> {
    /// Assign `value` to `field`; later assignments to the same field win.
    pub fn set(
        &mut self,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Self, TypeMismatchError> {
        let value = value.into();
        let shape = self.instance.shape().clone();

        let Some(slot) = shape.slot(field) else {
            return Err(TypeMismatchError::UnknownField {
                owner: shape.view_type().clone(),
                field: field.to_string(),
            });
        };
        let expected = &shape.fields()[slot].value_type;
        if !expected.accepts(&value) {
            return Err(TypeMismatchError::WrongType {
                owner: shape.view_type().clone(),
                field: field.to_string(),
                expected: expected.clone(),
                found: value.label().to_string(),
            });
        }

        if let Some(target) = self.instance.slot_mut(slot) {
            *target = value;
        }

        Ok(self)
    }

    /// Setter bound to one field.
    pub fn field<'s>(&'s mut self, name: &'s str) -> FieldSlot<'s, 'p> {
        FieldSlot { setter: self, name }
    }
}

///
/// FieldSlot
///

#[derive(Debug)]
pub struct FieldSlot<'s, 'p> {
    setter: &'s mut FieldSetter<'p>,
    name: &'s str,
}

impl FieldSlot<'_, '_> {
    pub fn set(self, value: impl Into<Value>) -> Result<(), TypeMismatchError> {
        self.setter.set(self.name, value).map(|_| ())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{obs, test_support::*};

    fn city_contract() -> ViewContract {
        city_catalog().get_contract(&path(CITY_VIEW)).unwrap()
    }

    #[test]
    fn assigned_fields_are_read_back() {
        let synth = TypeSynthesizer::new();
        let city = InstanceBuilder::new(&synth)
            .build(&city_contract(), |s| {
                s.set("name", "Seattle")?
                    .set("state", "WA")?
                    .set("population", 724_745)?;
                Ok(())
            })
            .unwrap();

        assert_eq!(city.read::<String>("name").as_deref(), Some("Seattle"));
        assert_eq!(city.read::<String>("state").as_deref(), Some("WA"));
        assert_eq!(city.read::<i64>("population"), Some(724_745));
        assert!(city.provenance().is_none());
    }

    #[test]
    fn unset_fields_keep_zero_values() {
        let synth = TypeSynthesizer::new();
        let city = InstanceBuilder::new(&synth)
            .build(&city_contract(), |s| s.field("name").set("Tacoma"))
            .unwrap();

        assert_eq!(city.value("state"), Some(&Value::Text(String::new())));
        assert_eq!(city.value("population"), Some(&Value::Int(0)));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let synth = TypeSynthesizer::new();
        let err = InstanceBuilder::new(&synth)
            .build(&city_contract(), |s| s.field("population").set("many"))
            .unwrap_err();

        assert!(matches!(
            err,
            Error::TypeMismatch(TypeMismatchError::WrongType { ref field, .. }) if field == "population"
        ));
    }

    #[test]
    fn undeclared_field_is_rejected() {
        let synth = TypeSynthesizer::new();
        let err = InstanceBuilder::new(&synth)
            .build(&city_contract(), |s| s.field("time_zone").set(-8))
            .unwrap_err();

        assert!(matches!(
            err,
            Error::TypeMismatch(TypeMismatchError::UnknownField { .. })
        ));
    }

    #[test]
    fn building_is_counted_per_view() {
        obs::event_reset_all();
        let synth = TypeSynthesizer::new();
        let builder = InstanceBuilder::new(&synth);

        for _ in 0..3 {
            builder.build(&city_contract(), |_| Ok(())).unwrap();
        }

        let report = obs::event_report();
        assert_eq!(report.ops.instances_built, 3);
        assert_eq!(report.ops.shapes_synthesized, 1);
        assert_eq!(report.view(CITY_VIEW).unwrap().cache_hits, 2);
    }
}
