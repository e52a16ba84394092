//! Projection registration: clone a base entity into a descriptor keyed by
//! a synthesized shape, then redirect the view and its ancestors to it.

use crate::{
    Error,
    config::ProjectionFields,
    contract::ViewContract,
    error::ConfigurationError,
    model::{
        EntityDescriptor, EntityKey, FieldDescriptor, Model, Relationship, RelationshipKind,
        annotation::{AnnotationValue, COLUMN_NAME, PROJECTION_OF, TABLE_NAME},
    },
    obs::sink::{self, ModelEvent},
    path::TypePath,
    synth::ShapeHandle,
    traits::ViewKind,
    validate,
};
use std::iter;

impl Model {
    /// Register `contract` as a read-only projection of the entity keyed
    /// `base`, and return the new descriptor.
    ///
    /// Registering the same view for the same base again returns the
    /// existing descriptor. Nothing is inserted when any step fails.
    pub fn register_projection(
        &mut self,
        base: &EntityKey,
        contract: &ViewContract,
    ) -> Result<EntityDescriptor, Error> {
        let base_entity = self
            .entities
            .get(base)
            .ok_or_else(|| ConfigurationError::UnknownEntity(base.clone()))?;
        let view = contract.view_type();

        if base_entity.backing_type().is_none() {
            return Err(ConfigurationError::MissingBackingType {
                entity: base_entity.name().to_string(),
            }
            .into());
        }

        self.check_contract(base_entity, contract)?;

        let key = EntityKey::projection(view, base);
        if let Some(existing) = self.entities.get(&key) {
            return Ok(existing.clone());
        }

        let shape = self.synthesizer.synthesize(contract)?;
        let descriptor = self.projection_descriptor(base_entity, contract, &shape, key.clone());

        if self.config.validate_on_register {
            let bindings = self.aliases.bindings();
            validate::validate_model(
                self.entities.values().chain(iter::once(&descriptor)),
                &bindings,
                self.config.naming,
            )
            .map_err(Error::Validation)?;
        }

        // Aliases are checked as a whole before anything is inserted.
        self.aliases
            .bind_all(contract.lineage().into_iter().cloned(), &key)?;

        sink::record(ModelEvent::ProjectionRegistered {
            view: view.as_str(),
            base: base.as_str(),
            fields: descriptor.fields().len(),
        });

        self.shapes.insert(key.clone(), shape);
        self.entities.insert(key, descriptor.clone());

        Ok(descriptor)
    }

    /// Declare a static view and register it over `base`.
    pub fn register_view<V: ViewKind + ?Sized>(
        &mut self,
        base: &EntityKey,
    ) -> Result<EntityDescriptor, Error> {
        let view = self.catalog.declare_view::<V>()?;
        let contract = self.contract_for(base, &view)?;

        self.register_projection(base, &contract)
    }

    /// Register every view the base entity's backing record declares it
    /// implements.
    pub fn register_projections(
        &mut self,
        base: &EntityKey,
    ) -> Result<Vec<EntityDescriptor>, Error> {
        let base_entity = self
            .entities
            .get(base)
            .ok_or_else(|| ConfigurationError::UnknownEntity(base.clone()))?;
        let Some(record) = base_entity.backing_type() else {
            return Err(ConfigurationError::MissingBackingType {
                entity: base_entity.name().to_string(),
            }
            .into());
        };

        let views = self.catalog.implemented_views(record);
        let mut registered = Vec::with_capacity(views.len());
        for view in views {
            let contract = self.contract_for(base, &view)?;
            registered.push(self.register_projection(base, &contract)?);
        }

        Ok(registered)
    }

    // Contract of `view` as a configuration error against `base`.
    fn contract_for(&self, base: &EntityKey, view: &TypePath) -> Result<ViewContract, Error> {
        self.catalog.get_contract(view).map_err(|source| {
            let entity = self
                .entities
                .get(base)
                .map_or_else(|| base.to_string(), |e| e.name().to_string());

            ConfigurationError::NotAView {
                view: view.clone(),
                entity,
                source,
            }
            .into()
        })
    }

    // The contract must be the catalog's own view of the type, and every
    // field it reads must be mapped on the base with the same type.
    fn check_contract(
        &self,
        base: &EntityDescriptor,
        contract: &ViewContract,
    ) -> Result<(), ConfigurationError> {
        let view = contract.view_type();
        let declared = self
            .catalog
            .get_contract(view)
            .map_err(|source| ConfigurationError::NotAView {
                view: view.clone(),
                entity: base.name().to_string(),
                source,
            })?;
        if declared != *contract {
            return Err(ConfigurationError::UndeclaredContract { view: view.clone() });
        }

        for field in contract.all_fields() {
            let Some(mapped) = base.field(&field.name) else {
                return Err(ConfigurationError::FieldNotOnEntity {
                    view: view.clone(),
                    field: field.name.clone(),
                    entity: base.name().to_string(),
                });
            };
            if mapped.value_type != field.value_type {
                return Err(ConfigurationError::FieldTypeMismatch {
                    view: view.clone(),
                    field: field.name.clone(),
                    entity: base.name().to_string(),
                    expected: mapped.value_type.clone(),
                    found: field.value_type.clone(),
                });
            }
        }

        Ok(())
    }

    // Clone the base into a descriptor that shares its name, storage and
    // key, and links back to it one-to-one.
    fn projection_descriptor(
        &self,
        base: &EntityDescriptor,
        contract: &ViewContract,
        shape: &ShapeHandle,
        key: EntityKey,
    ) -> EntityDescriptor {
        let naming = self.config.naming;

        let mut annotations = base.annotations().clone();
        annotations.set(TABLE_NAME, self.physical_storage_name(base));
        annotations.set(PROJECTION_OF, contract.view_type().as_str());

        let keep = |field: &FieldDescriptor| match self.config.projection_fields {
            ProjectionFields::AllBaseFields => true,
            ProjectionFields::ContractOnly => {
                contract.field(&field.name).is_some()
                    || base
                        .primary_key()
                        .is_some_and(|pk| pk.iter().any(|k| *k == field.name))
            }
        };

        let mut builder = EntityDescriptor::builder(base.name())
            .key(key)
            .backing_type(shape.type_path().clone())
            .annotations(annotations);

        for field in base.fields().iter().filter(|f| keep(f)) {
            let mut copy = field.clone();
            copy.annotations.set_if_absent(COLUMN_NAME, || {
                AnnotationValue::Text(naming.column_name(&field.name))
            });
            builder = builder.field_descriptor(copy);
        }

        if let Some(pk) = base.primary_key() {
            builder = builder.primary_key(pk.iter().cloned()).relationship(Relationship {
                kind: RelationshipKind::OneToOne,
                target: base.key().clone(),
                key_fields: pk.to_vec(),
                navigable: false,
            });
        }

        builder.build()
    }
}
