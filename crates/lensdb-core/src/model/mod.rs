//! The entity model: descriptors, the type catalog they are backed by, and
//! the alias table that redirects view types to projection descriptors.
//!
//! A `Model` is built through `&mut` methods during setup and shared by
//! reference afterwards. Only `add_alias` mutates through `&self`.

pub mod annotation;
mod descriptor;
mod key;
mod naming;
mod projection;

#[cfg(test)]
mod tests;

use crate::{
    Error,
    alias::{AliasOutcome, AliasTable},
    builder::{FieldSetter, InstanceBuilder},
    config::ModelConfig,
    contract::{ContractError, FieldContract, TypeCatalog, TypeDecl, ViewContract},
    convert::ConversionAdapter,
    error::ConfigurationError,
    path::TypePath,
    projection::Projection,
    synth::{ShapeHandle, TypeSynthesizer},
    traits::ViewKind,
    validate,
    value::TypeMismatchError,
};
use std::{collections::BTreeMap, sync::Arc};

// re-exports
pub use annotation::{AnnotationValue, Annotations};
pub use descriptor::{
    EntityDescriptor, EntityDescriptorBuilder, FieldDescriptor, Relationship, RelationshipKind,
};
pub use key::EntityKey;
pub use naming::NamingConvention;

///
/// Model
///

#[derive(Debug)]
pub struct Model {
    config: ModelConfig,
    catalog: TypeCatalog,
    entities: BTreeMap<EntityKey, EntityDescriptor>,
    aliases: AliasTable,
    shapes: BTreeMap<EntityKey, ShapeHandle>,
    synthesizer: Arc<TypeSynthesizer>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new(ModelConfig::default())
    }
}

impl Model {
    #[must_use]
    pub fn new(config: ModelConfig) -> Self {
        Self::with_synthesizer(config, Arc::new(TypeSynthesizer::new()))
    }

    /// Model sharing a synthesizer (and so its shape cache) with others.
    #[must_use]
    pub fn with_synthesizer(config: ModelConfig, synthesizer: Arc<TypeSynthesizer>) -> Self {
        Self {
            config,
            catalog: TypeCatalog::new(),
            entities: BTreeMap::new(),
            aliases: AliasTable::new(),
            shapes: BTreeMap::new(),
            synthesizer,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ModelConfig {
        &self.config
    }

    #[must_use]
    pub const fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    pub const fn catalog_mut(&mut self) -> &mut TypeCatalog {
        &mut self.catalog
    }

    #[must_use]
    pub const fn synthesizer(&self) -> &Arc<TypeSynthesizer> {
        &self.synthesizer
    }

    #[must_use]
    pub const fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    // declarations

    pub fn declare(&mut self, decl: TypeDecl) -> Result<(), Error> {
        self.catalog.declare(decl)?;

        Ok(())
    }

    pub fn declare_view<V: ViewKind + ?Sized>(&mut self) -> Result<TypePath, Error> {
        Ok(self.catalog.declare_view::<V>()?)
    }

    /// Contract of a declared view.
    pub fn contract(&self, view: &TypePath) -> Result<ViewContract, ContractError> {
        self.catalog.get_contract(view)
    }

    // entities

    /// Add a base entity. Its key must be new to the model.
    pub fn add_entity(&mut self, descriptor: EntityDescriptor) -> Result<EntityKey, Error> {
        let key = descriptor.key().clone();
        if self.entities.contains_key(&key) {
            return Err(ConfigurationError::DuplicateEntity(key).into());
        }

        let shape = entity_shape(&descriptor);
        self.shapes.insert(key.clone(), shape);
        self.entities.insert(key.clone(), descriptor);

        Ok(key)
    }

    #[must_use]
    pub fn entity(&self, key: &EntityKey) -> Option<&EntityDescriptor> {
        self.entities.get(key)
    }

    /// Every descriptor, ordered by key.
    pub fn entities(&self) -> impl Iterator<Item = &EntityDescriptor> {
        self.entities.values()
    }

    /// Descriptors sharing `name`; a base entity and its projections.
    pub fn entities_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a EntityDescriptor> {
        self.entities.values().filter(move |e| e.name() == name)
    }

    /// Shape instances of an entity are materialized with.
    #[must_use]
    pub fn shape_of(&self, key: &EntityKey) -> Option<&ShapeHandle> {
        self.shapes.get(key)
    }

    /// Resolve a type to the descriptor that backs it: alias bindings
    /// first, then descriptors keyed by the type itself.
    pub fn resolve(&self, ty: &TypePath) -> Result<&EntityDescriptor, ConfigurationError> {
        let key = self
            .aliases
            .resolve(ty)
            .unwrap_or_else(|| EntityKey::from(ty));

        self.entities
            .get(&key)
            .ok_or_else(|| ConfigurationError::UnresolvedType(ty.clone()))
    }

    /// Bind `alias` to the entity keyed `target`.
    pub fn add_alias(&self, target: &EntityKey, alias: TypePath) -> Result<AliasOutcome, Error> {
        if !self.entities.contains_key(target) {
            return Err(ConfigurationError::UnknownEntity(target.clone()).into());
        }

        Ok(self.aliases.bind(alias, target)?)
    }

    /// Physical storage name of a descriptor under this model's naming.
    #[must_use]
    pub fn physical_storage_name(&self, descriptor: &EntityDescriptor) -> String {
        descriptor.storage_name(self.config.naming)
    }

    // validation

    /// Run the structural validator over the whole model.
    pub fn validate(&self) -> Result<(), Error> {
        validate::validate_model(self.entities.values(), &self.aliases.bindings(), self.config.naming)
            .map_err(Error::Validation)
    }

    // instances

    #[must_use]
    pub fn instance_builder(&self) -> InstanceBuilder<'_> {
        InstanceBuilder::new(&self.synthesizer)
    }

    /// Build a standalone instance of a static view.
    pub fn create_instance<V: ViewKind + ?Sized>(
        &self,
        configure: impl FnOnce(&mut FieldSetter<'_>) -> Result<(), TypeMismatchError>,
    ) -> Result<Projection, Error> {
        let contract = self.static_contract::<V>()?;

        self.instance_builder().build(&contract, configure)
    }

    /// Build a standalone instance of a declared view.
    pub fn create_instance_of(
        &self,
        view: &TypePath,
        configure: impl FnOnce(&mut FieldSetter<'_>) -> Result<(), TypeMismatchError>,
    ) -> Result<Projection, Error> {
        let contract = self.catalog.get_contract(view)?;

        self.instance_builder().build(&contract, configure)
    }

    #[must_use]
    pub fn conversion_adapter(&self) -> ConversionAdapter<'_> {
        ConversionAdapter::new(&self.catalog, &self.synthesizer)
    }

    // Contract of a static view: the catalog's when declared, otherwise
    // one built from the view's own declaration.
    fn static_contract<V: ViewKind + ?Sized>(&self) -> Result<ViewContract, Error> {
        let path = V::path();
        if self.catalog.contains(&path) {
            return Ok(self.catalog.get_contract(&path)?);
        }

        let mut scratch = TypeCatalog::new();
        scratch.declare_view::<V>()?;

        Ok(scratch.get_contract(&path)?)
    }
}

// Shape of a base entity's rows: every storable field, in mapping order.
fn entity_shape(descriptor: &EntityDescriptor) -> ShapeHandle {
    let view_type = descriptor
        .backing_type()
        .cloned()
        .unwrap_or_else(|| TypePath::new(descriptor.name()));
    let fields = descriptor
        .fields()
        .iter()
        .filter(|f| f.value_type.is_storable())
        .map(|f| FieldContract::new(f.name.clone(), f.value_type.clone()))
        .collect();

    ShapeHandle::new(view_type.clone(), view_type, fields)
}
