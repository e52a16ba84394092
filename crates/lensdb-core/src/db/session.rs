use crate::{
    Error,
    convert::UnsupportedOperationError,
    db::{CompareOp, ComparePredicate, LoadOrigin, MemoryStore, Row},
    error::ConfigurationError,
    model::{EntityDescriptor, Model},
    obs::sink::{self, ModelEvent},
    path::TypePath,
    projection::{Projection, ProvenanceTag},
    synth::ShapeHandle,
    value::{TypeMismatchError, Value},
};
use std::collections::BTreeMap;

///
/// Session
///
/// Reads and writes against a store, resolving every type through the
/// model. Queries rooted at a view type run against its projection.
///

#[derive(Clone, Copy, Debug)]
pub struct Session<'a> {
    model: &'a Model,
    store: &'a MemoryStore,
}

impl<'a> Session<'a> {
    #[must_use]
    pub const fn new(model: &'a Model, store: &'a MemoryStore) -> Self {
        Self { model, store }
    }

    /// Insert a row for entity type `ty`. Projections are read-only.
    pub fn insert(&self, ty: &TypePath, row: Row) -> Result<(), Error> {
        let descriptor = self.model.resolve(ty)?;
        if descriptor.is_projection() {
            return Err(UnsupportedOperationError {
                operation: "inserting through a view",
                target: ty.to_string(),
            }
            .into());
        }

        let columns = self.to_columns(descriptor, row)?;
        self.store
            .push(self.model.physical_storage_name(descriptor), columns);

        Ok(())
    }

    /// Start a load rooted at `ty`.
    #[must_use]
    pub fn load(&self, ty: impl Into<TypePath>) -> LoadQuery<'a> {
        LoadQuery {
            session: *self,
            root: ty.into(),
            predicates: Vec::new(),
            limit: None,
        }
    }

    // Map a row's fields to columns, type-checking each value.
    fn to_columns(
        &self,
        descriptor: &EntityDescriptor,
        row: Row,
    ) -> Result<BTreeMap<String, Value>, TypeMismatchError> {
        let owner = descriptor
            .backing_type()
            .cloned()
            .unwrap_or_else(|| TypePath::new(descriptor.name()));
        let naming = self.model.config().naming;

        let mut columns = BTreeMap::new();
        for (name, value) in row.0 {
            let Some(field) = descriptor.field(&name) else {
                return Err(TypeMismatchError::UnknownField { owner, field: name });
            };
            if !field.value_type.accepts(&value) {
                return Err(TypeMismatchError::WrongType {
                    owner,
                    field: name,
                    expected: field.value_type.clone(),
                    found: value.label().to_string(),
                });
            }
            columns.insert(field.column_name(naming), value);
        }

        Ok(columns)
    }
}

///
/// LoadQuery
///
/// Session-bound load. Predicates are ANDed and name fields of the
/// query root as seen through its shape.
///

#[derive(Debug)]
pub struct LoadQuery<'a> {
    session: Session<'a>,
    root: TypePath,
    predicates: Vec<ComparePredicate>,
    limit: Option<usize>,
}

impl LoadQuery<'_> {
    #[must_use]
    pub fn filter(mut self, field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        self.predicates.push(ComparePredicate::new(field, op, value));
        self
    }

    /// Bound the number of returned rows.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn execute(&self) -> Result<Vec<Projection>, Error> {
        let model = self.session.model;
        let descriptor = model.resolve(&self.root)?;
        let shape = model
            .shape_of(descriptor.key())
            .ok_or_else(|| ConfigurationError::UnknownEntity(descriptor.key().clone()))?;

        for predicate in &self.predicates {
            predicate.check(&self.root, shape)?;
        }

        let table = model.physical_storage_name(descriptor);
        let columns = column_map(model, descriptor, shape);

        let mut out = Vec::new();
        for (position, row) in self.session.store.scan(&table).into_iter().enumerate() {
            if self.limit.is_some_and(|limit| out.len() >= limit) {
                break;
            }

            let mut instance = materialize(shape, &columns, row);
            if !self.predicates.iter().all(|p| p.matches(&instance)) {
                continue;
            }
            instance.set_provenance(ProvenanceTag::new(LoadOrigin {
                entity: descriptor.key().clone(),
                table: table.clone(),
                position,
            }));
            out.push(instance);
        }

        sink::record(ModelEvent::InstancesLoaded {
            view: shape.view_type().as_str(),
            rows: u64::try_from(out.len()).unwrap_or(u64::MAX),
        });

        Ok(out)
    }
}

// Column name of each shape slot, in slot order.
fn column_map(model: &Model, descriptor: &EntityDescriptor, shape: &ShapeHandle) -> Vec<String> {
    let naming = model.config().naming;

    shape
        .fields()
        .iter()
        .map(|field| {
            descriptor
                .field(&field.name)
                .map_or_else(|| naming.column_name(&field.name), |f| f.column_name(naming))
        })
        .collect()
}

// Fill a zeroed instance from a stored row; missing columns stay zero.
fn materialize(
    shape: &ShapeHandle,
    columns: &[String],
    mut row: BTreeMap<String, Value>,
) -> Projection {
    let mut instance = Projection::zeroed(shape.clone());
    for (slot, column) in columns.iter().enumerate() {
        if let (Some(value), Some(target)) = (row.remove(column), instance.slot_mut(slot)) {
            *target = value;
        }
    }

    instance
}
