use crate::{
    model::{
        EntityKey, NamingConvention,
        annotation::{AnnotationValue, Annotations, COLUMN_NAME, PROJECTION_OF, TABLE_NAME},
    },
    path::TypePath,
    value::ValueType,
};
use serde::{Deserialize, Serialize};

///
/// FieldDescriptor
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub value_type: ValueType,

    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl FieldDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            annotations: Annotations::new(),
        }
    }

    #[must_use]
    pub fn with_annotation(
        mut self,
        name: impl Into<String>,
        value: impl Into<AnnotationValue>,
    ) -> Self {
        self.annotations.set(name, value);
        self
    }

    /// Physical column name: the annotation when present, else inferred.
    #[must_use]
    pub fn column_name(&self, naming: NamingConvention) -> String {
        self.annotations
            .text(COLUMN_NAME)
            .map_or_else(|| naming.column_name(&self.name), ToString::to_string)
    }
}

///
/// RelationshipKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum RelationshipKind {
    OneToOne,
}

///
/// Relationship
///
/// Link from the owning descriptor to `target`, joined on `key_fields`
/// which both sides carry under the same names.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Relationship {
    pub kind: RelationshipKind,
    pub target: EntityKey,
    pub key_fields: Vec<String>,
    pub navigable: bool,
}

///
/// EntityDescriptor
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EntityDescriptor {
    name: String,
    key: EntityKey,
    backing_type: Option<TypePath>,
    fields: Vec<FieldDescriptor>,
    annotations: Annotations,
    primary_key: Option<Vec<String>>,
    relationships: Vec<Relationship>,
}

impl EntityDescriptor {
    #[must_use]
    pub fn builder(name: impl Into<String>) -> EntityDescriptorBuilder {
        EntityDescriptorBuilder::new(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn key(&self) -> &EntityKey {
        &self.key
    }

    #[must_use]
    pub const fn backing_type(&self) -> Option<&TypePath> {
        self.backing_type.as_ref()
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub const fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    #[must_use]
    pub fn annotation(&self, name: &str) -> Option<&AnnotationValue> {
        self.annotations.get(name)
    }

    #[must_use]
    pub fn primary_key(&self) -> Option<&[String]> {
        self.primary_key.as_deref()
    }

    #[must_use]
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// View type this descriptor was synthesized for, if it is a projection.
    #[must_use]
    pub fn projection_of(&self) -> Option<TypePath> {
        self.annotations.text(PROJECTION_OF).map(TypePath::new)
    }

    #[must_use]
    pub fn is_projection(&self) -> bool {
        self.annotations.contains(PROJECTION_OF)
    }

    /// Physical storage name: the table annotation when present, otherwise
    /// inferred from the backing type's identifier (or the entity name).
    #[must_use]
    pub fn storage_name(&self, naming: NamingConvention) -> String {
        if let Some(table) = self.annotations.text(TABLE_NAME) {
            return table.to_string();
        }

        let ident = self.backing_type.as_ref().map_or(self.name.as_str(), TypePath::ident);
        naming.table_name(ident)
    }
}

///
/// EntityDescriptorBuilder
///

#[derive(Debug)]
pub struct EntityDescriptorBuilder {
    name: String,
    key: Option<EntityKey>,
    backing_type: Option<TypePath>,
    fields: Vec<FieldDescriptor>,
    annotations: Annotations,
    primary_key: Option<Vec<String>>,
    relationships: Vec<Relationship>,
}

impl EntityDescriptorBuilder {
    fn new(name: String) -> Self {
        Self {
            name,
            key: None,
            backing_type: None,
            fields: Vec::new(),
            annotations: Annotations::new(),
            primary_key: None,
            relationships: Vec::new(),
        }
    }

    /// Override the lookup key; defaults to the backing type, then the name.
    #[must_use]
    pub fn key(mut self, key: EntityKey) -> Self {
        self.key = Some(key);
        self
    }

    #[must_use]
    pub fn backing_type(mut self, path: impl Into<TypePath>) -> Self {
        self.backing_type = Some(path.into());
        self
    }

    #[must_use]
    pub fn field(self, name: impl Into<String>, value_type: ValueType) -> Self {
        self.field_descriptor(FieldDescriptor::new(name, value_type))
    }

    #[must_use]
    pub fn field_descriptor(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn annotation(mut self, name: impl Into<String>, value: impl Into<AnnotationValue>) -> Self {
        self.annotations.set(name, value);
        self
    }

    #[must_use]
    pub fn annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    #[must_use]
    pub fn table_name(self, table: impl Into<String>) -> Self {
        self.annotation(TABLE_NAME, table.into())
    }

    #[must_use]
    pub fn primary_key<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    #[must_use]
    pub fn build(self) -> EntityDescriptor {
        let key = self.key.unwrap_or_else(|| {
            self.backing_type
                .as_ref()
                .map_or_else(|| EntityKey::new(self.name.as_str()), EntityKey::from)
        });

        EntityDescriptor {
            name: self.name,
            key,
            backing_type: self.backing_type,
            fields: self.fields,
            annotations: self.annotations,
            primary_key: self.primary_key,
            relationships: self.relationships,
        }
    }
}
