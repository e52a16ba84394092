use crate::{
    error::ConfigurationError, path::TypePath, traits::ViewKind, value::ValueType,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// MemberKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum MemberKind {
    /// Non-mutating read accessor.
    Getter,
    /// Readable and writable.
    Property,
    /// Anything else a capability may expose.
    Method,
}

///
/// MemberDecl
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MemberDecl {
    pub name: String,
    pub value_type: ValueType,
    pub kind: MemberKind,
}

impl MemberDecl {
    #[must_use]
    pub fn new(name: impl Into<String>, value_type: ValueType, kind: MemberKind) -> Self {
        Self {
            name: name.into(),
            value_type,
            kind,
        }
    }

    #[must_use]
    pub fn getter(name: impl Into<String>, value_type: ValueType) -> Self {
        Self::new(name, value_type, MemberKind::Getter)
    }

    #[must_use]
    pub fn property(name: impl Into<String>, value_type: ValueType) -> Self {
        Self::new(name, value_type, MemberKind::Property)
    }

    #[must_use]
    pub fn method(name: impl Into<String>, value_type: ValueType) -> Self {
        Self::new(name, value_type, MemberKind::Method)
    }
}

///
/// TypeDeclKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum TypeDeclKind {
    /// Concrete, instantiable type.
    Record {
        fields: Vec<MemberDecl>,
        implements: Vec<TypePath>,
    },

    /// Pure capability set; cannot be instantiated.
    Capability {
        members: Vec<MemberDecl>,
        extends: Vec<TypePath>,
    },
}

///
/// TypeDecl
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TypeDecl {
    pub path: TypePath,
    pub kind: TypeDeclKind,
}

impl TypeDecl {
    #[must_use]
    pub fn record(path: impl Into<TypePath>, fields: Vec<MemberDecl>) -> Self {
        Self {
            path: path.into(),
            kind: TypeDeclKind::Record {
                fields,
                implements: Vec::new(),
            },
        }
    }

    #[must_use]
    pub fn capability(path: impl Into<TypePath>, members: Vec<MemberDecl>) -> Self {
        Self {
            path: path.into(),
            kind: TypeDeclKind::Capability {
                members,
                extends: Vec::new(),
            },
        }
    }

    /// Set the capabilities a record implements. No-op on capabilities.
    #[must_use]
    pub fn with_implements(mut self, views: impl IntoIterator<Item = TypePath>) -> Self {
        if let TypeDeclKind::Record { implements, .. } = &mut self.kind {
            implements.extend(views);
        }
        self
    }

    /// Set the parents of a capability. No-op on records.
    #[must_use]
    pub fn with_extends(mut self, parents: impl IntoIterator<Item = TypePath>) -> Self {
        if let TypeDeclKind::Capability { extends, .. } = &mut self.kind {
            extends.extend(parents);
        }
        self
    }

    #[must_use]
    pub const fn is_instantiable(&self) -> bool {
        matches!(self.kind, TypeDeclKind::Record { .. })
    }
}

///
/// TypeCatalog
///
/// Every type the model knows about, keyed by path.
///

#[derive(Clone, Debug, Default)]
pub struct TypeCatalog {
    decls: BTreeMap<TypePath, TypeDecl>,
}

impl TypeCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration. Redeclaring an identical type is a no-op.
    pub fn declare(&mut self, decl: TypeDecl) -> Result<(), ConfigurationError> {
        match self.decls.get(&decl.path) {
            Some(existing) if *existing == decl => Ok(()),
            Some(_) => Err(ConfigurationError::ConflictingDeclaration(decl.path)),
            None => {
                self.decls.insert(decl.path.clone(), decl);
                Ok(())
            }
        }
    }

    /// Declare a static view and all of its parents.
    pub fn declare_view<V: ViewKind + ?Sized>(&mut self) -> Result<TypePath, ConfigurationError> {
        V::declare_parents(self)?;
        self.declare(V::decl())?;

        Ok(V::path())
    }

    #[must_use]
    pub fn get(&self, path: &TypePath) -> Option<&TypeDecl> {
        self.decls.get(path)
    }

    #[must_use]
    pub fn contains(&self, path: &TypePath) -> bool {
        self.decls.contains_key(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDecl> {
        self.decls.values()
    }

    /// View types a record declares it implements, in declaration order.
    /// Non-view entries are skipped.
    #[must_use]
    pub fn implemented_views(&self, record: &TypePath) -> Vec<TypePath> {
        let Some(TypeDecl {
            kind: TypeDeclKind::Record { implements, .. },
            ..
        }) = self.decls.get(record)
        else {
            return Vec::new();
        };

        implements
            .iter()
            .filter(|view| self.is_view_contract(view))
            .cloned()
            .collect()
    }
}
