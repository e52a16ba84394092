//! View contracts: deciding whether a declared type is a view and
//! enumerating the fields it promises, including inherited views.

mod decl;


use crate::{path::TypePath, value::ValueType};
use std::collections::BTreeSet;
use thiserror::Error as ThisError;

// re-exports
pub use decl::{MemberDecl, MemberKind, TypeCatalog, TypeDecl, TypeDeclKind};

///
/// ContractError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ContractError {
    #[error("type '{0}' is not declared")]
    UnknownType(TypePath),

    #[error("type '{0}' is instantiable and cannot be used as a view")]
    Instantiable(TypePath),

    #[error("member '{member}' of '{view}' is not a read accessor")]
    MutatingMember { view: TypePath, member: String },

    #[error("'{view}' declares field '{field}' more than once")]
    DuplicateField { view: TypePath, field: String },

    #[error("'{0}' extends itself")]
    CyclicExtends(TypePath),
}

///
/// FieldContract
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct FieldContract {
    pub name: String,
    pub value_type: ValueType,
}

impl FieldContract {
    #[must_use]
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
        }
    }
}

///
/// ViewContract
///
/// The fields a view promises: its own accessors in declaration order,
/// plus the contracts of the views it extends.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ViewContract {
    view_type: TypePath,
    fields: Vec<FieldContract>,
    parents: Vec<Self>,
}

impl ViewContract {
    #[must_use]
    pub const fn view_type(&self) -> &TypePath {
        &self.view_type
    }

    /// Fields declared directly on this view.
    #[must_use]
    pub fn fields(&self) -> &[FieldContract] {
        &self.fields
    }

    #[must_use]
    pub fn parents(&self) -> &[Self] {
        &self.parents
    }

    /// Every field in depth-first order, own fields first.
    /// Duplicates inherited along several paths are yielded each time.
    pub fn iter_fields(&self) -> impl Iterator<Item = &FieldContract> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);

        out.into_iter()
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a FieldContract>) {
        out.extend(self.fields.iter());
        for parent in &self.parents {
            parent.collect_fields(out);
        }
    }

    /// Every field, deduplicated by name (first occurrence wins).
    #[must_use]
    pub fn all_fields(&self) -> Vec<&FieldContract> {
        let mut seen = BTreeSet::new();

        self.iter_fields()
            .filter(|field| seen.insert(field.name.as_str()))
            .collect()
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldContract> {
        self.iter_fields().find(|field| field.name == name)
    }

    /// This view followed by all of its ancestors, each listed once.
    #[must_use]
    pub fn lineage(&self) -> Vec<&TypePath> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        self.collect_lineage(&mut seen, &mut out);

        out
    }

    fn collect_lineage<'a>(
        &'a self,
        seen: &mut BTreeSet<&'a TypePath>,
        out: &mut Vec<&'a TypePath>,
    ) {
        if !seen.insert(&self.view_type) {
            return;
        }
        out.push(&self.view_type);
        for parent in &self.parents {
            parent.collect_lineage(seen, out);
        }
    }
}

impl TypeCatalog {
    /// True iff `ty` is a declared capability whose members are all read
    /// accessors and whose parents are all views too.
    #[must_use]
    pub fn is_view_contract(&self, ty: &TypePath) -> bool {
        self.get_contract(ty).is_ok()
    }

    /// Build the contract of a view type.
    pub fn get_contract(&self, ty: &TypePath) -> Result<ViewContract, ContractError> {
        let mut stack = Vec::new();

        self.build_contract(ty, &mut stack)
    }

    fn build_contract(
        &self,
        ty: &TypePath,
        stack: &mut Vec<TypePath>,
    ) -> Result<ViewContract, ContractError> {
        if stack.contains(ty) {
            return Err(ContractError::CyclicExtends(ty.clone()));
        }

        let decl = self
            .get(ty)
            .ok_or_else(|| ContractError::UnknownType(ty.clone()))?;
        let TypeDeclKind::Capability { members, extends } = &decl.kind else {
            return Err(ContractError::Instantiable(ty.clone()));
        };

        let mut names = BTreeSet::new();
        let mut fields = Vec::with_capacity(members.len());
        for member in members {
            if member.kind != MemberKind::Getter {
                return Err(ContractError::MutatingMember {
                    view: ty.clone(),
                    member: member.name.clone(),
                });
            }
            if !names.insert(member.name.as_str()) {
                return Err(ContractError::DuplicateField {
                    view: ty.clone(),
                    field: member.name.clone(),
                });
            }
            fields.push(FieldContract::new(&member.name, member.value_type.clone()));
        }

        stack.push(ty.clone());
        let parents = extends
            .iter()
            .map(|parent| self.build_contract(parent, stack))
            .collect::<Result<Vec<_>, _>>();
        stack.pop();

        Ok(ViewContract {
            view_type: ty.clone(),
            fields,
            parents: parents?,
        })
    }
}
