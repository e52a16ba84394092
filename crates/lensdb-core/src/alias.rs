//! Alias table: redirects from a view type to the entity that backs it.
//!
//! Bindings are append-only. Rebinding an alias to its current target is a
//! no-op; rebinding it anywhere else is a conflict.

use crate::{
    model::EntityKey,
    obs::sink::{self, ModelEvent},
    path::TypePath,
};
use std::{
    collections::{BTreeMap, btree_map::Entry},
    sync::{PoisonError, RwLock},
};
use thiserror::Error as ThisError;

///
/// AliasConflictError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error(
    "the alias type '{alias}' is already bound to entity '{existing}', cannot bind it to '{requested}'"
)]
pub struct AliasConflictError {
    pub alias: TypePath,
    pub existing: EntityKey,
    pub requested: EntityKey,
}

///
/// AliasOutcome
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AliasOutcome {
    Bound,
    Unchanged,
}

///
/// AliasBinding
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AliasBinding {
    pub alias: TypePath,
    pub target: EntityKey,
}

///
/// AliasTable
///
/// Safe under concurrent inserts: every add-or-reject happens under one
/// write lock.
///

#[derive(Debug, Default)]
pub struct AliasTable {
    bindings: RwLock<BTreeMap<TypePath, EntityKey>>,
}

impl AliasTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind one alias.
    pub fn bind(
        &self,
        alias: TypePath,
        target: &EntityKey,
    ) -> Result<AliasOutcome, AliasConflictError> {
        self.bind_all([alias], target).map(|outcomes| outcomes[0])
    }

    /// Bind every alias to `target`, or none of them.
    ///
    /// All aliases are checked before any is inserted, so a conflict on one
    /// leaves the table untouched.
    pub fn bind_all(
        &self,
        aliases: impl IntoIterator<Item = TypePath>,
        target: &EntityKey,
    ) -> Result<Vec<AliasOutcome>, AliasConflictError> {
        let aliases: Vec<TypePath> = aliases.into_iter().collect();
        let outcomes = self.try_bind_all(&aliases, target);

        // Events go out after the write guard is released, so a sink may
        // read the table.
        match &outcomes {
            Ok(outcomes) => {
                for (alias, outcome) in aliases.iter().zip(outcomes) {
                    sink::record(match outcome {
                        AliasOutcome::Bound => ModelEvent::AliasBound {
                            alias: alias.as_str(),
                            target: target.as_str(),
                        },
                        AliasOutcome::Unchanged => ModelEvent::AliasUnchanged {
                            alias: alias.as_str(),
                        },
                    });
                }
            }
            Err(conflict) => sink::record(ModelEvent::AliasConflict {
                alias: conflict.alias.as_str(),
            }),
        }

        outcomes
    }

    fn try_bind_all(
        &self,
        aliases: &[TypePath],
        target: &EntityKey,
    ) -> Result<Vec<AliasOutcome>, AliasConflictError> {
        let mut bindings = self.bindings.write().unwrap_or_else(PoisonError::into_inner);

        // Phase 1: reject on any conflict.
        for alias in aliases {
            if let Some(existing) = bindings.get(alias)
                && existing != target
            {
                return Err(AliasConflictError {
                    alias: alias.clone(),
                    existing: existing.clone(),
                    requested: target.clone(),
                });
            }
        }

        // Phase 2: insert.
        let outcomes = aliases
            .iter()
            .map(|alias| match bindings.entry(alias.clone()) {
                Entry::Occupied(_) => AliasOutcome::Unchanged,
                Entry::Vacant(entry) => {
                    entry.insert(target.clone());
                    AliasOutcome::Bound
                }
            })
            .collect();

        Ok(outcomes)
    }

    #[must_use]
    pub fn resolve(&self, alias: &TypePath) -> Option<EntityKey> {
        self.bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(alias)
            .cloned()
    }

    /// Snapshot of every binding, ordered by alias.
    #[must_use]
    pub fn bindings(&self) -> Vec<AliasBinding> {
        self.bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(alias, target)| AliasBinding {
                alias: alias.clone(),
                target: target.clone(),
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

///
/// TESTS
///
