//! Minimal in-memory host: rows keyed by physical table, and a session
//! whose loads are routed through the model's alias resolution.
//!
//! Rows are stored by column name, so a base entity and every projection
//! sharing its table read the same data.

mod predicate;
mod session;


use crate::{model::EntityKey, value::Value};
use std::{
    collections::BTreeMap,
    sync::{PoisonError, RwLock},
};

// re-exports
pub use predicate::{CompareOp, ComparePredicate};
pub use session::{LoadQuery, Session};

///
/// Row
///
/// Field values of one entity instance, keyed by field name.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row(BTreeMap<String, Value>);

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

///
/// LoadOrigin
///
/// Provenance tag attached to every projection a session loads.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoadOrigin {
    pub entity: EntityKey,
    pub table: String,
    pub position: usize,
}

///
/// MemoryStore
///
/// Column-keyed rows per physical table.
///

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<BTreeMap<String, Vec<BTreeMap<String, Value>>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows in a table.
    #[must_use]
    pub fn len(&self, table: &str) -> usize {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(table)
            .map_or(0, Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self, table: &str) -> bool {
        self.len(table) == 0
    }

    pub(crate) fn push(&self, table: String, columns: BTreeMap<String, Value>) {
        self.tables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(table)
            .or_default()
            .push(columns);
    }

    // Snapshot of a table's rows.
    pub(crate) fn scan(&self, table: &str) -> Vec<BTreeMap<String, Value>> {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(table)
            .cloned()
            .unwrap_or_default()
    }
}
