//! Structural validation of a finished model.
//!
//! Issues are collected into an `ErrorTree` keyed by entity, never raised
//! one at a time.

mod storage;
mod structure;

use crate::{
    alias::AliasBinding,
    model::{EntityDescriptor, NamingConvention},
};
use std::{collections::BTreeMap, fmt};

///
/// err
///
/// Push a formatted message onto an `ErrorTree`, optionally under a route.
///

#[macro_export]
macro_rules! err {
    ($errs:expr, @ $route:expr, $($arg:tt)*) => {{
        $errs.add_for($route, format!($($arg)*));
    }};
    ($errs:expr, $($arg:tt)*) => {{
        $errs.add(format!($($arg)*));
    }};
}

///
/// ErrorTree
///
/// Messages at this level plus child trees keyed by route.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ErrorTree {
    messages: Vec<String>,
    children: BTreeMap<String, Self>,
}

impl ErrorTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, message: impl ToString) {
        self.messages.push(message.to_string());
    }

    pub fn add_for(&mut self, route: impl Into<String>, message: impl ToString) {
        self.children.entry(route.into()).or_default().add(message);
    }

    /// Graft `tree` under `route`, merging with anything already there.
    pub fn merge_for(&mut self, route: impl Into<String>, tree: Self) {
        if tree.is_empty() {
            return;
        }

        let child = self.children.entry(route.into()).or_default();
        child.messages.extend(tree.messages);
        for (route, sub) in tree.children {
            child.merge_for(route, sub);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.children.values().all(Self::is_empty)
    }

    /// Number of messages in the whole tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len() + self.children.values().map(Self::len).sum::<usize>()
    }

    /// `(route, message)` pairs, routes joined with `.`.
    #[must_use]
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);

        out
    }

    fn flatten_into(&self, prefix: &str, out: &mut Vec<(String, String)>) {
        for message in &self.messages {
            out.push((prefix.to_string(), message.clone()));
        }
        for (route, child) in &self.children {
            let route = if prefix.is_empty() {
                route.clone()
            } else {
                format!("{prefix}.{route}")
            };
            child.flatten_into(&route, out);
        }
    }

    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (route, message) in self.flatten() {
            if route.is_empty() {
                writeln!(f, "{message}")?;
            } else {
                writeln!(f, "{route}: {message}")?;
            }
        }
        Ok(())
    }
}

/// Validate a set of descriptors and the aliases pointing at them.
pub(crate) fn validate_model<'a>(
    entities: impl IntoIterator<Item = &'a EntityDescriptor>,
    aliases: &[AliasBinding],
    naming: NamingConvention,
) -> Result<(), ErrorTree> {
    let entities: Vec<&EntityDescriptor> = entities.into_iter().collect();

    // Phase 1: per-descriptor structure.
    let mut errors = ErrorTree::new();
    for entity in &entities {
        structure::validate_entity(entity, &entities, &mut errors);
    }

    // Phase 2: model-wide invariants.
    structure::validate_aliases(aliases, &entities, &mut errors);
    storage::validate_shared_storage(&entities, naming, &mut errors);

    errors.result()
}

///
/// TESTS
///
