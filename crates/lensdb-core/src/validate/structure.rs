use crate::{alias::AliasBinding, err, model::EntityDescriptor, validate::ErrorTree};
use std::collections::BTreeSet;

// Field names, primary key and relationship targets of one descriptor.
pub(super) fn validate_entity(
    entity: &EntityDescriptor,
    all: &[&EntityDescriptor],
    errs: &mut ErrorTree,
) {
    let route = entity.key().to_string();

    let mut names = BTreeSet::new();
    for field in entity.fields() {
        if !names.insert(field.name.as_str()) {
            err!(errs, @ route.clone(), "duplicate field '{}'", field.name);
        }
    }

    if let Some(pk) = entity.primary_key() {
        if pk.is_empty() {
            err!(errs, @ route.clone(), "primary key has no fields");
        }
        for key_field in pk {
            match entity.field(key_field) {
                None => err!(errs, @ route.clone(), "primary key field '{key_field}' is not mapped"),
                Some(field) if !field.value_type.scalar().is_some_and(|k| k.is_keyable()) => {
                    err!(
                        errs,
                        @ route.clone(),
                        "primary key field '{key_field}' has type {}, which cannot be a key",
                        field.value_type
                    );
                }
                Some(_) => {}
            }
        }
    }

    for rel in entity.relationships() {
        if !all.iter().any(|e| e.key() == &rel.target) {
            err!(errs, @ route.clone(), "relationship targets unknown entity '{}'", rel.target);
        }
        for key_field in &rel.key_fields {
            if entity.field(key_field).is_none() {
                err!(errs, @ route.clone(), "relationship key field '{key_field}' is not mapped");
            }
        }
    }
}

pub(super) fn validate_aliases(
    aliases: &[AliasBinding],
    all: &[&EntityDescriptor],
    errs: &mut ErrorTree,
) {
    for binding in aliases {
        if !all.iter().any(|e| e.key() == &binding.target) {
            err!(
                errs,
                @ "aliases",
                "alias '{}' targets unknown entity '{}'",
                binding.alias,
                binding.target
            );
        }
    }
}
