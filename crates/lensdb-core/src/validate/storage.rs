use crate::{
    err,
    model::{EntityDescriptor, NamingConvention, RelationshipKind},
    validate::ErrorTree,
};
use std::collections::BTreeMap;

// Descriptors mapped onto one table must each be joined to the first one
// by a one-to-one relationship over identical primary keys.
pub(super) fn validate_shared_storage(
    all: &[&EntityDescriptor],
    naming: NamingConvention,
    errs: &mut ErrorTree,
) {
    let mut by_table: BTreeMap<String, Vec<&EntityDescriptor>> = BTreeMap::new();
    for entity in all {
        by_table
            .entry(entity.storage_name(naming))
            .or_default()
            .push(*entity);
    }

    for (table, sharing) in by_table {
        let Some((owner, rest)) = pick_owner(&sharing) else {
            continue;
        };

        for entity in rest {
            if !joined(entity, owner) {
                err!(
                    errs,
                    @ entity.key().to_string(),
                    "shares table '{table}' with '{}' without a one-to-one relationship on the same primary key",
                    owner.key()
                );
            }
        }
    }
}

// The base entity owns the table; projections hang off it. With several
// non-projections there is no obvious owner, so the first by key wins.
fn pick_owner<'a>(
    sharing: &[&'a EntityDescriptor],
) -> Option<(&'a EntityDescriptor, Vec<&'a EntityDescriptor>)> {
    if sharing.len() < 2 {
        return None;
    }

    let owner_idx = sharing.iter().position(|e| !e.is_projection()).unwrap_or(0);
    let owner = sharing[owner_idx];
    let rest = sharing
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != owner_idx)
        .map(|(_, e)| *e)
        .collect();

    Some((owner, rest))
}

fn joined(entity: &EntityDescriptor, owner: &EntityDescriptor) -> bool {
    let (Some(pk), Some(owner_pk)) = (entity.primary_key(), owner.primary_key()) else {
        return false;
    };
    if pk != owner_pk {
        return false;
    }

    let links = |from: &EntityDescriptor, to: &EntityDescriptor, key: &[String]| {
        from.relationships().iter().any(|rel| {
            rel.kind == RelationshipKind::OneToOne && rel.target == *to.key() && rel.key_fields == key
        })
    };

    links(entity, owner, pk) || links(owner, entity, pk)
}
