//! Shared fixtures: the `City` entity and a few views over it.

use crate::{
    contract::{MemberDecl, TypeCatalog, TypeDecl},
    model::{EntityDescriptor, EntityKey, Model},
    path::TypePath,
    value::ValueType,
};
use lensdb_primitives::ScalarKind;

pub(crate) const CITY: &str = "app::City";
pub(crate) const TOWN: &str = "app::Town";
pub(crate) const CITY_VIEW: &str = "app::ICityProjection";
pub(crate) const LOCATED_VIEW: &str = "app::ILocated";
pub(crate) const CENSUS_VIEW: &str = "app::ICensus";

pub(crate) const fn text() -> ValueType {
    ValueType::Scalar(ScalarKind::Text)
}

pub(crate) const fn int() -> ValueType {
    ValueType::Scalar(ScalarKind::Int)
}

pub(crate) fn path(p: &str) -> TypePath {
    TypePath::new(p)
}

/// City, its flat view, and a two-level view hierarchy.
pub(crate) fn city_catalog() -> TypeCatalog {
    let mut catalog = TypeCatalog::new();

    for decl in [
        TypeDecl::record(
            CITY,
            vec![
                MemberDecl::property("name", text()),
                MemberDecl::property("state", text()),
                MemberDecl::property("population", int()),
                MemberDecl::property("time_zone", int()),
                MemberDecl::method("switch_to_summer_time", int()),
            ],
        )
        .with_implements([path(CITY_VIEW)]),
        TypeDecl::capability(
            CITY_VIEW,
            vec![
                MemberDecl::getter("name", text()),
                MemberDecl::getter("state", text()),
                MemberDecl::getter("population", int()),
            ],
        ),
        TypeDecl::capability(
            LOCATED_VIEW,
            vec![
                MemberDecl::getter("name", text()),
                MemberDecl::getter("state", text()),
            ],
        ),
        TypeDecl::capability(CENSUS_VIEW, vec![MemberDecl::getter("population", int())])
            .with_extends([path(LOCATED_VIEW)]),
    ] {
        catalog.declare(decl).expect("fixture declarations are consistent");
    }

    catalog
}

pub(crate) fn city_entity() -> EntityDescriptor {
    EntityDescriptor::builder("City")
        .backing_type(CITY)
        .field("name", text())
        .field("state", text())
        .field("population", int())
        .field("time_zone", int())
        .primary_key(["name", "state"])
        .build()
}

/// Same shape as `City` under a different name and storage.
pub(crate) fn town_entity() -> EntityDescriptor {
    EntityDescriptor::builder("Town")
        .backing_type(TOWN)
        .field("name", text())
        .field("state", text())
        .field("population", int())
        .primary_key(["name", "state"])
        .build()
}

pub(crate) fn city_model() -> (Model, EntityKey) {
    let mut model = Model::default();
    *model.catalog_mut() = city_catalog();
    let key = model
        .add_entity(city_entity())
        .expect("city registers once");

    (model, key)
}
