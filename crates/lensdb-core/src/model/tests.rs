use crate::{
    Error,
    alias::AliasOutcome,
    config::{ModelConfig, ProjectionFields},
    contract::{ContractError, MemberDecl, TypeDecl},
    error::{ConfigurationError, ErrorClass},
    model::{
        EntityDescriptor, EntityKey, Model, NamingConvention, RelationshipKind,
        annotation::{COLUMN_NAME, PROJECTION_OF, TABLE_NAME},
    },
    obs,
    test_support::*,
};

fn register(model: &mut Model, base: &EntityKey, view: &str) -> Result<EntityDescriptor, Error> {
    let contract = model.contract(&path(view))?;
    model.register_projection(base, &contract)
}

#[test]
fn projection_shares_name_and_storage_with_its_base() {
    let (mut model, city) = city_model();

    let projection = register(&mut model, &city, CITY_VIEW).unwrap();
    let base = model.entity(&city).unwrap();

    assert_eq!(projection.name(), "City");
    assert_ne!(projection.key(), base.key());
    assert_eq!(
        model.physical_storage_name(&projection),
        model.physical_storage_name(base)
    );
    assert_eq!(projection.annotations().text(TABLE_NAME), Some("City"));
    assert_eq!(
        projection.projection_of(),
        Some(path(CITY_VIEW)),
        "projection remembers its view"
    );
    assert_eq!(projection.annotations().text(PROJECTION_OF), Some(CITY_VIEW));
    assert_eq!(model.entities_named("City").count(), 2);
}

#[test]
fn projection_links_back_one_to_one_on_the_same_key() {
    let (mut model, city) = city_model();

    let projection = register(&mut model, &city, CITY_VIEW).unwrap();

    assert_eq!(projection.primary_key(), Some(&["name".to_string(), "state".to_string()][..]));
    let [rel] = projection.relationships() else {
        panic!("expected exactly one relationship");
    };
    assert_eq!(rel.kind, RelationshipKind::OneToOne);
    assert_eq!(&rel.target, &city);
    assert_eq!(rel.key_fields, ["name", "state"]);
    assert!(!rel.navigable);
}

#[test]
fn contract_only_keeps_contract_and_key_fields() {
    let (mut model, city) = city_model();

    let projection = register(&mut model, &city, CENSUS_VIEW).unwrap();
    let names: Vec<_> = projection.fields().iter().map(|f| f.name.as_str()).collect();

    assert_eq!(names, ["name", "state", "population"]);
    assert!(projection.fields().iter().all(|f| f.annotations.contains(COLUMN_NAME)));
}

#[test]
fn all_base_fields_copies_every_field() {
    let mut model =
        Model::new(ModelConfig::default().with_projection_fields(ProjectionFields::AllBaseFields));
    *model.catalog_mut() = city_catalog();
    let city = model.add_entity(city_entity()).unwrap();

    let projection = register(&mut model, &city, LOCATED_VIEW).unwrap();

    assert!(projection.field("time_zone").is_some());
    assert_eq!(model.shape_of(projection.key()).unwrap().len(), 2);
}

#[test]
fn explicit_column_names_survive_and_missing_ones_follow_naming() {
    let mut model = Model::new(ModelConfig::default().with_naming(NamingConvention::Snake));
    *model.catalog_mut() = city_catalog();
    let city = model
        .add_entity(
            EntityDescriptor::builder("City")
                .backing_type(CITY)
                .field_descriptor(
                    crate::model::FieldDescriptor::new("name", text())
                        .with_annotation(COLUMN_NAME, "CityName"),
                )
                .field("state", text())
                .field("population", int())
                .primary_key(["name", "state"])
                .table_name("Cities")
                .build(),
        )
        .unwrap();

    let projection = register(&mut model, &city, CITY_VIEW).unwrap();

    assert_eq!(projection.field("name").unwrap().annotations.text(COLUMN_NAME), Some("CityName"));
    assert_eq!(projection.field("state").unwrap().annotations.text(COLUMN_NAME), Some("state"));
    assert_eq!(model.physical_storage_name(&projection), "Cities");
}

#[test]
fn view_and_every_ancestor_resolve_to_the_projection() {
    let (mut model, city) = city_model();

    let projection = register(&mut model, &city, CENSUS_VIEW).unwrap();

    for alias in [CENSUS_VIEW, LOCATED_VIEW] {
        assert_eq!(model.resolve(&path(alias)).unwrap().key(), projection.key());
    }
    assert_eq!(model.resolve(&path(CITY)).unwrap().key(), &city);
}

#[test]
fn registering_twice_returns_the_same_descriptor() {
    let (mut model, city) = city_model();

    let first = register(&mut model, &city, CITY_VIEW).unwrap();
    let second = register(&mut model, &city, CITY_VIEW).unwrap();

    assert_eq!(first, second);
    assert_eq!(model.entities().count(), 2);
}

#[test]
fn one_view_over_two_bases_conflicts_and_leaves_no_trace() {
    let (mut model, city) = city_model();
    let town = model.add_entity(town_entity()).unwrap();
    register(&mut model, &city, LOCATED_VIEW).unwrap();

    let err = register(&mut model, &town, LOCATED_VIEW).unwrap_err();

    assert!(matches!(err, Error::AliasConflict(_)));
    assert_eq!(err.class(), ErrorClass::Conflict);
    assert_eq!(model.entities_named("Town").count(), 1);
    assert_eq!(model.aliases().len(), 1);
}

#[test]
fn partial_alias_overlap_binds_nothing() {
    let (mut model, city) = city_model();
    let town = model.add_entity(town_entity()).unwrap();
    register(&mut model, &town, LOCATED_VIEW).unwrap();

    // ICensus is new, but its parent ILocated already points at Town.
    let err = register(&mut model, &city, CENSUS_VIEW).unwrap_err();

    assert!(matches!(err, Error::AliasConflict(_)));
    assert!(model.resolve(&path(CENSUS_VIEW)).is_err());
}

#[test]
fn base_without_backing_type_is_rejected() {
    let mut model = Model::default();
    *model.catalog_mut() = city_catalog();
    let adhoc = model
        .add_entity(
            EntityDescriptor::builder("Adhoc")
                .field("name", text())
                .field("state", text())
                .build(),
        )
        .unwrap();

    let err = register(&mut model, &adhoc, LOCATED_VIEW).unwrap_err();

    assert!(matches!(
        err,
        Error::Configuration(ConfigurationError::MissingBackingType { .. })
    ));
    assert_eq!(
        err.to_string(),
        "cannot register projections for entity 'Adhoc' as it does not have a backing type"
    );
}

#[test]
fn record_types_are_not_views() {
    let (model, _) = city_model();

    let err = model.contract(&path(CITY)).unwrap_err();

    assert_eq!(err, ContractError::Instantiable(path(CITY)));
}

#[test]
fn contract_field_missing_on_the_base_is_rejected() {
    let (mut model, _) = city_model();
    let town = model.add_entity(town_entity()).unwrap();

    // Town has no time_zone.
    model
        .declare(TypeDecl::capability(
            "app::IZoned",
            vec![MemberDecl::getter("time_zone", int())],
        ))
        .unwrap();

    let err = register(&mut model, &town, "app::IZoned").unwrap_err();

    assert!(matches!(
        err,
        Error::Configuration(ConfigurationError::FieldNotOnEntity { ref field, .. }) if field == "time_zone"
    ));
    assert!(model.resolve(&path("app::IZoned")).is_err());
}

#[test]
fn contract_field_of_another_type_is_rejected() {
    let (mut model, city) = city_model();
    model
        .declare(TypeDecl::capability(
            "app::ITextPopulation",
            vec![MemberDecl::getter("population", text())],
        ))
        .unwrap();

    let err = register(&mut model, &city, "app::ITextPopulation").unwrap_err();

    assert!(matches!(
        err,
        Error::Configuration(ConfigurationError::FieldTypeMismatch { .. })
    ));
}

#[test]
fn register_projections_follows_declared_implementations() {
    let (mut model, city) = city_model();

    let registered = model.register_projections(&city).unwrap();

    assert_eq!(registered.len(), 1);
    assert_eq!(registered[0].projection_of(), Some(path(CITY_VIEW)));
}

#[test]
fn add_alias_semantics() {
    let (model, city) = city_model();

    assert_eq!(
        model.add_alias(&city, path("app::Place")).unwrap(),
        AliasOutcome::Bound
    );
    assert_eq!(
        model.add_alias(&city, path("app::Place")).unwrap(),
        AliasOutcome::Unchanged
    );
    assert!(matches!(
        model.add_alias(&EntityKey::new("app::Ghost"), path("app::Other")),
        Err(Error::Configuration(ConfigurationError::UnknownEntity(_)))
    ));
    assert_eq!(model.resolve(&path("app::Place")).unwrap().key(), &city);
}

#[test]
fn duplicate_entities_are_rejected() {
    let (mut model, _) = city_model();

    let err = model.add_entity(city_entity()).unwrap_err();

    assert!(matches!(
        err,
        Error::Configuration(ConfigurationError::DuplicateEntity(_))
    ));
}

#[test]
fn registered_model_validates() {
    let (mut model, city) = city_model();
    register(&mut model, &city, CITY_VIEW).unwrap();

    model.validate().unwrap();
}

#[test]
fn eager_validation_rejects_before_inserting() {
    let mut model = Model::new(ModelConfig {
        validate_on_register: true,
        ..ModelConfig::default()
    });
    *model.catalog_mut() = city_catalog();
    // No primary key: the projection cannot be joined back to its base.
    let city = model
        .add_entity(
            EntityDescriptor::builder("City")
                .backing_type(CITY)
                .field("name", text())
                .field("state", text())
                .build(),
        )
        .unwrap();

    let err = register(&mut model, &city, LOCATED_VIEW).unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(model.entities().count(), 1);
    assert!(model.aliases().is_empty());
}

#[test]
fn registration_is_observable() {
    obs::event_reset_all();
    let (mut model, city) = city_model();

    register(&mut model, &city, CENSUS_VIEW).unwrap();

    let report = obs::event_report();
    assert_eq!(report.ops.projections_registered, 1);
    assert_eq!(report.ops.aliases_bound, 2);
    assert_eq!(report.view(CENSUS_VIEW).unwrap().shape_fields, 3);
}

#[test]
fn sink_can_read_the_synthesizer_while_registration_runs() {
    use crate::{
        obs::{EventSink, ModelEvent, with_event_sink},
        synth::TypeSynthesizer,
    };
    use std::{cell::Cell, rc::Rc, sync::{Arc, mpsc}, thread, time::Duration};

    struct CacheSize {
        synth: Arc<TypeSynthesizer>,
        seen: Cell<Option<usize>>,
    }

    impl EventSink for CacheSize {
        fn record(&self, event: ModelEvent<'_>) {
            if let ModelEvent::ShapeSynthesized { .. } = event {
                self.seen.set(Some(self.synth.len()));
            }
        }
    }

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let synth = Arc::new(TypeSynthesizer::new());
        let mut model = Model::with_synthesizer(ModelConfig::default(), Arc::clone(&synth));
        *model.catalog_mut() = city_catalog();
        let city = model.add_entity(city_entity()).unwrap();
        let sink = Rc::new(CacheSize {
            synth,
            seen: Cell::new(None),
        });

        with_event_sink(sink.clone(), || register(&mut model, &city, CITY_VIEW)).unwrap();
        tx.send(sink.seen.get()).unwrap();
    });

    let seen = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("registration finished");
    assert_eq!(seen, Some(1));
}

#[test]
fn re_registering_with_a_foreign_contract_is_rejected() {
    use crate::contract::TypeCatalog;

    let (mut model, city) = city_model();
    register(&mut model, &city, CITY_VIEW).unwrap();

    // Same view path, declared elsewhere with fewer fields.
    let mut other = TypeCatalog::new();
    other
        .declare(TypeDecl::capability(
            CITY_VIEW,
            vec![MemberDecl::getter("name", text())],
        ))
        .unwrap();
    let foreign = other.get_contract(&path(CITY_VIEW)).unwrap();

    let err = model.register_projection(&city, &foreign).unwrap_err();

    assert!(matches!(
        err,
        Error::Configuration(ConfigurationError::UndeclaredContract { .. })
    ));
    assert_eq!(model.entities().count(), 2);
}
