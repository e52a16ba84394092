use lensdb::{
    core::{
        convert::ProjectionSeed,
        error::ErrorClass,
        projection::ProvenanceTag,
    },
    prelude::*,
};
use serde::de::DeserializeSeed;

view! {
    pub trait Located {
        fn name(&self) -> String;
        fn state(&self) -> String;
    }
}

view! {
    pub trait CityProjection: Located {
        fn population(&self) -> i64;
    }
}

fn seattle(model: &Model) -> Projection {
    model
        .create_instance::<dyn CityProjection>(|s| {
            s.set("name", "Seattle")?
                .set("state", "WA")?
                .set("population", 724_745)?;
            Ok(())
        })
        .unwrap()
}

#[test]
fn built_instance_reads_through_its_accessors() {
    let model = Model::default();

    let city = seattle(&model);

    assert_eq!(city.name(), "Seattle");
    assert_eq!(city.state(), "WA");
    assert_eq!(city.population(), 724_745);
    assert!(city.provenance().is_none());
}

#[test]
fn accessor_outside_the_shape_yields_the_zero_value() {
    let model = Model::default();

    let place = model
        .create_instance::<dyn Located>(|s| s.field("name").set("Tacoma"))
        .unwrap();

    assert_eq!(place.name(), "Tacoma");
    assert_eq!(place.state(), "");
    assert_eq!(CityProjection::population(&place), 0);
}

#[test]
fn json_round_trip_preserves_the_instance() {
    let model = Model::default();
    let city = seattle(&model);

    let json = serde_json::to_value(&city).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "population": 724_745, "name": "Seattle", "state": "WA" })
    );

    let view = <dyn CityProjection as ViewKind>::path();
    let mut model = model;
    model.declare_view::<dyn CityProjection>().unwrap();
    let back = model
        .conversion_adapter()
        .read_json(&view, &json.to_string())
        .unwrap();

    assert_eq!(back, city);
    assert!(back.shape().ptr_eq(city.shape()));
}

#[test]
fn seed_decodes_into_the_resolved_shape() {
    let mut model = Model::default();
    let view = model.declare_view::<dyn CityProjection>().unwrap();
    let shape = model.conversion_adapter().resolve(&view).unwrap();

    let mut de = serde_json::Deserializer::from_str(r#"{"name":"Boise","extra":true}"#);
    let city = ProjectionSeed::new(shape).deserialize(&mut de).unwrap();

    assert_eq!(city.name(), "Boise");
    assert_eq!(city.population(), 0);
}

#[test]
fn writing_through_a_view_is_unsupported() {
    let mut model = Model::default();
    let view = model.declare_view::<dyn CityProjection>().unwrap();
    let city = seattle(&model);

    let err = model.conversion_adapter().write(&view, &city).unwrap_err();

    assert!(matches!(err, Error::UnsupportedOperation(_)));
    assert_eq!(err.class(), ErrorClass::Unsupported);
}

#[test]
fn provenance_tag_rides_outside_the_fields() {
    #[derive(Debug, PartialEq)]
    struct Imported(&'static str);

    let model = Model::default();
    let plain = seattle(&model);
    let mut tagged = plain.clone();
    tagged.set_provenance(ProvenanceTag::new(Imported("census-2020")));

    assert_eq!(tagged, plain);
    assert_eq!(tagged.provenance_as::<Imported>(), Some(&Imported("census-2020")));
    assert_eq!(tagged.provenance_as::<String>(), None);
    assert_eq!(
        serde_json::to_value(&tagged).unwrap(),
        serde_json::to_value(&plain).unwrap()
    );
}
