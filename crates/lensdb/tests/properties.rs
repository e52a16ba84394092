use lensdb::{core::alias::AliasOutcome, prelude::*};
use proptest::prelude::*;

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

fn arb_city() -> impl Strategy<Value = (String, String, i64)> {
    ("[a-zA-Z ]{0,16}", "[A-Z]{2}", any::<i64>())
}

fn arb_alias() -> impl Strategy<Value = String> {
    "[a-z]{1,6}(::[A-Z][a-z]{0,6}){1,2}"
}

proptest! {
    #[test]
    fn built_fields_read_back((name, state, population) in arb_city()) {
        let model = Model::default();

        let city = model
            .create_instance::<dyn CityProjection>(|s| {
                s.set("name", name.as_str())?
                    .set("state", state.as_str())?
                    .set("population", population)?;
                Ok(())
            })
            .unwrap();

        prop_assert_eq!(city.name(), name);
        prop_assert_eq!(city.state(), state);
        prop_assert_eq!(city.population(), population);
    }

    #[test]
    fn json_round_trip_is_lossless((name, state, population) in arb_city()) {
        let mut model = Model::default();
        let view = model.declare_view::<dyn CityProjection>().unwrap();
        let city = model
            .create_instance::<dyn CityProjection>(|s| {
                s.field("name").set(name)?;
                s.field("state").set(state)?;
                s.field("population").set(population)
            })
            .unwrap();

        let json = serde_json::to_string(&city).unwrap();
        let back = model.conversion_adapter().read_json(&view, &json).unwrap();

        prop_assert_eq!(back, city);
    }

    #[test]
    fn encoded_keys_are_exactly_the_contract_fields((name, state, population) in arb_city()) {
        let model = Model::default();
        let city = model
            .create_instance::<dyn CityProjection>(|s| {
                s.set("name", name)?.set("state", state)?.set("population", population)?;
                Ok(())
            })
            .unwrap();

        let json = serde_json::to_value(&city).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();

        prop_assert_eq!(keys, ["name", "population", "state"]);
    }

    #[test]
    fn rebinding_an_alias_to_its_target_is_idempotent(alias in arb_alias(), repeats in 1usize..5) {
        let mut model = Model::default();
        let key = model
            .add_entity(
                EntityDescriptor::builder("Thing")
                    .backing_type("app::Thing")
                    .field("id", ValueType::Scalar(ScalarKind::Ulid))
                    .primary_key(["id"])
                    .build(),
            )
            .unwrap();
        let alias = TypePath::new(alias);

        prop_assert_eq!(model.add_alias(&key, alias.clone()).unwrap(), AliasOutcome::Bound);
        for _ in 0..repeats {
            prop_assert_eq!(model.add_alias(&key, alias.clone()).unwrap(), AliasOutcome::Unchanged);
        }
        prop_assert_eq!(model.resolve(&alias).unwrap().key(), &key);
        prop_assert_eq!(model.aliases().len(), 1);
    }
}
