use crate::{
    path::TypePath,
    value::{Value, ValueType},
};
use lensdb_primitives::{ALL_SCALAR_KINDS, ScalarKind};
use serde_json::json;
use std::cmp::Ordering;
use ulid::Ulid;

// ---- helpers -----------------------------------------------------------

fn scalar(kind: ScalarKind) -> ValueType {
    ValueType::Scalar(kind)
}

#[test]
fn every_scalar_zero_value_is_accepted_by_its_type() {
    for kind in ALL_SCALAR_KINDS {
        let ty = scalar(kind);
        let zero = ty.zero_value().expect("scalars are storable");

        assert!(ty.accepts(&zero), "{kind} should accept its own zero value");
        assert_eq!(zero.scalar_kind(), Some(kind));
    }
}

#[test]
fn optional_zero_is_null() {
    let ty = ValueType::Optional(ScalarKind::Int);

    assert_eq!(ty.zero_value(), Some(Value::Null));
    assert!(ty.accepts(&Value::Null));
    assert!(ty.accepts(&Value::Int(3)));
    assert!(!scalar(ScalarKind::Int).accepts(&Value::Null));
}

#[test]
fn non_storable_types_have_no_zero_value() {
    let list = ValueType::List(Box::new(scalar(ScalarKind::Text)));
    let named = ValueType::Named(TypePath::new("app::Address"));

    assert!(list.zero_value().is_none());
    assert!(named.zero_value().is_none());
    assert!(!list.is_storable());
    assert!(!named.accepts(&Value::Text("x".into())));
}

#[test]
fn numeric_kinds_compare_by_value() {
    assert_eq!(Value::Int(2).compare(&Value::Float64(2.5)), Some(Ordering::Less));
    assert_eq!(Value::Float32(3.0).compare(&Value::Uint(3)), Some(Ordering::Equal));
    assert_eq!(Value::Int(-1).compare(&Value::Uint(0)), Some(Ordering::Less));
    assert_eq!(Value::Uint(5).compare(&Value::Int(5)), Some(Ordering::Equal));
    assert_eq!(Value::Text("a".into()).compare(&Value::Int(1)), None);
    assert_eq!(Value::Null.compare(&Value::Null), Some(Ordering::Equal));
}

#[test]
fn blobs_have_equality_but_no_order() {
    let (a, b) = (Value::Blob(vec![1]), Value::Blob(vec![2]));

    assert_eq!(a.compare(&b), None);
    assert_eq!(a.compare(&a.clone()), None);
    assert_eq!(a.equals(&b), Some(false));
    assert_eq!(a.equals(&a.clone()), Some(true));
    assert_eq!(a.equals(&Value::Int(1)), None);
}

#[test]
fn serialize_is_untagged() {
    let id = Ulid::from_string("01ARZ3NDEKTSV4RRFFQ69G5FAV").unwrap();
    let encoded = serde_json::to_value(vec![
        Value::Text("WA".into()),
        Value::Int(724_745),
        Value::Null,
        Value::Ulid(id),
        Value::Blob(vec![1, 2]),
    ])
    .unwrap();

    assert_eq!(
        encoded,
        json!(["WA", 724_745, null, "01ARZ3NDEKTSV4RRFFQ69G5FAV", [1, 2]])
    );
}

#[test]
fn non_finite_floats_refuse_to_encode() {
    for value in [
        Value::Float64(f64::NAN),
        Value::Float64(f64::NEG_INFINITY),
        Value::Float32(f32::INFINITY),
    ] {
        let err = serde_json::to_string(&value).unwrap_err();
        assert!(err.to_string().starts_with("cannot encode non-finite float"));
    }

    assert_eq!(serde_json::to_string(&Value::Float64(1.5)).unwrap(), "1.5");
}

#[test]
fn decode_is_driven_by_declared_type() {
    assert_eq!(
        Value::from_json(&scalar(ScalarKind::Uint), &json!(7)),
        Some(Value::Uint(7))
    );
    assert_eq!(
        Value::from_json(&scalar(ScalarKind::Int), &json!(7)),
        Some(Value::Int(7))
    );
    assert_eq!(Value::from_json(&scalar(ScalarKind::Uint), &json!(-7)), None);
    assert_eq!(Value::from_json(&scalar(ScalarKind::Text), &json!(7)), None);
    assert_eq!(Value::from_json(&scalar(ScalarKind::Text), &json!(null)), None);
    assert_eq!(
        Value::from_json(&ValueType::Optional(ScalarKind::Text), &json!(null)),
        Some(Value::Null)
    );
    assert_eq!(
        Value::from_json(&scalar(ScalarKind::Blob), &json!([1, 300])),
        None,
        "bytes above 255 must be rejected"
    );
}

#[test]
fn option_into_value_maps_none_to_null() {
    assert_eq!(Value::from(None::<i32>), Value::Null);
    assert_eq!(Value::from(Some(3_u8)), Value::Uint(3));
    assert_eq!(Value::from("Seattle"), Value::Text("Seattle".into()));
}
