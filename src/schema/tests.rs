//! Tests for the field mapping module

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_case::test_case;

fn profile_schema() -> Schema {
    Schema::new(vec![
        FieldDescriptor::string("username").at("name").required(),
        FieldDescriptor::string("country").transform(Transform::BlankToNull),
        FieldDescriptor::integer("age")
            .transform(Transform::LiteralToNull("0"))
            .transform(Transform::StringToInt),
        FieldDescriptor::boolean("subscriber").transform(Transform::IntToBool),
        FieldDescriptor::timestamp("registered_at")
            .at("registered.unixtime")
            .transform(Transform::UnixTimestamp)
            .required(),
    ])
}

#[test]
fn test_map_full_record() {
    let raw = json!({
        "name": "alice",
        "country": "Iceland",
        "age": "33",
        "subscriber": "1",
        "registered": {"unixtime": "1577836800"},
    });

    let row = profile_schema().map("users", &raw).unwrap();

    assert_eq!(row["username"], json!("alice"));
    assert_eq!(row["country"], json!("Iceland"));
    assert_eq!(row["age"], json!(33));
    assert_eq!(row["subscriber"], json!(true));
    assert_eq!(row["registered_at"], json!("2020-01-01T00:00:00+00:00"));
}

#[test]
fn test_required_field_missing_is_fatal() {
    let raw = json!({
        "country": "Iceland",
        "registered": {"unixtime": "1577836800"},
    });

    let err = profile_schema().map("users", &raw).unwrap_err();
    match err {
        Error::Extraction {
            stream,
            field,
            path,
        } => {
            assert_eq!(stream, "users");
            assert_eq!(field, "username");
            assert_eq!(path, "name");
        }
        other => panic!("expected extraction error, got {other}"),
    }
}

#[test]
fn test_nullable_field_missing_yields_null() {
    let raw = json!({
        "name": "alice",
        "registered": {"unixtime": "1577836800"},
    });

    let row = profile_schema().map("users", &raw).unwrap();
    assert_eq!(row["country"], Value::Null);
    assert_eq!(row["age"], Value::Null);
}

#[test]
fn test_blank_to_null() {
    let raw = json!({
        "name": "alice",
        "country": "",
        "registered": {"unixtime": "1577836800"},
    });

    let row = profile_schema().map("users", &raw).unwrap();
    assert_eq!(row["country"], Value::Null);
}

#[test]
fn test_sentinel_to_null_short_circuits_chain() {
    // Age "0" means unset; the later StringToInt must not run on null
    let raw = json!({
        "name": "alice",
        "age": "0",
        "registered": {"unixtime": "1577836800"},
    });

    let row = profile_schema().map("users", &raw).unwrap();
    assert_eq!(row["age"], Value::Null);
}

#[test]
fn test_transform_failure_is_reported() {
    let raw = json!({
        "name": "alice",
        "age": "not-a-number",
        "registered": {"unixtime": "1577836800"},
    });

    let err = profile_schema().map("users", &raw).unwrap_err();
    assert!(matches!(err, Error::Transform { ref field, .. } if field == "age"));
}

#[test]
fn test_array_field_collects_matches_in_order() {
    let schema = Schema::new(vec![FieldDescriptor::array(
        "tags",
        FieldDescriptor::string("tag"),
    )
    .at("$.tags[*].name")]);

    let raw = json!({"tags": [{"name": "jazz"}, {"name": "bebop"}]});
    let row = schema.map("tracks", &raw).unwrap();
    assert_eq!(row["tags"], json!(["jazz", "bebop"]));
}

#[test]
fn test_array_field_zero_matches_is_empty_not_error() {
    // Empty even when the descriptor is marked required
    let schema = Schema::new(vec![FieldDescriptor::array(
        "tags",
        FieldDescriptor::string("tag"),
    )
    .at("$.tags[*].name")
    .required()]);

    let row = schema.map("tracks", &json!({})).unwrap();
    assert_eq!(row["tags"], json!([]));
}

#[test]
fn test_object_field_applies_nested_schema() {
    let schema = Schema::new(vec![FieldDescriptor::object(
        "image",
        Schema::new(vec![
            FieldDescriptor::string("small"),
            FieldDescriptor::string("large"),
        ]),
    )
    .transform(Transform::ArrayToKeyedObject {
        key_field: "size",
        value_field: "#text",
    })]);

    let raw = json!({
        "image": [
            {"size": "small", "#text": "http://img/s.png"},
            {"size": "large", "#text": "http://img/l.png"},
            {"size": "extralarge", "#text": "http://img/xl.png"},
        ]
    });

    let row = schema.map("users", &raw).unwrap();
    assert_eq!(
        row["image"],
        json!({"small": "http://img/s.png", "large": "http://img/l.png"})
    );
}

#[test]
fn test_object_field_missing_yields_null() {
    let schema = Schema::new(vec![FieldDescriptor::object(
        "image",
        Schema::new(vec![FieldDescriptor::string("small")]),
    )]);

    let row = schema.map("users", &json!({})).unwrap();
    assert_eq!(row["image"], Value::Null);
}

#[test_case(json!("1"), json!(true); "string one")]
#[test_case(json!("0"), json!(false); "string zero")]
#[test_case(json!(1), json!(true); "number one")]
#[test_case(json!(true), json!(true); "already bool")]
fn test_int_to_bool(input: Value, expected: Value) {
    assert_eq!(Transform::IntToBool.apply(input).unwrap(), expected);
}

#[test]
fn test_int_to_bool_rejects_other_values() {
    assert!(Transform::IntToBool.apply(json!("yes")).is_err());
    assert!(Transform::IntToBool.apply(json!(7)).is_err());
}

#[test]
fn test_unix_timestamp_transform() {
    let out = Transform::UnixTimestamp.apply(json!("1577836800")).unwrap();
    assert_eq!(out, json!("2020-01-01T00:00:00+00:00"));

    let out = Transform::UnixTimestamp.apply(json!(1_577_836_800)).unwrap();
    assert_eq!(out, json!("2020-01-01T00:00:00+00:00"));

    assert!(Transform::UnixTimestamp.apply(json!("soon")).is_err());
}

#[test]
fn test_transforms_skip_null_input() {
    assert_eq!(
        Transform::StringToInt.apply(Value::Null).unwrap(),
        Value::Null
    );
    assert_eq!(
        Transform::UnixTimestamp.apply(Value::Null).unwrap(),
        Value::Null
    );
}

#[test]
fn test_json_schema_shape() {
    let schema = profile_schema().json_schema();

    assert_eq!(schema["type"], json!("object"));
    assert_eq!(schema["properties"]["username"]["type"], json!("string"));
    assert_eq!(
        schema["properties"]["country"]["type"],
        json!(["string", "null"])
    );
    assert_eq!(
        schema["properties"]["age"]["type"],
        json!(["integer", "null"])
    );
    assert_eq!(
        schema["properties"]["registered_at"]["format"],
        json!("date-time")
    );
}
