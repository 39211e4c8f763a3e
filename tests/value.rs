use apache_avro::types::Value as AvroValue;
use avro2json::body::{body_of, extract_body};
use avro2json::value::{
    avro_to_json_value, avro_to_json_value_with_schema, decimal_string, WriterSchema,
};
use num_bigint::BigInt;
use rstest::rstest;
use serde_json::{json, Value};
use std::collections::HashMap;

#[rstest]
#[case::null(AvroValue::Null, json!(null))]
#[case::int(AvroValue::Int(-3), json!(-3))]
#[case::long(AvroValue::Long(1 << 40), json!(1_099_511_627_776_i64))]
#[case::float(AvroValue::Float(0.5), json!(0.5))]
#[case::double(AvroValue::Double(2.25), json!(2.25))]
#[case::enum_symbol(AvroValue::Enum(1, "GREEN".into()), json!("GREEN"))]
#[case::bytes(AvroValue::Bytes(b"raw".to_vec()), json!("raw"))]
#[case::fixed(AvroValue::Fixed(2, b"ok".to_vec()), json!("ok"))]
#[case::invalid_utf8_bytes(AvroValue::Bytes(vec![b'a', 0xff]), json!("a\u{fffd}"))]
#[case::union(AvroValue::Union(1, Box::new(AvroValue::Boolean(true))), json!(true))]
#[case::date(AvroValue::Date(19_723), json!("2024-01-01"))]
#[case::pre_epoch_date(AvroValue::Date(-1), json!("1969-12-31"))]
#[case::time_millis(AvroValue::TimeMillis(45_296_789), json!("12:34:56.789000"))]
#[case::time_micros_whole(AvroValue::TimeMicros(3_600_000_000), json!("01:00:00"))]
#[case::timestamp_millis(
    AvroValue::TimestampMillis(1_704_067_200_123),
    json!("2024-01-01 00:00:00.123000+00:00")
)]
#[case::timestamp_micros(
    AvroValue::TimestampMicros(1_704_067_200_000_000),
    json!("2024-01-01 00:00:00+00:00")
)]
#[case::local_timestamp(
    AvroValue::LocalTimestampMillis(1_704_067_200_000),
    json!("2024-01-01 00:00:00")
)]
fn scalar_coercion(#[case] value: AvroValue, #[case] expected: Value) {
    assert_eq!(avro_to_json_value(&value), expected);
}

#[rstest]
#[case(f64::NAN, "NaN")]
#[case(f64::INFINITY, "Infinity")]
#[case(f64::NEG_INFINITY, "-Infinity")]
fn non_finite_floats_become_strings(#[case] x: f64, #[case] expected: &str) {
    assert_eq!(avro_to_json_value(&AvroValue::Double(x)), json!(expected));
}

#[test]
fn map_keys_are_sorted() {
    let map = AvroValue::Map(HashMap::from([
        ("zeta".to_string(), AvroValue::Int(1)),
        ("alpha".to_string(), AvroValue::Int(2)),
        ("mid".to_string(), AvroValue::Int(3)),
    ]));

    let out = serde_json::to_string(&avro_to_json_value(&map)).unwrap();
    assert_eq!(out, r#"{"alpha":2,"mid":3,"zeta":1}"#);
}

#[test]
fn nested_records_and_arrays_are_converted() {
    let value = AvroValue::Record(vec![
        ("id".into(), AvroValue::Long(1)),
        (
            "tags".into(),
            AvroValue::Array(vec![AvroValue::String("a".into()), AvroValue::String("b".into())]),
        ),
        (
            "inner".into(),
            AvroValue::Record(vec![("payload".into(), AvroValue::Bytes(b"xyz".to_vec()))]),
        ),
    ]);

    assert_eq!(
        avro_to_json_value(&value),
        json!({"id": 1, "tags": ["a", "b"], "inner": {"payload": "xyz"}})
    );
}

#[test]
fn map_records_expose_body() {
    let map = AvroValue::Map(HashMap::from([(
        "Body".to_string(),
        AvroValue::String(r#"{"from": "map"}"#.into()),
    )]));

    let mut out = Vec::new();
    extract_body(&map, None, &mut out).unwrap();
    assert_eq!(out, vec![json!({"from": "map"})]);
}

#[test]
fn body_lookup_is_case_sensitive() {
    let record = AvroValue::Record(vec![("body".into(), AvroValue::String("[1]".into()))]);
    assert!(body_of(&record).is_none());

    let mut out = Vec::new();
    extract_body(&record, None, &mut out).unwrap();
    assert_eq!(out, vec![json!({"body": "[1]"})]);
}

#[test]
fn non_mapping_records_pass_through() {
    let mut out = Vec::new();
    extract_body(&AvroValue::String(r#"{"x": 1}"#.into()), None, &mut out).unwrap();
    assert_eq!(out, vec![json!(r#"{"x": 1}"#)]);
}

#[test]
fn top_level_union_record_is_searched() {
    let record = AvroValue::Union(
        0,
        Box::new(AvroValue::Record(vec![(
            "Body".into(),
            AvroValue::Bytes(b"[1, 2]".to_vec()),
        )])),
    );

    let mut out = Vec::new();
    extract_body(&record, None, &mut out).unwrap();
    assert_eq!(out, vec![json!(1), json!(2)]);
}

#[rstest]
#[case::two_places(1234, 2, "12.34")]
#[case::leading_zeros(5, 2, "0.05")]
#[case::negative(-5, 2, "-0.05")]
#[case::integral(1234, 0, "1234")]
#[case::zero_keeps_scale(0, 2, "0.00")]
#[case::small_switches_to_exponent(1, 10, "1E-10")]
#[case::small_with_mantissa(12, 9, "1.2E-8")]
#[case::smallest_plain(1, 6, "0.000001")]
fn decimal_rendering(#[case] unscaled: i64, #[case] scale: u32, #[case] expected: &str) {
    assert_eq!(decimal_string(&BigInt::from(unscaled), scale), expected);
}

#[test]
fn decimal_scale_is_read_from_schema() {
    let schema = WriterSchema::from_json(json!({
        "type": "record",
        "name": "Payment",
        "namespace": "billing",
        "fields": [
            {"name": "amount", "type": {"type": "bytes", "logicalType": "decimal", "precision": 10, "scale": 2}},
            {"name": "fee", "type": ["null", {"type": "fixed", "name": "Fee", "size": 4, "logicalType": "decimal", "precision": 8, "scale": 3}]},
            {"name": "refund", "type": ["null", "Fee"]}
        ]
    }));
    let value = AvroValue::Record(vec![
        ("amount".into(), AvroValue::Decimal(apache_avro::Decimal::from(vec![0x04, 0xd2]))),
        (
            "fee".into(),
            AvroValue::Union(
                1,
                Box::new(AvroValue::Decimal(apache_avro::Decimal::from(vec![0, 0, 0, 0x2a]))),
            ),
        ),
        (
            "refund".into(),
            AvroValue::Union(
                1,
                Box::new(AvroValue::Decimal(apache_avro::Decimal::from(vec![0xff, 0xff, 0xff, 0xfb]))),
            ),
        ),
    ]);

    assert_eq!(
        avro_to_json_value_with_schema(&value, schema.root()),
        json!({"amount": "12.34", "fee": "0.042", "refund": "-0.005"})
    );
}

#[test]
fn decimal_without_schema_is_unscaled() {
    let value = AvroValue::Decimal(apache_avro::Decimal::from(vec![0x04, 0xd2]));
    assert_eq!(avro_to_json_value(&value), json!("1234"));
}

#[test]
fn decimal_body_is_kept_as_number_text() {
    let schema = WriterSchema::from_json(json!({
        "type": "record",
        "name": "Envelope",
        "fields": [{"name": "Body", "type": {"type": "bytes", "logicalType": "decimal", "precision": 6, "scale": 1}}]
    }));
    let record = AvroValue::Record(vec![(
        "Body".into(),
        AvroValue::Decimal(apache_avro::Decimal::from(vec![0x7b])),
    )]);

    let mut out = Vec::new();
    extract_body(&record, Some(schema.root()), &mut out).unwrap();
    assert_eq!(out, vec![json!("12.3")]);
}
