#![allow(dead_code)]
use apache_avro::types::Value;
use apache_avro::{Schema, Writer};
use std::fs;
use std::path::{Path, PathBuf};

pub const STRING_BODY_SCHEMA: &str = r#"{
    "type": "record",
    "name": "Envelope",
    "fields": [{"name": "Body", "type": "string"}]
}"#;

pub const BYTES_BODY_SCHEMA: &str = r#"{
    "type": "record",
    "name": "Envelope",
    "fields": [
        {"name": "MessageId", "type": "string"},
        {"name": "Body", "type": "bytes"}
    ]
}"#;

pub const OPTIONAL_BODY_SCHEMA: &str = r#"{
    "type": "record",
    "name": "Envelope",
    "fields": [{"name": "Body", "type": ["null", "string"]}]
}"#;

pub const EVENT_SCHEMA: &str = r#"{
    "type": "record",
    "name": "Event",
    "fields": [
        {"name": "id", "type": "long"},
        {"name": "name", "type": "string"},
        {"name": "active", "type": "boolean"}
    ]
}"#;

/// Write `records` as an Avro object container file at `dir/name`.
pub fn write_avro(dir: &Path, name: &str, schema: &str, records: Vec<Value>) -> PathBuf {
    let schema = Schema::parse_str(schema).unwrap();
    let mut writer = Writer::new(&schema, Vec::new());
    for record in records {
        writer.append(record).unwrap();
    }
    let path = dir.join(name);
    fs::write(&path, writer.into_inner().unwrap()).unwrap();
    path
}

pub fn string_body(body: &str) -> Value {
    Value::Record(vec![("Body".to_string(), Value::String(body.to_string()))])
}

pub fn bytes_body(id: &str, body: &[u8]) -> Value {
    Value::Record(vec![
        ("MessageId".to_string(), Value::String(id.to_string())),
        ("Body".to_string(), Value::Bytes(body.to_vec())),
    ])
}

pub fn optional_body(body: Option<&str>) -> Value {
    let inner = match body {
        Some(s) => Value::Union(1, Box::new(Value::String(s.to_string()))),
        None => Value::Union(0, Box::new(Value::Null)),
    };
    Value::Record(vec![("Body".to_string(), inner)])
}

pub fn event(id: i64, name: &str, active: bool) -> Value {
    Value::Record(vec![
        ("id".to_string(), Value::Long(id)),
        ("name".to_string(), Value::String(name.to_string())),
        ("active".to_string(), Value::Boolean(active)),
    ])
}

/// Write one single-record file holding `{"Body": body}`.
pub fn string_body_file(dir: &Path, name: &str, body: &str) -> PathBuf {
    write_avro(dir, name, STRING_BODY_SCHEMA, vec![string_body(body)])
}
