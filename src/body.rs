use apache_avro::types::Value as AvroValue;
use serde_json::Value;
use std::string::FromUtf8Error;

use crate::error::{Error, Result};
use crate::reader::DecodedRecord;
use crate::value::{coerce, SchemaNode};

/// Name of the envelope field whose payload replaces the record.
pub const BODY_FIELD: &str = "Body";

/// A `Body` that could not be turned into text.
#[derive(thiserror::Error, Debug)]
#[error("Body is not valid UTF-8: {0}")]
pub struct BodyError(#[from] FromUtf8Error);

/// Look up the `Body` field of a record-like value.
///
/// Records and maps count as mappings; a union is unwrapped to its branch
/// first. Any other value has no fields.
pub fn body_of(record: &AvroValue) -> Option<&AvroValue> {
    locate_body(record, None).map(|(body, _)| body)
}

fn locate_body<'v, 's>(
    record: &'v AvroValue,
    schema: Option<SchemaNode<'s>>,
) -> Option<(&'v AvroValue, Option<SchemaNode<'s>>)> {
    match record {
        AvroValue::Record(fields) => fields
            .iter()
            .find(|(name, _)| name == BODY_FIELD)
            .map(|(_, value)| (value, schema.and_then(|s| s.field(BODY_FIELD)))),
        AvroValue::Map(entries) => entries
            .get(BODY_FIELD)
            .map(|value| (value, schema.and_then(SchemaNode::values))),
        AvroValue::Union(index, inner) => locate_body(inner, schema.and_then(|s| s.branch(*index))),
        _ => None,
    }
}

fn unwrap_union<'v, 's>(
    value: &'v AvroValue,
    schema: Option<SchemaNode<'s>>,
) -> (&'v AvroValue, Option<SchemaNode<'s>>) {
    match value {
        AvroValue::Union(index, inner) => unwrap_union(inner, schema.and_then(|s| s.branch(*index))),
        other => (other, schema),
    }
}

/// Append the output items produced by one record to `out`.
///
/// - no `Body`: the whole record, coerced to JSON
/// - bytes `Body`: decoded as UTF-8, then handled like a string
/// - string `Body`: parsed as JSON; a list is spliced in element by element,
///   any other JSON value is appended once, unparseable text is appended raw
/// - any other `Body`: the coerced value
///
/// `schema` is the writer schema of the record, used for decimal scales.
/// Only a bytes `Body` that is not valid UTF-8 fails.
pub fn extract_body(
    record: &AvroValue,
    schema: Option<SchemaNode<'_>>,
    out: &mut Vec<Value>,
) -> Result<(), BodyError> {
    let Some((body, body_schema)) = locate_body(record, schema) else {
        out.push(coerce(record, schema));
        return Ok(());
    };

    let text = match unwrap_union(body, body_schema) {
        (AvroValue::String(s) | AvroValue::Enum(_, s), _) => s.clone(),
        (AvroValue::Bytes(b) | AvroValue::Fixed(_, b), _) => String::from_utf8(b.clone())?,
        (other, other_schema) => {
            out.push(coerce(other, other_schema));
            return Ok(());
        }
    };

    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Array(items)) => out.extend(items),
        Ok(parsed) => out.push(parsed),
        Err(_) => out.push(Value::String(text)),
    }
    Ok(())
}

/// Build the output collection for every record, in order.
#[cfg_attr(feature = "trace", tracing::instrument(skip_all, fields(records = records.len())))]
pub fn extract_bodies(records: &[DecodedRecord]) -> Result<Vec<Value>> {
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        extract_body(&record.value, Some(record.schema.root()), &mut out).map_err(|source| {
            Error::BodyEncoding {
                path: record.source.to_path_buf(),
                index: record.index,
                source,
            }
        })?;
    }
    Ok(out)
}
