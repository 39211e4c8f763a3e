use apache_avro::types::Value as AvroValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use num_bigint::{BigInt, Sign};
use serde_json::{Map, Number, Value};
use std::collections::{BTreeMap, HashMap};

/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

const PRIMITIVES: [&str; 8] = [
    "null", "boolean", "int", "long", "float", "double", "bytes", "string",
];

/// Writer schema of one container file as JSON, with its named types indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct WriterSchema {
    root: Value,
    names: HashMap<String, Value>,
}

impl WriterSchema {
    pub fn new(schema: &apache_avro::Schema) -> serde_json::Result<Self> {
        Ok(Self::from_json(serde_json::to_value(schema)?))
    }

    pub fn from_json(root: Value) -> Self {
        let mut names = HashMap::new();
        register_names(&root, None, &mut names);
        Self { root, names }
    }

    pub fn root(&self) -> SchemaNode<'_> {
        SchemaNode {
            schema: self,
            node: &self.root,
        }
    }

    fn lookup(&self, name: &str) -> Option<&Value> {
        self.names.get(name).or_else(|| {
            let short = name.rsplit('.').next()?;
            self.names.get(short)
        })
    }
}

/// Index record, enum and fixed definitions by full and short name.
fn register_names(node: &Value, namespace: Option<&str>, names: &mut HashMap<String, Value>) {
    match node {
        Value::Array(branches) => {
            for branch in branches {
                register_names(branch, namespace, names);
            }
        }
        Value::Object(obj) => {
            let mut namespace = namespace.map(str::to_string);
            let is_named = matches!(
                obj.get("type").and_then(Value::as_str),
                Some("record" | "error" | "enum" | "fixed")
            );
            if let Some(name) = obj.get("name").and_then(Value::as_str).filter(|_| is_named) {
                if let Some(ns) = obj.get("namespace").and_then(Value::as_str) {
                    namespace = Some(ns.to_string());
                }
                let fullname = match &namespace {
                    Some(ns) if !ns.is_empty() && !name.contains('.') => format!("{ns}.{name}"),
                    _ => name.to_string(),
                };
                let short = fullname.rsplit('.').next().unwrap_or(name).to_string();
                names.insert(fullname, node.clone());
                names.entry(short).or_insert_with(|| node.clone());
            }
            for key in ["type", "items", "values"] {
                if let Some(child) = obj.get(key) {
                    register_names(child, namespace.as_deref(), names);
                }
            }
            if let Some(fields) = obj.get("fields").and_then(Value::as_array) {
                for field in fields {
                    if let Some(child) = field.get("type") {
                        register_names(child, namespace.as_deref(), names);
                    }
                }
            }
        }
        _ => {}
    }
}

/// A position inside a [`WriterSchema`], following the shape of a value.
#[derive(Debug, Clone, Copy)]
pub struct SchemaNode<'a> {
    schema: &'a WriterSchema,
    node: &'a Value,
}

impl<'a> SchemaNode<'a> {
    fn at(self, node: &'a Value) -> Self {
        Self {
            schema: self.schema,
            node,
        }
    }

    /// Follow named-type references and nested `{"type": {...}}` wrappers.
    fn resolve(self) -> Self {
        match self.node {
            Value::String(name) if !PRIMITIVES.contains(&name.as_str()) => {
                match self.schema.lookup(name) {
                    Some(named) => self.at(named),
                    None => self,
                }
            }
            Value::Object(obj) => match obj.get("type") {
                Some(inner @ (Value::Object(_) | Value::Array(_))) => self.at(inner).resolve(),
                _ => self,
            },
            _ => self,
        }
    }

    pub fn field(self, name: &str) -> Option<Self> {
        let resolved = self.resolve();
        resolved
            .node
            .get("fields")?
            .as_array()?
            .iter()
            .find(|f| f.get("name").and_then(Value::as_str) == Some(name))?
            .get("type")
            .map(|t| resolved.at(t))
    }

    pub fn branch(self, index: u32) -> Option<Self> {
        let resolved = self.resolve();
        let branch = resolved.node.as_array()?.get(usize::try_from(index).ok()?)?;
        Some(resolved.at(branch))
    }

    pub fn items(self) -> Option<Self> {
        let resolved = self.resolve();
        resolved.node.get("items").map(|t| resolved.at(t))
    }

    pub fn values(self) -> Option<Self> {
        let resolved = self.resolve();
        resolved.node.get("values").map(|t| resolved.at(t))
    }

    /// Scale of a `decimal` logical type (0 when unset).
    pub fn decimal_scale(self) -> Option<u32> {
        let node = self.resolve().node;
        if node.get("logicalType").and_then(Value::as_str) != Some("decimal") {
            return None;
        }
        let scale = node.get("scale").and_then(Value::as_u64).unwrap_or(0);
        u32::try_from(scale).ok()
    }
}

/// Convert a decoded Avro value into a JSON value.
///
/// JSON-native values map directly. Everything else is coerced to a
/// string: bytes as (lossy) UTF-8 text, logical date/time types as ISO-like
/// text, decimals as plain numbers, non-finite floats by name, and any
/// remaining type by its `Debug` rendering.
///
/// Without a schema the scale of `decimal` values is unknown and taken as 0;
/// use [`avro_to_json_value_with_schema`] for decoded file data.
pub fn avro_to_json_value(value: &AvroValue) -> Value {
    coerce(value, None)
}

/// Like [`avro_to_json_value`], reading decimal scales from `schema`.
pub fn avro_to_json_value_with_schema(value: &AvroValue, schema: SchemaNode<'_>) -> Value {
    coerce(value, Some(schema))
}

pub(crate) fn coerce(value: &AvroValue, schema: Option<SchemaNode<'_>>) -> Value {
    match value {
        AvroValue::Null => Value::Null,
        AvroValue::Boolean(b) => Value::Bool(*b),
        AvroValue::Int(n) => Value::from(*n),
        AvroValue::Long(n) => Value::from(*n),
        AvroValue::Float(x) => float_value(f64::from(*x)),
        AvroValue::Double(x) => float_value(*x),
        AvroValue::String(s) | AvroValue::Enum(_, s) => Value::String(s.clone()),
        AvroValue::Bytes(b) | AvroValue::Fixed(_, b) => {
            Value::String(String::from_utf8_lossy(b).into_owned())
        }
        AvroValue::Union(index, inner) => coerce(inner, schema.and_then(|s| s.branch(*index))),
        AvroValue::Array(items) => {
            let item_schema = schema.and_then(SchemaNode::items);
            Value::Array(items.iter().map(|v| coerce(v, item_schema)).collect())
        }
        AvroValue::Record(fields) => Value::Object(
            fields
                .iter()
                .map(|(name, v)| (name.clone(), coerce(v, schema.and_then(|s| s.field(name)))))
                .collect::<Map<_, _>>(),
        ),
        // Avro maps are unordered; sort so output is stable between runs.
        AvroValue::Map(entries) => {
            let value_schema = schema.and_then(SchemaNode::values);
            Value::Object(
                entries
                    .iter()
                    .collect::<BTreeMap<_, _>>()
                    .into_iter()
                    .map(|(k, v)| (k.clone(), coerce(v, value_schema)))
                    .collect::<Map<_, _>>(),
            )
        }
        AvroValue::Decimal(decimal) => match Vec::<u8>::try_from(decimal) {
            Ok(bytes) => {
                let scale = schema.and_then(SchemaNode::decimal_scale).unwrap_or(0);
                Value::String(decimal_string(&BigInt::from_signed_bytes_be(&bytes), scale))
            }
            Err(_) => debug_value(value),
        },
        AvroValue::BigDecimal(decimal) => Value::String(decimal.to_string()),
        AvroValue::Date(days) => date_string(*days).map_or_else(|| debug_value(value), Value::String),
        AvroValue::TimeMillis(ms) => {
            time_string(i64::from(*ms) * 1_000).map_or_else(|| debug_value(value), Value::String)
        }
        AvroValue::TimeMicros(us) => {
            time_string(*us).map_or_else(|| debug_value(value), Value::String)
        }
        AvroValue::TimestampMillis(ms) => timestamp_string(ms.checked_mul(1_000), "+00:00")
            .map_or_else(|| debug_value(value), Value::String),
        AvroValue::TimestampMicros(us) => timestamp_string(Some(*us), "+00:00")
            .map_or_else(|| debug_value(value), Value::String),
        AvroValue::LocalTimestampMillis(ms) => timestamp_string(ms.checked_mul(1_000), "")
            .map_or_else(|| debug_value(value), Value::String),
        AvroValue::LocalTimestampMicros(us) => timestamp_string(Some(*us), "")
            .map_or_else(|| debug_value(value), Value::String),
        AvroValue::Uuid(uuid) => Value::String(uuid.to_string()),
        other => debug_value(other),
    }
}

fn float_value(x: f64) -> Value {
    match Number::from_f64(x) {
        Some(n) => Value::Number(n),
        None if x.is_nan() => Value::String("NaN".to_string()),
        None if x > 0.0 => Value::String("Infinity".to_string()),
        None => Value::String("-Infinity".to_string()),
    }
}

fn debug_value(value: &AvroValue) -> Value {
    Value::String(format!("{value:?}"))
}

/// Render `unscaled * 10^-scale` the way a decimal's `str()` does: plain
/// notation while the adjusted exponent is at least -6, scientific below.
pub fn decimal_string(unscaled: &BigInt, scale: u32) -> String {
    let sign = if unscaled.sign() == Sign::Minus { "-" } else { "" };
    let digits = unscaled.magnitude().to_string();
    let scale = scale as usize;
    let adjusted = digits.len() as i64 - 1 - scale as i64;

    if adjusted < -6 {
        let (head, tail) = digits.split_at(1);
        return if tail.is_empty() {
            format!("{sign}{head}E{adjusted:+}")
        } else {
            format!("{sign}{head}.{tail}E{adjusted:+}")
        };
    }
    if scale == 0 {
        format!("{sign}{digits}")
    } else if digits.len() > scale {
        let (int, frac) = digits.split_at(digits.len() - scale);
        format!("{sign}{int}.{frac}")
    } else {
        format!("{sign}0.{}{digits}", "0".repeat(scale - digits.len()))
    }
}

/// Microsecond fraction, omitted entirely when zero.
fn fraction(nanos: u32) -> String {
    if nanos == 0 {
        String::new()
    } else {
        format!(".{:06}", nanos / 1_000)
    }
}

fn date_string(days_since_epoch: i32) -> Option<String> {
    let days = days_since_epoch.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?;
    NaiveDate::from_num_days_from_ce_opt(days).map(|d| d.format("%Y-%m-%d").to_string())
}

fn time_string(micros_since_midnight: i64) -> Option<String> {
    let secs = u32::try_from(micros_since_midnight.div_euclid(1_000_000)).ok()?;
    let nanos = u32::try_from(micros_since_midnight.rem_euclid(1_000_000) * 1_000).ok()?;
    let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)?;
    Some(format!("{}{}", time.format("%H:%M:%S"), fraction(time.nanosecond())))
}

fn timestamp_string(micros_since_epoch: Option<i64>, offset: &str) -> Option<String> {
    let us = micros_since_epoch?;
    let nanos = u32::try_from(us.rem_euclid(1_000_000) * 1_000).ok()?;
    let dt: NaiveDateTime = DateTime::from_timestamp(us.div_euclid(1_000_000), nanos)?.naive_utc();
    Some(format!(
        "{}{}{offset}",
        dt.format("%Y-%m-%d %H:%M:%S"),
        fraction(dt.nanosecond())
    ))
}
