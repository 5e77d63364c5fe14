//! Field descriptor and transform types
//!
//! Descriptors are immutable once constructed and owned by the schema
//! that declares them.

use super::mapper::Schema;
use chrono::DateTime;
use serde_json::Value;

/// Declared type of a mapped field
#[derive(Debug, Clone)]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Integer,
    /// Boolean
    Boolean,
    /// RFC 3339 timestamp (UTC)
    Timestamp,
    /// Nested object mapped through its own schema
    Object(Schema),
    /// Ordered sequence, one element per path match
    Array(Box<FieldDescriptor>),
}

/// Policy when a field's path resolves to no value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingValuePolicy {
    /// Absence yields null
    #[default]
    Nullable,
    /// Extraction failure is fatal
    Required,
}

/// A pure, single-argument transform over a matched raw value.
///
/// Transforms are applied in declaration order; a null result
/// short-circuits the rest of the chain. A transform is never invoked on
/// a value that failed extraction.
#[derive(Debug, Clone)]
pub enum Transform {
    /// Empty string becomes null
    BlankToNull,
    /// A specific sentinel string becomes null (e.g. age "0", gender "n")
    LiteralToNull(&'static str),
    /// Stringified integer becomes an integer
    StringToInt,
    /// 0/1 (string or number) becomes a boolean
    IntToBool,
    /// Unix-seconds value (string or number) becomes an RFC 3339 timestamp
    UnixTimestamp,
    /// Fold an array of objects into a map keyed by one field's value,
    /// taking another field as the entry value. Used for the API's
    /// `[{"size": "small", "#text": "..."}]` image lists. An array that
    /// yields no entries becomes null.
    ArrayToKeyedObject {
        key_field: &'static str,
        value_field: &'static str,
    },
}

impl Transform {
    /// Apply the transform to a raw value
    pub fn apply(&self, value: Value) -> Result<Value, String> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        match self {
            Transform::BlankToNull => match value {
                Value::String(s) if s.is_empty() => Ok(Value::Null),
                other => Ok(other),
            },
            Transform::LiteralToNull(literal) => match value {
                Value::String(ref s) if s == literal => Ok(Value::Null),
                other => Ok(other),
            },
            Transform::StringToInt => match value {
                Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Value::Number(n)),
                Value::String(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(Value::from)
                    .map_err(|e| format!("cannot parse '{s}' as integer: {e}")),
                other => Err(format!("cannot convert {other} to integer")),
            },
            Transform::IntToBool => match value {
                Value::Bool(b) => Ok(Value::Bool(b)),
                Value::Number(n) => match n.as_i64() {
                    Some(0) => Ok(Value::Bool(false)),
                    Some(1) => Ok(Value::Bool(true)),
                    _ => Err(format!("cannot convert {n} to boolean")),
                },
                Value::String(s) => match s.as_str() {
                    "0" => Ok(Value::Bool(false)),
                    "1" => Ok(Value::Bool(true)),
                    _ => Err(format!("cannot convert '{s}' to boolean")),
                },
                other => Err(format!("cannot convert {other} to boolean")),
            },
            Transform::UnixTimestamp => {
                let seconds = match &value {
                    Value::Number(n) => n.as_i64(),
                    Value::String(s) => s.trim().parse::<i64>().ok(),
                    _ => None,
                };
                let Some(seconds) = seconds else {
                    return Err(format!("cannot interpret {value} as unix seconds"));
                };
                let Some(ts) = DateTime::from_timestamp(seconds, 0) else {
                    return Err(format!("unix seconds {seconds} out of range"));
                };
                Ok(Value::String(ts.to_rfc3339()))
            }
            Transform::ArrayToKeyedObject {
                key_field,
                value_field,
            } => match value {
                Value::Array(items) => {
                    let mut map = serde_json::Map::new();
                    for item in items {
                        let Some(key) = item.get(*key_field).and_then(Value::as_str) else {
                            continue;
                        };
                        let entry = item.get(*value_field).cloned().unwrap_or(Value::Null);
                        map.insert(key.to_string(), entry);
                    }
                    if map.is_empty() {
                        Ok(Value::Null)
                    } else {
                        Ok(Value::Object(map))
                    }
                }
                other => Err(format!("expected array, got {other}")),
            },
        }
    }
}

/// A named, typed field with an extraction path, optional transforms,
/// and a missing-value policy
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Field name, unique within its schema
    pub name: String,
    /// Declared type
    pub field_type: FieldType,
    /// Extraction path into the raw document (defaults to the name)
    pub path: String,
    /// Transform chain, applied in order
    pub transforms: Vec<Transform>,
    /// Missing-value policy
    pub policy: MissingValuePolicy,
}

impl FieldDescriptor {
    fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            path: name.clone(),
            name,
            field_type,
            transforms: Vec::new(),
            policy: MissingValuePolicy::Nullable,
        }
    }

    /// A string field
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    /// An integer field
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Integer)
    }

    /// A boolean field
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    /// A timestamp field
    pub fn timestamp(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Timestamp)
    }

    /// An object field mapped through a nested schema
    pub fn object(name: impl Into<String>, schema: Schema) -> Self {
        Self::new(name, FieldType::Object(schema))
    }

    /// An array field, one element per path match
    pub fn array(name: impl Into<String>, element: FieldDescriptor) -> Self {
        Self::new(name, FieldType::Array(Box::new(element)))
    }

    /// Override the extraction path
    #[must_use]
    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Append a transform to the chain
    #[must_use]
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transforms.push(transform);
        self
    }

    /// Mark the field required
    #[must_use]
    pub fn required(mut self) -> Self {
        self.policy = MissingValuePolicy::Required;
        self
    }

    /// Apply the full transform chain to a raw value
    pub(super) fn apply_transforms(&self, mut value: Value) -> Result<Value, String> {
        for transform in &self.transforms {
            value = transform.apply(value)?;
            if value.is_null() {
                break;
            }
        }
        Ok(value)
    }
}

/// Coerce a transformed value into the declared scalar type
pub(super) fn coerce(value: Value, field_type: &FieldType) -> Result<Value, String> {
    if value.is_null() {
        return Ok(Value::Null);
    }

    match field_type {
        FieldType::String => match value {
            Value::String(s) => Ok(Value::String(s)),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            other => Err(format!("expected string, got {other}")),
        },
        FieldType::Integer => match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Value::Number(n)),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|e| format!("cannot parse '{s}' as integer: {e}")),
            other => Err(format!("expected integer, got {other}")),
        },
        FieldType::Boolean => match value {
            Value::Bool(b) => Ok(Value::Bool(b)),
            other => Err(format!("expected boolean, got {other}")),
        },
        FieldType::Timestamp => match value {
            Value::String(s) => DateTime::parse_from_rfc3339(&s)
                .map(|_| Value::String(s))
                .map_err(|e| format!("invalid timestamp: {e}")),
            Value::Number(n) => {
                let Some(seconds) = n.as_i64() else {
                    return Err(format!("invalid unix seconds {n}"));
                };
                DateTime::from_timestamp(seconds, 0)
                    .map(|ts| Value::String(ts.to_rfc3339()))
                    .ok_or_else(|| format!("unix seconds {seconds} out of range"))
            }
            other => Err(format!("expected timestamp, got {other}")),
        },
        // Composite types are handled by the mapper, not coercion
        FieldType::Object(_) | FieldType::Array(_) => Ok(value),
    }
}
