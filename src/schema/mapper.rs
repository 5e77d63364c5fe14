//! Schema application: raw record -> typed row

use super::path;
use super::types::{coerce, FieldDescriptor, FieldType, MissingValuePolicy};
use crate::error::{Error, Result};
use crate::types::JsonObject;
use serde_json::{json, Value};

/// An ordered set of field descriptors, one per stream
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Build a schema from an ordered list of descriptors
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }

    /// The declared fields, in order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Map one raw JSON record into one typed row.
    ///
    /// `stream` only labels errors; mapping itself is a pure function of
    /// the schema and the record.
    pub fn map(&self, stream: &str, raw: &Value) -> Result<JsonObject> {
        let mut row = JsonObject::new();
        for field in &self.fields {
            let value = self.map_field(stream, field, raw)?;
            row.insert(field.name.clone(), value);
        }
        Ok(row)
    }

    fn map_field(&self, stream: &str, field: &FieldDescriptor, raw: &Value) -> Result<Value> {
        // Array fields collect every match; zero matches is an empty
        // sequence regardless of policy.
        if let FieldType::Array(element) = &field.field_type {
            let mut items = Vec::new();
            for matched in path::select(raw, &field.path) {
                let transformed = element
                    .apply_transforms(matched)
                    .map_err(|message| Error::transform(&field.name, message))?;
                let coerced = coerce(transformed, &element.field_type)
                    .map_err(|message| Error::transform(&field.name, message))?;
                items.push(coerced);
            }
            return Ok(Value::Array(items));
        }

        let Some(matched) = path::select_first(raw, &field.path) else {
            return match field.policy {
                MissingValuePolicy::Nullable => Ok(Value::Null),
                MissingValuePolicy::Required => {
                    Err(Error::extraction(stream, &field.name, &field.path))
                }
            };
        };

        let transformed = field
            .apply_transforms(matched)
            .map_err(|message| Error::transform(&field.name, message))?;

        if let FieldType::Object(nested) = &field.field_type {
            if transformed.is_null() {
                return match field.policy {
                    MissingValuePolicy::Nullable => Ok(Value::Null),
                    MissingValuePolicy::Required => {
                        Err(Error::extraction(stream, &field.name, &field.path))
                    }
                };
            }
            let sub_row = nested.map(stream, &transformed)?;
            return Ok(Value::Object(sub_row));
        }

        coerce(transformed, &field.field_type)
            .map_err(|message| Error::transform(&field.name, message))
    }

    /// JSON-Schema-equivalent shape description for downstream consumers
    pub fn json_schema(&self) -> Value {
        let mut properties = JsonObject::new();
        for field in &self.fields {
            properties.insert(field.name.clone(), field_schema(field));
        }
        json!({
            "type": "object",
            "properties": Value::Object(properties),
        })
    }
}

fn field_schema(field: &FieldDescriptor) -> Value {
    let nullable = field.policy == MissingValuePolicy::Nullable;
    match &field.field_type {
        FieldType::String => scalar_schema("string", None, nullable),
        FieldType::Integer => scalar_schema("integer", None, nullable),
        FieldType::Boolean => scalar_schema("boolean", None, nullable),
        FieldType::Timestamp => scalar_schema("string", Some("date-time"), nullable),
        FieldType::Object(nested) => {
            let mut schema = nested.json_schema();
            if nullable {
                schema["type"] = json!(["object", "null"]);
            }
            schema
        }
        FieldType::Array(element) => json!({
            "type": "array",
            "items": field_schema(element),
        }),
    }
}

fn scalar_schema(type_name: &str, format: Option<&str>, nullable: bool) -> Value {
    let type_value = if nullable {
        json!([type_name, "null"])
    } else {
        json!(type_name)
    };
    match format {
        Some(format) => json!({"type": type_value, "format": format}),
        None => json!({"type": type_value}),
    }
}
