//! The users stream: one profile row per configured username
//!
//! Full refresh over `user.getinfo`; each emitted row seeds a context
//! for the scrobbles child stream.

use super::{Context, StreamDefinition};
use crate::error::{Error, Result};
use crate::schema::{FieldDescriptor, Schema, Transform};
use crate::types::{JsonObject, SyncMode};
use chrono::DateTime;

/// Stream name
pub const NAME: &str = "users";

/// Build the users stream definition
pub fn definition() -> StreamDefinition {
    StreamDefinition {
        name: NAME,
        method: "user.getinfo",
        sync_mode: SyncMode::FullRefresh,
        primary_key: &["username"],
        replication_key: None,
        record_path: "user",
        total_pages_path: None,
        fixed_params: &[],
        partition_param: Some("user"),
        parent: None,
        schema: schema(),
    }
}

fn schema() -> Schema {
    Schema::new(vec![
        FieldDescriptor::string("username").at("name").required(),
        FieldDescriptor::string("realname").transform(Transform::BlankToNull),
        FieldDescriptor::string("url"),
        FieldDescriptor::string("country").transform(Transform::BlankToNull),
        // The API reports an unset age as "0"
        FieldDescriptor::integer("age")
            .transform(Transform::LiteralToNull("0"))
            .transform(Transform::StringToInt),
        // "n" means not specified
        FieldDescriptor::string("gender").transform(Transform::LiteralToNull("n")),
        FieldDescriptor::boolean("subscriber").transform(Transform::IntToBool),
        FieldDescriptor::integer("playcount").transform(Transform::StringToInt),
        FieldDescriptor::integer("playlists").transform(Transform::StringToInt),
        FieldDescriptor::boolean("bootstrap").transform(Transform::IntToBool),
        FieldDescriptor::timestamp("registered_at")
            .at("registered.unixtime")
            .transform(Transform::UnixTimestamp)
            .required(),
        image_field("image"),
    ])
}

/// Image URLs keyed by size, shared with the scrobbles stream
pub(super) fn image_field(name: &'static str) -> FieldDescriptor {
    FieldDescriptor::object(
        name,
        Schema::new(vec![
            FieldDescriptor::string("small").transform(Transform::BlankToNull),
            FieldDescriptor::string("medium").transform(Transform::BlankToNull),
            FieldDescriptor::string("large").transform(Transform::BlankToNull),
            FieldDescriptor::string("extralarge").transform(Transform::BlankToNull),
        ]),
    )
    .transform(Transform::ArrayToKeyedObject {
        key_field: "size",
        value_field: "#text",
    })
}

/// Derive the child-stream context from an emitted users row
pub fn context_from_row(row: &JsonObject) -> Result<Context> {
    let username = row
        .get("username")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::partition(NAME, "row is missing username"))?
        .to_string();

    let registered_at = row
        .get("registered_at")
        .and_then(|v| v.as_str())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|ts| ts.to_utc())
        .ok_or_else(|| Error::partition(NAME, format!("row for '{username}' has no usable registered_at")))?;

    Ok(Context {
        username,
        registered_at,
    })
}
