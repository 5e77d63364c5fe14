//! Stream definitions
//!
//! A stream is one logical entity type extracted from the API. Each
//! definition binds a method discriminator, a typed schema, a
//! record-extraction path, and pagination metadata.

pub mod scrobbles;
pub mod users;

use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::types::{JsonObject, JsonValue, SyncMode};
use chrono::{DateTime, Utc};
use serde_json::json;

/// Declarative definition of one stream
#[derive(Debug, Clone)]
pub struct StreamDefinition {
    /// Stream name
    pub name: &'static str,
    /// API method discriminator (`method` query parameter)
    pub method: &'static str,
    /// Synchronization mode
    pub sync_mode: SyncMode,
    /// Primary-key field list (upsert identity at the destination)
    pub primary_key: &'static [&'static str],
    /// Field used for incremental ordering, if any
    pub replication_key: Option<&'static str>,
    /// Path selecting the raw records within one page's response body
    pub record_path: &'static str,
    /// Path to the per-page total-page count, for index-paginated streams
    pub total_pages_path: Option<&'static str>,
    /// Fixed per-stream query parameters
    pub fixed_params: &'static [(&'static str, &'static str)],
    /// Query parameter carrying the partition identity (e.g. `user`)
    pub partition_param: Option<&'static str>,
    /// Parent stream name, if this stream consumes a parent context
    pub parent: Option<&'static str>,
    /// Field schema
    pub schema: Schema,
}

impl StreamDefinition {
    /// Map one raw record through this stream's schema
    pub fn map_record(&self, raw: &JsonValue) -> Result<JsonObject> {
        self.schema.map(self.name, raw)
    }

    /// Catalog entry for this stream (used by `discover`)
    pub fn descriptor(&self) -> JsonValue {
        json!({
            "name": self.name,
            "sync_mode": self.sync_mode,
            "primary_key": self.primary_key,
            "replication_key": self.replication_key,
            "schema": self.schema.json_schema(),
        })
    }
}

/// Context passed from a parent stream's emitted row to its child
/// stream's requests. Propagation is one-directional, parent to child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// Parent identity key (the partition key for child streams)
    pub username: String,
    /// Cursor seed: the earliest instant the partition could have data
    pub registered_at: DateTime<Utc>,
}

/// All defined streams, parents first
pub fn catalog() -> Vec<StreamDefinition> {
    vec![users::definition(), scrobbles::definition()]
}

/// Look up a stream definition by name
pub fn find(name: &str) -> Result<StreamDefinition> {
    catalog()
        .into_iter()
        .find(|stream| stream.name == name)
        .ok_or_else(|| Error::StreamNotFound {
            stream: name.to_string(),
        })
}
