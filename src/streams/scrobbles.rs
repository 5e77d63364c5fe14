//! The scrobbles stream: listening history per user
//!
//! Incremental over `user.getRecentTracks`, which only paginates
//! reverse-chronologically; the windowed cursor synthesizes forward
//! progress. `extended=1` asks for full artist objects and the loved
//! flag; `limit=200` is the API's page-size maximum.

use super::{users, StreamDefinition};
use crate::schema::{FieldDescriptor, Schema, Transform};
use crate::types::{JsonValue, SyncMode};

/// Stream name
pub const NAME: &str = "scrobbles";

/// Path to the per-window total-page count
pub const TOTAL_PAGES_PATH: &str = "recenttracks.@attr.totalPages";

/// Build the scrobbles stream definition
pub fn definition() -> StreamDefinition {
    StreamDefinition {
        name: NAME,
        method: "user.getRecentTracks",
        sync_mode: SyncMode::Incremental,
        primary_key: &["played_at", "track_name"],
        replication_key: Some("played_at"),
        record_path: "recenttracks.track",
        total_pages_path: Some(TOTAL_PAGES_PATH),
        fixed_params: &[("extended", "1"), ("limit", "200")],
        partition_param: Some("user"),
        parent: Some(users::NAME),
        schema: schema(),
    }
}

fn schema() -> Schema {
    Schema::new(vec![
        FieldDescriptor::string("username").required(),
        FieldDescriptor::timestamp("played_at")
            .at("date.uts")
            .transform(Transform::UnixTimestamp)
            .required(),
        FieldDescriptor::string("track_name").at("name").required(),
        FieldDescriptor::string("track_mbid")
            .at("mbid")
            .transform(Transform::BlankToNull),
        FieldDescriptor::string("track_url").at("url"),
        FieldDescriptor::boolean("loved").transform(Transform::IntToBool),
        FieldDescriptor::boolean("streamable")
            .at("streamable.fulltrack")
            .transform(Transform::IntToBool),
        FieldDescriptor::string("artist_name").at("artist.name"),
        FieldDescriptor::string("artist_mbid")
            .at("artist.mbid")
            .transform(Transform::BlankToNull),
        FieldDescriptor::string("artist_url").at("artist.url"),
        users::image_field("artist_image").at("artist.image"),
        FieldDescriptor::string("album_name")
            .at("album.#text")
            .transform(Transform::BlankToNull),
        FieldDescriptor::string("album_mbid")
            .at("album.mbid")
            .transform(Transform::BlankToNull),
        users::image_field("image"),
    ])
}

/// Whether a raw track entry is a provisional "now playing" row.
///
/// Such rows have no finalized timestamp yet; they are dropped before
/// mapping and reappear in finalized form on a later page or run.
pub fn is_now_playing(raw: &JsonValue) -> bool {
    raw.get("@attr")
        .and_then(|attr| attr.get("nowplaying"))
        .and_then(JsonValue::as_str)
        .is_some_and(|flag| flag == "true")
}

/// Inject the partition's username into a raw track entry before
/// mapping; the API omits it from each row
pub fn inject_username(raw: &mut JsonValue, username: &str) {
    if let JsonValue::Object(map) = raw {
        map.insert(
            "username".to_string(),
            JsonValue::String(username.to_string()),
        );
    }
}
