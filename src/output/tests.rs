//! Tests for record output sinks

use super::*;
use crate::types::JsonObject;
use serde_json::{json, Value};
use tempfile::tempdir;

fn row(name: &str) -> JsonObject {
    let mut row = JsonObject::new();
    row.insert("username".to_string(), json!(name));
    row
}

#[test]
fn test_jsonl_writer_envelopes_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.jsonl");

    let mut writer = JsonlWriter::to_file(&path).unwrap();
    writer.write("users", &row("alice")).unwrap();
    writer.write("users", &row("bob")).unwrap();
    writer.flush().unwrap();
    assert_eq!(writer.rows_written(), 2);

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["stream"], json!("users"));
    assert_eq!(lines[0]["record"]["username"], json!("alice"));
    assert_eq!(lines[1]["record"]["username"], json!("bob"));
}

#[test]
fn test_collecting_sink_filters_by_stream() {
    let mut sink = CollectingSink::new();
    sink.write("users", &row("alice")).unwrap();
    sink.write("scrobbles", &row("alice")).unwrap();
    sink.write("users", &row("bob")).unwrap();

    assert_eq!(sink.records.len(), 3);
    assert_eq!(sink.stream_records("users").len(), 2);
    assert_eq!(sink.stream_records("scrobbles").len(), 1);
}
