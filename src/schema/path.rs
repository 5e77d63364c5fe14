//! Path-based extraction from raw JSON documents
//!
//! Simple dot-notation paths (including array indexing) are walked
//! directly; wildcard patterns fall through to jsonpath-rust.

use serde_json::Value;

/// Select all values matching a path.
///
/// Returns an empty vector when nothing matches or the path is invalid.
pub fn select(value: &Value, path: &str) -> Vec<Value> {
    if path.contains('*') {
        select_with_jsonpath(value, path)
    } else {
        match select_simple(value, path) {
            Some(v) => vec![v],
            None => vec![],
        }
    }
}

/// Select the raw records within a page response body.
///
/// A single array match is flattened into its elements; a single object
/// match is one record. The API sometimes collapses a one-element track
/// list into a bare object, which is why the non-array case matters.
pub fn select_records(value: &Value, path: &str) -> Vec<Value> {
    let matches = select(value, path);
    match matches.as_slice() {
        [Value::Array(arr)] => arr.clone(),
        _ => matches,
    }
}

/// Select the first match for a path, if any
pub fn select_first(value: &Value, path: &str) -> Option<Value> {
    select(value, path).into_iter().next()
}

/// Extract a value using simple dot-notation path
fn select_simple(value: &Value, path: &str) -> Option<Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    let parts: Vec<&str> = path.split('.').collect();

    let mut current = value;
    for part in parts {
        // Handle array indexing like "track[0]" or "track[-1]"
        if let Some(bracket_pos) = part.find('[') {
            let name = &part[..bracket_pos];
            let index_str = &part[bracket_pos + 1..part.len() - 1];

            if !name.is_empty() {
                current = current.get(name)?;
            }

            if let Ok(index) = index_str.parse::<i64>() {
                if let Value::Array(arr) = current {
                    let idx = if index < 0 {
                        (arr.len() as i64 + index) as usize
                    } else {
                        index as usize
                    };
                    current = arr.get(idx)?;
                } else {
                    return None;
                }
            } else {
                return None;
            }
        } else {
            current = current.get(part)?;
        }
    }

    Some(current.clone())
}

/// Select matches using jsonpath-rust (wildcard patterns)
fn select_with_jsonpath(value: &Value, path: &str) -> Vec<Value> {
    use jsonpath_rust::JsonPath;

    let normalized = if path.starts_with('$') {
        path.to_string()
    } else {
        format!("$.{path}")
    };

    let Ok(jp) = JsonPath::try_from(normalized.as_str()) else {
        return vec![];
    };

    match jp.find(value) {
        Value::Array(arr) => arr,
        Value::Null => vec![],
        other => vec![other],
    }
}

#[cfg(test)]
mod path_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_select_simple_nested() {
        let doc = json!({"registered": {"unixtime": "1577836800"}});
        let matches = select(&doc, "registered.unixtime");
        assert_eq!(matches, vec![json!("1577836800")]);
    }

    #[test]
    fn test_select_missing_path() {
        let doc = json!({"name": "alice"});
        assert!(select(&doc, "registered.unixtime").is_empty());
    }

    #[test]
    fn test_select_special_keys() {
        let doc = json!({"album": {"#text": "Blue Train", "mbid": ""}});
        assert_eq!(select(&doc, "album.#text"), vec![json!("Blue Train")]);

        let doc = json!({"@attr": {"nowplaying": "true"}});
        assert_eq!(select(&doc, "@attr.nowplaying"), vec![json!("true")]);
    }

    #[test]
    fn test_select_array_index() {
        let doc = json!({"track": [{"name": "a"}, {"name": "b"}]});
        assert_eq!(select(&doc, "track[0].name"), vec![json!("a")]);
        assert_eq!(select(&doc, "track[-1].name"), vec![json!("b")]);
    }

    #[test]
    fn test_select_wildcard() {
        let doc = json!({"recenttracks": {"track": [{"name": "a"}, {"name": "b"}]}});
        let matches = select(&doc, "$.recenttracks.track[*]");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0]["name"], "a");
    }

    #[test]
    fn test_select_records_flattens_array() {
        let doc = json!({"recenttracks": {"track": [{"name": "a"}, {"name": "b"}]}});
        let records = select_records(&doc, "recenttracks.track");
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_select_records_single_object() {
        let doc = json!({"user": {"name": "alice"}});
        let records = select_records(&doc, "user");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], "alice");
    }

    #[test]
    fn test_select_records_collapsed_single_track() {
        // One-scrobble pages come back as a bare object, not a list
        let doc = json!({"recenttracks": {"track": {"name": "only"}}});
        let records = select_records(&doc, "recenttracks.track");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], "only");
    }

    #[test]
    fn test_select_first() {
        let doc = json!({"name": "alice"});
        assert_eq!(select_first(&doc, "name"), Some(json!("alice")));
        assert_eq!(select_first(&doc, "missing"), None);
    }
}
