//! State types for tracking sync progress
//!
//! These types are serialized to JSON and persisted between runs.
//! Cursor values are replication-key high-water marks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete state for an extraction run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct State {
    /// Per-stream state
    #[serde(default)]
    pub streams: HashMap<String, StreamState>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get state for a stream
    pub fn get_stream(&self, stream: &str) -> Option<&StreamState> {
        self.streams.get(stream)
    }

    /// Get mutable state for a stream, creating if needed
    pub fn get_stream_mut(&mut self, stream: &str) -> &mut StreamState {
        self.streams.entry(stream.to_string()).or_default()
    }

    /// Get cursor for a stream
    pub fn get_cursor(&self, stream: &str) -> Option<DateTime<Utc>> {
        self.streams.get(stream)?.cursor
    }

    /// Advance the cursor for a stream; the cursor never moves backwards
    pub fn advance_cursor(&mut self, stream: &str, cursor: DateTime<Utc>) {
        let state = self.get_stream_mut(stream);
        state.cursor = Some(state.cursor.map_or(cursor, |prev| prev.max(cursor)));
    }
}

/// State for a single stream
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamState {
    /// Replication-key high-water mark for unpartitioned streams
    #[serde(default)]
    pub cursor: Option<DateTime<Utc>>,

    /// Per-partition high-water marks (one per username)
    #[serde(default)]
    pub partitions: HashMap<String, PartitionState>,
}

impl StreamState {
    /// Create a new empty stream state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get partition state
    pub fn get_partition(&self, partition_id: &str) -> Option<&PartitionState> {
        self.partitions.get(partition_id)
    }

    /// Get mutable partition state, creating if needed
    pub fn get_partition_mut(&mut self, partition_id: &str) -> &mut PartitionState {
        self.partitions.entry(partition_id.to_string()).or_default()
    }

    /// Advance a partition's cursor; the cursor never moves backwards
    pub fn advance_partition_cursor(&mut self, partition_id: &str, cursor: DateTime<Utc>) {
        let partition = self.get_partition_mut(partition_id);
        partition.cursor = Some(partition.cursor.map_or(cursor, |prev| prev.max(cursor)));
    }
}

/// State for a single partition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartitionState {
    /// Replication-key high-water mark within this partition
    #[serde(default)]
    pub cursor: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_state_default() {
        let state = State::new();
        assert!(state.streams.is_empty());
    }

    #[test]
    fn test_state_cursor() {
        let mut state = State::new();
        assert!(state.get_cursor("scrobbles").is_none());

        state.advance_cursor("scrobbles", ts("2024-01-01T00:00:00Z"));
        assert_eq!(
            state.get_cursor("scrobbles"),
            Some(ts("2024-01-01T00:00:00Z"))
        );
    }

    #[test]
    fn test_cursor_never_decreases() {
        let mut state = State::new();
        state.advance_cursor("scrobbles", ts("2024-02-01T00:00:00Z"));
        state.advance_cursor("scrobbles", ts("2024-01-01T00:00:00Z"));
        assert_eq!(
            state.get_cursor("scrobbles"),
            Some(ts("2024-02-01T00:00:00Z"))
        );
    }

    #[test]
    fn test_partition_cursor_never_decreases() {
        let mut stream_state = StreamState::new();
        stream_state.advance_partition_cursor("alice", ts("2024-02-01T00:00:00Z"));
        stream_state.advance_partition_cursor("alice", ts("2024-01-01T00:00:00Z"));

        assert_eq!(
            stream_state.get_partition("alice").unwrap().cursor,
            Some(ts("2024-02-01T00:00:00Z"))
        );
        assert!(stream_state.get_partition("bob").is_none());
    }

    #[test]
    fn test_state_serialization() {
        let mut state = State::new();
        state
            .get_stream_mut("scrobbles")
            .advance_partition_cursor("alice", ts("2024-01-01T00:00:00Z"));

        let json = serde_json::to_string(&state).unwrap();
        let restored: State = serde_json::from_str(&json).unwrap();

        assert_eq!(
            restored
                .get_stream("scrobbles")
                .unwrap()
                .get_partition("alice")
                .unwrap()
                .cursor,
            Some(ts("2024-01-01T00:00:00Z"))
        );
    }
}
