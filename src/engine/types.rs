//! Engine result types

use serde::Serialize;

/// Counters accumulated over one sync run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncStats {
    /// Total typed rows emitted
    pub records_synced: u64,
    /// Total pages fetched from the API
    pub pages_fetched: u64,
    /// Streams fully synced
    pub streams_synced: u32,
    /// Partitions fully synced
    pub partitions_synced: u32,
    /// Checkpoints persisted
    pub checkpoints_written: u32,
    /// Wall-clock duration of the run
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one emitted row
    pub fn add_record(&mut self) {
        self.records_synced += 1;
    }

    /// Record one fetched page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Record one completed stream
    pub fn add_stream(&mut self) {
        self.streams_synced += 1;
    }

    /// Record one completed partition
    pub fn add_partition(&mut self) {
        self.partitions_synced += 1;
    }

    /// Record one persisted checkpoint
    pub fn add_checkpoint(&mut self) {
        self.checkpoints_written += 1;
    }
}

#[cfg(test)]
mod stats_tests {
    use super::*;

    #[test]
    fn test_stats_accumulate() {
        let mut stats = SyncStats::new();
        stats.add_record();
        stats.add_record();
        stats.add_page();
        stats.add_stream();
        stats.add_partition();
        stats.add_checkpoint();

        assert_eq!(stats.records_synced, 2);
        assert_eq!(stats.pages_fetched, 1);
        assert_eq!(stats.streams_synced, 1);
        assert_eq!(stats.partitions_synced, 1);
        assert_eq!(stats.checkpoints_written, 1);
    }
}
