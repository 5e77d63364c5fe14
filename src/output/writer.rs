//! JSONL record writer
//!
//! One envelope per line: `{"stream": ..., "record": {...}}`. Writes go
//! to a file or stdout; the collecting sink backs tests.

use crate::error::{Error, Result};
use crate::types::JsonObject;
use serde_json::json;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Destination for emitted rows
pub trait RecordSink {
    /// Write one typed row for a stream
    fn write(&mut self, stream: &str, row: &JsonObject) -> Result<()>;

    /// Flush buffered output
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// JSON Lines writer over a file or stdout
pub struct JsonlWriter {
    writer: BufWriter<Box<dyn Write + Send>>,
    rows_written: usize,
}

impl JsonlWriter {
    /// Write to a file at the given path, creating or truncating it
    pub fn to_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path.as_ref())
            .map_err(|e| Error::output(format!("Failed to create output file: {e}")))?;
        Ok(Self {
            writer: BufWriter::new(Box::new(file)),
            rows_written: 0,
        })
    }

    /// Write to stdout
    pub fn stdout() -> Self {
        Self {
            writer: BufWriter::new(Box::new(std::io::stdout())),
            rows_written: 0,
        }
    }

    /// Number of rows written so far
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }
}

impl RecordSink for JsonlWriter {
    fn write(&mut self, stream: &str, row: &JsonObject) -> Result<()> {
        let envelope = json!({"stream": stream, "record": row});
        serde_json::to_writer(&mut self.writer, &envelope)
            .map_err(|e| Error::output(format!("Failed to serialize record: {e}")))?;
        self.writer
            .write_all(b"\n")
            .map_err(|e| Error::output(format!("Failed to write record: {e}")))?;
        self.rows_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| Error::output(format!("Failed to flush output: {e}")))
    }
}

impl std::fmt::Debug for JsonlWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonlWriter")
            .field("rows_written", &self.rows_written)
            .finish_non_exhaustive()
    }
}

/// In-memory sink collecting every emitted row, for tests
#[derive(Debug, Default)]
pub struct CollectingSink {
    /// Emitted (stream, row) pairs in emission order
    pub records: Vec<(String, JsonObject)>,
}

impl CollectingSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows emitted for one stream
    pub fn stream_records(&self, stream: &str) -> Vec<&JsonObject> {
        self.records
            .iter()
            .filter(|(s, _)| s == stream)
            .map(|(_, row)| row)
            .collect()
    }
}

impl RecordSink for CollectingSink {
    fn write(&mut self, stream: &str, row: &JsonObject) -> Result<()> {
        self.records.push((stream.to_string(), row.clone()));
        Ok(())
    }
}
