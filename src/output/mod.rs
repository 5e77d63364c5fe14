//! Record output sinks
//!
//! The engine emits typed rows into a [`RecordSink`]; the destination
//! owns deduplication by primary key.

mod writer;

pub use writer::{CollectingSink, JsonlWriter, RecordSink};

#[cfg(test)]
mod tests;
