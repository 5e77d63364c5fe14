//! State management and checkpointing
//!
//! Replication state is tracked per stream and, for partitioned streams,
//! per partition key (one entry per username). Checkpoints are
//! replication-key high-water marks and only ever move forward.

mod manager;
mod types;

pub use manager::StateManager;
pub use types::{PartitionState, State, StreamState};
