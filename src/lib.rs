// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Last.fm Extractor
//!
//! An incremental, rate-limited extraction engine for the Last.fm
//! audioscrobbler API. Emits schema-typed rows with resumable checkpoint
//! state, suitable for append-only loading into a downstream sink.
//!
//! ## Streams
//!
//! - **users**: one profile row per configured username (full refresh)
//! - **scrobbles**: listening history per user, synced incrementally by
//!   advancing a bounded time window forward over the reverse-chronological
//!   `user.getRecentTracks` feed
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           Engine                                │
//! │  check() → Status    discover() → Catalog    run() → SyncStats  │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬──────┴────────┬───────────┬─────────────┐
//! │   HTTP   │  Schema   │  Pagination   │   State   │   Output    │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ GET      │ Extract   │ Page index    │ Cursors   │ JSONL       │
//! │ Retry    │ Transform │ Enumerated    │ Atomic    │ Collecting  │
//! │ Rate Lim │ Coerce    │ Time window   │ save      │ sink        │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the extractor
pub mod error;

/// Common types and type aliases
pub mod types;

/// API key credential handling
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Declarative field mapping (raw JSON record -> typed row)
pub mod schema;

/// Pagination strategies and the windowed cursor
pub mod pagination;

/// State management and checkpointing
pub mod state;

/// Stream definitions (users, scrobbles)
pub mod streams;

/// Record output sinks
pub mod output;

/// Main extraction engine
pub mod engine;

/// Configuration loading
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::Config;
pub use engine::Engine;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
