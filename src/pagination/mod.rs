//! Pagination strategies
//!
//! Three token shapes drive page iteration:
//! - an integer page index checked against a total-page count
//! - externally enumerated tokens (one per configured username)
//! - a compound time-window token for reverse-chronological feeds

mod strategies;
mod types;
mod window;

pub use strategies::{EnumeratedPaginator, IndexPaginator};
pub use types::{total_pages, NextPage, PageToken, WindowToken};
pub use window::{WindowStep, WindowedCursor};
