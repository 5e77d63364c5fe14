//! Pagination token types

use crate::schema::path;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque state threaded between one response and the next request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageToken {
    /// Integer page index (page 1 is implicit in the tokenless request)
    Index(u32),
    /// Externally supplied token, e.g. one username per partition
    Value(String),
    /// Time-window token for windowed cursor streams
    Window(WindowToken),
}

/// Compound token for one page within a bounded time window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowToken {
    /// Inclusive lower bound of the window
    pub window_start: DateTime<Utc>,
    /// Exclusive upper bound of the window
    pub window_end: DateTime<Utc>,
    /// Page index within the window, starting at 1
    pub page: u32,
}

impl WindowToken {
    /// First page of a window
    pub fn first_page(window_start: DateTime<Utc>, window_end: DateTime<Utc>) -> Self {
        Self {
            window_start,
            window_end,
            page: 1,
        }
    }

    /// Same window, next page index
    #[must_use]
    pub fn next_page(self, page: u32) -> Self {
        Self { page, ..self }
    }
}

/// Result of the next-token computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available
    Continue(PageToken),
    /// No more pages
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Extract a total-page count from a declared path in a response body.
///
/// The API reports counts as strings; both string and integer encodings
/// are accepted. Absence or an unparseable value yields `None`, which
/// callers treat as a terminal single page.
pub fn total_pages(body: &Value, path: &str) -> Option<u32> {
    match path::select_first(body, path)? {
        Value::Number(n) => n.as_u64().map(|n| n as u32),
        Value::String(s) => s.parse::<u32>().ok(),
        _ => None,
    }
}
