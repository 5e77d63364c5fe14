//! Windowed cursor over a reverse-chronological feed
//!
//! The underlying feed only supports reverse-chronological retrieval,
//! paginated per fixed-size window. Forward incremental progress is
//! synthesized here: a bounded `[window_start, window_end)` span is paged
//! through with the index-style controller, then the window advances.
//!
//! Checkpoint commission is an explicit [`WindowStep::AdvanceWindow`]
//! action applied by the orchestrator, never a hidden side effect of
//! token computation. A checkpoint is only safe once the prior window is
//! fully consumed, so a resumed run re-requests at most one already-seen
//! window and never skips unseen data.

use super::strategies::IndexPaginator;
use super::types::{NextPage, PageToken, WindowToken};
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

/// Per-partition state transition for a windowed cursor stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowStep {
    /// More pages remain in the current window
    NextPage(WindowToken),
    /// Current window exhausted: commit the checkpoint up to `commit`,
    /// then continue with the first page of the next window
    AdvanceWindow {
        /// Replication-key high-water mark now safe to persist
        commit: DateTime<Utc>,
        /// First page of the following window
        next: WindowToken,
    },
    /// The window reaches past "now"; the partition has caught up and no
    /// further requests are made this run (and no checkpoint is written
    /// for the partially covered window)
    CaughtUp,
}

/// Windowed cursor controller
#[derive(Debug, Clone)]
pub struct WindowedCursor {
    step: Duration,
    inner: IndexPaginator,
}

impl WindowedCursor {
    /// Create a cursor with a fixed window span and the path to the
    /// per-window total-page count
    pub fn new(step_days: u32, total_pages_path: impl Into<String>) -> Self {
        Self {
            step: Duration::days(i64::from(step_days)),
            inner: IndexPaginator::new(total_pages_path),
        }
    }

    /// Window span
    pub fn step(&self) -> Duration {
        self.step
    }

    /// Resolve the window floor for a partition's first request: the most
    /// restrictive (latest) of the persisted checkpoint, the
    /// context-provided lower bound, and the optional global floor.
    pub fn resolve_floor(
        checkpoint: Option<DateTime<Utc>>,
        context_floor: DateTime<Utc>,
        global_floor: Option<DateTime<Utc>>,
    ) -> DateTime<Utc> {
        let mut floor = context_floor;
        if let Some(checkpoint) = checkpoint {
            floor = floor.max(checkpoint);
        }
        if let Some(global) = global_floor {
            floor = floor.max(global);
        }
        floor
    }

    /// Open the first window of a partition
    pub fn open(&self, floor: DateTime<Utc>) -> WindowToken {
        WindowToken::first_page(floor, floor + self.step)
    }

    /// Compute the next step from the just-received response.
    ///
    /// `now` is passed in rather than read from the clock so the caller
    /// controls the catch-up horizon for the whole run.
    pub fn advance(&self, body: &Value, current: &WindowToken, now: DateTime<Utc>) -> WindowStep {
        match self.inner.next(body, Some(current.page)) {
            NextPage::Continue(PageToken::Index(page)) => {
                WindowStep::NextPage(current.next_page(page))
            }
            // The inner paginator only emits index tokens
            NextPage::Continue(_) | NextPage::Done => {
                if current.window_end > now {
                    WindowStep::CaughtUp
                } else {
                    WindowStep::AdvanceWindow {
                        commit: current.window_end,
                        next: WindowToken::first_page(
                            current.window_end,
                            current.window_end + self.step,
                        ),
                    }
                }
            }
        }
    }
}
