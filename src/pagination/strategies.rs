//! Index-style and enumerated pagination
//!
//! Page 1 is always fetched with no explicit token, so the transition
//! function's first call must return the second page number directly.

use super::types::{total_pages, NextPage, PageToken};
use serde_json::Value;

// ============================================================================
// Index Pagination
// ============================================================================

/// Index-style pagination (page N of M)
///
/// A pure transition function: given the just-received response and the
/// previous token, compute the next page index or terminate.
#[derive(Debug, Clone)]
pub struct IndexPaginator {
    /// Path to the total-page count within a response body
    pub total_pages_path: String,
}

impl IndexPaginator {
    /// Create a new index paginator
    pub fn new(total_pages_path: impl Into<String>) -> Self {
        Self {
            total_pages_path: total_pages_path.into(),
        }
    }

    /// Compute the next token. `prev` of `None` means the tokenless
    /// first-page request produced this response.
    pub fn next(&self, body: &Value, prev: Option<u32>) -> NextPage {
        // A response without the total-pages path is a terminal single page
        let Some(total) = total_pages(body, &self.total_pages_path) else {
            return NextPage::Done;
        };

        let next = prev.unwrap_or(1) + 1;
        if next > total {
            NextPage::Done
        } else {
            NextPage::Continue(PageToken::Index(next))
        }
    }
}

// ============================================================================
// Enumerated Pagination
// ============================================================================

/// Externally enumerated tokens, consumed in order
///
/// The next token is independent of response content: pop the next
/// element or terminate when the list is exhausted.
#[derive(Debug, Clone)]
pub struct EnumeratedPaginator {
    tokens: Vec<String>,
    position: usize,
}

impl EnumeratedPaginator {
    /// Create a paginator over a caller-provided token list
    pub fn new(tokens: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            position: 0,
        }
    }

    /// Pop the next token, or terminate
    pub fn next(&mut self) -> NextPage {
        match self.tokens.get(self.position) {
            Some(token) => {
                self.position += 1;
                NextPage::Continue(PageToken::Value(token.clone()))
            }
            None => NextPage::Done,
        }
    }

    /// Number of tokens remaining
    pub fn remaining(&self) -> usize {
        self.tokens.len() - self.position
    }
}
