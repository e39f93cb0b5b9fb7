//! Query response types.

use serde::{Deserialize, Serialize};

use crate::graph::FunctionId;

/// One bounded page of results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Slice `items` into one page.
    pub fn from_items(items: Vec<T>, offset: usize, limit: usize) -> Self {
        let total = items.len();
        let page: Vec<T> = items.into_iter().skip(offset).take(limit).collect();
        let has_more = offset + page.len() < total;
        Page {
            items: page,
            total,
            offset,
            limit,
            has_more,
        }
    }
}

/// A query result plus its human-readable framing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse<T> {
    pub result: T,
    /// One-line summary for display.
    pub summary: String,
    /// Suggested follow-up operations.
    pub follow_ups: Vec<String>,
}

/// One caller of a function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallerEntry {
    pub function_id: FunctionId,
    pub name: String,
    pub file: String,
    pub line: u32,
}
