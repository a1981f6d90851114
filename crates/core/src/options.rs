//! Backend facing query options.

use serde::{Deserialize, Serialize};

/// Filters applied to list calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilter {
    /// Label selector in `key=value,...` form. Empty means no filtering.
    pub label_selector: String,
}

/// Options a list action hands to its backend adapter before calling it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOptions {
    pub list: ListFilter,
}

impl QueryOptions {
    pub fn label_selector(&self) -> Option<&str> {
        if self.list.label_selector.is_empty() { None } else { Some(&self.list.label_selector) }
    }
}
