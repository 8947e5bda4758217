//! Initial query settings.

use serde::{Deserialize, Serialize};

use crate::catalog::{DEFAULT_FILTER, DEFAULT_SORT_FIELD};
use crate::query::QueryState;

/// Selections applied when the application starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryDefaults {
    /// The project to open with; nothing is fetched until one is chosen.
    pub project: Option<String>,
    /// The filter id.
    pub filter: String,
    /// The sort field id.
    pub sort_field: String,
    /// Whether to sort ascending.
    pub sort_ascending: bool,
    /// Whether search text is raw JQL.
    pub advanced: bool,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            project: None,
            filter: DEFAULT_FILTER.to_string(),
            sort_field: DEFAULT_SORT_FIELD.to_string(),
            sort_ascending: false,
            advanced: false,
        }
    }
}

impl QueryDefaults {
    /// Build the starting query state.
    pub fn to_query(&self) -> QueryState {
        QueryState {
            project: self.project.clone(),
            filter: self.filter.clone(),
            sort_field: self.sort_field.clone(),
            sort_ascending: self.sort_ascending,
            advanced: self.advanced,
            search: String::new(),
        }
    }
}
