//! Query state and its reducer.
//!
//! The current selections live in an immutable [`QueryState`]. Every change
//! goes through [`reduce`], which returns a new state; nothing mutates the
//! query in place.

use tracing::debug;

use crate::catalog::{Catalog, DEFAULT_FILTER, DEFAULT_SORT_FIELD};

/// The user's current filter/sort/search selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    /// Selected project; nothing is fetched until this is set.
    pub project: Option<String>,
    pub filter: String,
    pub sort_field: String,
    pub sort_ascending: bool,
    /// Interpret the search text as JQL.
    pub advanced: bool,
    /// Last committed search text.
    pub search: String,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            project: None,
            filter: DEFAULT_FILTER.to_string(),
            sort_field: DEFAULT_SORT_FIELD.to_string(),
            sort_ascending: false,
            advanced: false,
            search: String::new(),
        }
    }
}

/// The tuple that identifies one accumulated result set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub project: String,
    pub filter: String,
    pub sort_field: String,
    pub sort_ascending: bool,
    pub advanced: bool,
    pub search: String,
}

impl QueryState {
    /// The query key, or `None` while no project is selected.
    pub fn key(&self) -> Option<QueryKey> {
        let project = self.project.clone()?;
        Some(QueryKey {
            project,
            filter: self.filter.clone(),
            sort_field: self.sort_field.clone(),
            sort_ascending: self.sort_ascending,
            advanced: self.advanced,
            search: self.search.clone(),
        })
    }
}

/// A single-field change to the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryAction {
    SetProject(String),
    SetFilter(String),
    SetSortField(String),
    SetSortDirection(bool),
    SetAdvanced(bool),
    SetSearch(String),
}

/// Apply an action and return the resulting state.
///
/// Ids that are not part of the catalog leave the state untouched.
pub fn reduce(state: &QueryState, action: QueryAction, catalog: &Catalog) -> QueryState {
    let mut next = state.clone();
    match action {
        QueryAction::SetProject(id) => {
            if catalog.has_project(&id) {
                next.project = Some(id);
            } else {
                debug!(project = %id, "Ignoring unknown project");
            }
        }
        QueryAction::SetFilter(id) => {
            if catalog.has_filter(&id) {
                next.filter = id;
            } else {
                debug!(filter = %id, "Ignoring unknown filter");
            }
        }
        QueryAction::SetSortField(id) => {
            if catalog.has_sort_field(&id) {
                next.sort_field = id;
            } else {
                debug!(sort_field = %id, "Ignoring unknown sort field");
            }
        }
        QueryAction::SetSortDirection(ascending) => next.sort_ascending = ascending,
        QueryAction::SetAdvanced(advanced) => next.advanced = advanced,
        QueryAction::SetSearch(text) => next.search = text,
    }
    next
}
