//! Application views (screens).

mod help;
mod issue_list;

pub use help::{HelpAction, HelpView};
pub use issue_list::{IssueListView, ListAction};
