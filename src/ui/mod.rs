//! User interface components and views.
//!
//! Rendering only; all state transitions happen in `App::update`.

mod components;
pub mod theme;
mod views;

pub use components::{
    render_status_bar, render_toggle, EnumSelect, SearchAction, SearchInput, SelectAction,
    Spinner, Toasts,
};
pub use views::{HelpAction, HelpView, IssueListView, ListAction};
