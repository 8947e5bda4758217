//! Reusable UI components.

mod enum_select;
mod search_input;
mod spinner;
mod status_bar;
mod toast;
mod toggle;

pub use enum_select::{EnumSelect, SelectAction};
pub use search_input::{SearchAction, SearchInput};
pub use spinner::Spinner;
pub use status_bar::render_status_bar;
pub use toast::Toasts;
pub use toggle::render_toggle;
