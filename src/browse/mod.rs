//! Orchestration between user input, the cached catalog and rendering.

pub mod debounce;
pub mod detail;
pub mod pagination;
pub mod session;
pub mod view_model;

pub use detail::{DetailSession, DetailState};
pub use pagination::{page_window, range_label, PageSlot};
pub use session::BrowseSession;
pub use view_model::ViewModel;
