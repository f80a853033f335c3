//! Paged List Controller
//!
//! Drives a lazily loaded remote list: translates offset/page-size windows
//! into 1-based page queries, keeps the displayed page, and merges pushed
//! item updates into it in place.

pub mod controller;
pub mod error;
pub mod filters;
pub mod source;
pub mod window;

pub use controller::{ListNotice, PagedListController};
pub use error::{ListError, Result};
pub use filters::{ListFilters, StatusFilter};
pub use source::{ItemPatch, JsonPatch, ListItem, PageSource};
pub use window::{ListState, PageRequest, PageWindow, PagedResult, DEFAULT_PAGE_SIZE};
