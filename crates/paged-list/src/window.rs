//! Page windows and the request/result shapes exchanged with a page source

use serde::{Deserialize, Serialize};

use crate::filters::ListFilters;

/// Page size used when none has been requested yet
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// The slice of a remote list currently on screen.
///
/// `page_size` is never zero, including for deserialized windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPageWindow")]
pub struct PageWindow {
    offset: u64,
    page_size: u32,
}

#[derive(Deserialize)]
struct RawPageWindow {
    #[serde(default)]
    offset: u64,
    #[serde(default)]
    page_size: u32,
}

impl From<RawPageWindow> for PageWindow {
    fn from(raw: RawPageWindow) -> Self {
        Self::new(raw.offset, raw.page_size)
    }
}

impl PageWindow {
    /// Create a window; a zero page size falls back to [`DEFAULT_PAGE_SIZE`]
    pub fn new(offset: u64, page_size: u32) -> Self {
        let page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        Self { offset, page_size }
    }

    /// First page with the given size
    pub fn first(page_size: u32) -> Self {
        Self::new(0, page_size)
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// 1-based page number containing `offset`
    pub fn page_number(&self) -> u64 {
        self.offset / u64::from(self.page_size) + 1
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

/// One page query as sent to a [`PageSource`](crate::PageSource)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u32,
    pub filters: ListFilters,
}

impl PageRequest {
    pub fn new(window: PageWindow, filters: ListFilters) -> Self {
        Self {
            page: window.page_number(),
            limit: window.page_size(),
            filters,
        }
    }
}

/// One page of items plus the size of the whole remote list
#[derive(Debug, Clone, PartialEq)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
}

/// What a controller currently displays
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub last_window: Option<PageWindow>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            last_window: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_number_from_offset() {
        assert_eq!(PageWindow::new(0, 10).page_number(), 1);
        assert_eq!(PageWindow::new(9, 10).page_number(), 1);
        assert_eq!(PageWindow::new(20, 10).page_number(), 3);
        assert_eq!(PageWindow::new(25, 25).page_number(), 2);
    }

    #[test]
    fn test_zero_page_size_uses_default() {
        let window = PageWindow::new(30, 0);
        assert_eq!(window.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(window.page_number(), 4);
    }

    #[test]
    fn test_deserialized_zero_page_size_uses_default() {
        let window: PageWindow =
            serde_json::from_str(r#"{"offset":20,"page_size":0}"#).unwrap();
        assert_eq!(window.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(window.page_number(), 3);

        let window: PageWindow = serde_json::from_str(r#"{"offset":5}"#).unwrap();
        assert_eq!(window, PageWindow::new(5, DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn test_window_serde_keeps_fields() {
        let window = PageWindow::new(40, 20);
        let json = serde_json::to_string(&window).unwrap();
        assert_eq!(serde_json::from_str::<PageWindow>(&json).unwrap(), window);
    }

    #[test]
    fn test_request_from_window() {
        let request = PageRequest::new(PageWindow::new(20, 10), ListFilters::default());
        assert_eq!(request.page, 3);
        assert_eq!(request.limit, 10);
    }
}
