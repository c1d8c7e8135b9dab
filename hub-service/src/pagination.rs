use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const DEFAULT_MAX_PAGE_SIZE: i64 = 100;

/// Bounded page selection. Construct through [`PageRequest::clamped`] so
/// `page_size` is always in `1..=max` and `page_number` is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page_size: i64,
    page_number: i64,
}

impl PageRequest {
    /// Missing or non-positive sizes fall back to the default, oversized ones
    /// are capped at `max_page_size`. Page numbers below 1 become 1.
    pub fn clamped(page_size: Option<i64>, page_number: Option<i64>, max_page_size: i64) -> Self {
        let max_page_size = max_page_size.max(1);
        let page_size = match page_size {
            Some(size) if size > 0 => size.min(max_page_size),
            _ => DEFAULT_PAGE_SIZE.min(max_page_size),
        };
        let page_number = page_number.filter(|n| *n > 0).unwrap_or(1);

        Self {
            page_size,
            page_number,
        }
    }

    pub fn new(page_size: i64, page_number: i64) -> Self {
        Self::clamped(Some(page_size), Some(page_number), DEFAULT_MAX_PAGE_SIZE)
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn page_number(&self) -> i64 {
        self.page_number
    }

    pub fn skip(&self) -> i64 {
        (self.page_number - 1).saturating_mul(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::clamped(None, None, DEFAULT_MAX_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub total_pages: i64,
    pub skip: i64,
}

pub fn total_pages(total_count: i64, page_size: i64) -> i64 {
    if page_size <= 0 {
        return 0;
    }
    (total_count + page_size - 1) / page_size
}
