//! Page-size clamping shared by the list endpoints.

/// Webcam list page size when none is requested.
pub const DEFAULT_PAGE_SIZE: i64 = 100;

/// Largest page the webcam list will return.
pub const MAX_PAGE_SIZE: i64 = 1000;

/// Clamp a user-provided limit to `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// A 1-based page request resolved to `LIMIT`/`OFFSET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub per_page: i64,
}

impl Page {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: clamp_limit(per_page, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        }
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_one_hundred() {
        let page = Page::new(None, None);
        assert_eq!(page.limit(), 100);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn page_numbers_are_one_based() {
        let page = Page::new(Some(3), Some(20));
        assert_eq!(page.offset(), 40);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let page = Page::new(Some(0), Some(5000));
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, MAX_PAGE_SIZE);
        assert_eq!(clamp_limit(Some(-3), 10, 50), 1);
        assert_eq!(clamp_offset(Some(-1)), 0);
    }
}
