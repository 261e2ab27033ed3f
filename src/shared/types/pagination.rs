/// Maximum page size accepted by list endpoints.
pub const MAX_PAGE_LIMIT: u64 = 100;

/// Pagination query parameters (1-based page).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    pub page: u64,
    pub limit: u64,
}

impl PaginationParams {
    /// Number of rows to skip for this page.
    pub fn offset(&self) -> u64 {
        (self.page.max(1) - 1) * self.limit
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// One page of results plus the total row count across all pages.
#[derive(Debug)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_zero_for_first_page() {
        let p = PaginationParams { page: 1, limit: 25 };
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn offset_skips_previous_pages() {
        let p = PaginationParams { page: 3, limit: 10 };
        assert_eq!(p.offset(), 20);
    }
}
