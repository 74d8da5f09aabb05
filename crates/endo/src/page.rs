//! Page based pagination.

/// A page number and a per page limit.
///
/// Page numbers start at 1. Out of range values are clamped rather than
/// rejected so that user supplied query strings can be passed through as is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageOptions {
    pub page: i64,
    pub per_page: i64,
}

impl PageOptions {
    /// Limit used when `per_page` is not positive.
    pub const DEFAULT_PER_PAGE: i64 = 10;

    pub fn new(page: i64, per_page: i64) -> Self {
        Self { page, per_page }
    }

    /// Returns the `(limit, offset)` pair for a query.
    pub fn limit_offset(&self) -> (i64, i64) {
        let page = self.page.max(1);
        let limit = if self.per_page < 1 {
            Self::DEFAULT_PER_PAGE
        } else {
            self.per_page
        };
        (limit, (page - 1).saturating_mul(limit))
    }
}
