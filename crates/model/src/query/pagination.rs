use serde::{Deserialize, Serialize};

/// 1-based page request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationSpec {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PaginationSpec {
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self { page, page_size }
    }

    /// Elements to skip: `page * page_size - page_size` when both are known.
    pub fn skip(&self) -> i64 {
        match (self.page, self.page_size) {
            (Some(page), Some(size)) => page.saturating_mul(size).saturating_sub(size),
            _ => 0,
        }
    }

    /// Take limit; a zero or absent page size means no limit.
    pub fn take(&self) -> Option<i64> {
        self.page_size.filter(|size| *size > 0)
    }

    pub fn is_noop(&self) -> bool {
        self.skip() == 0 && self.take().is_none()
    }
}
