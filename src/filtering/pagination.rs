use sea_orm::{EntityTrait, QuerySelect, Select};

use crate::request::{DEFAULT_PAGE_LENGTH, PageLength};

/// The page a request asks for, in page-number form.
///
/// The offset is rebuilt from the page number, so it is always a multiple of
/// `per_page`: `start=15, length=10` gives page 2 and offset 10, not 15.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page number
    pub page: u64,
    pub per_page: u64,
}

impl PageWindow {
    /// `None` when the request disabled pagination with `length=-1`.
    #[must_use]
    pub fn from_request(start: u64, length: PageLength) -> Option<Self> {
        let per_page = match length {
            PageLength::Unlimited => return None,
            PageLength::Rows(0) => DEFAULT_PAGE_LENGTH,
            PageLength::Rows(rows) => rows,
        };
        Some(Self {
            page: start / per_page + 1,
            per_page,
        })
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.per_page
    }
}

/// How a page window is applied to a query.
pub trait PageStrategy: Send + Sync {
    fn paginate<E: EntityTrait>(&self, records: Select<E>, window: PageWindow) -> Select<E>;
}

/// `OFFSET`/`LIMIT` pagination.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetPagination;

impl PageStrategy for OffsetPagination {
    fn paginate<E: EntityTrait>(&self, records: Select<E>, window: PageWindow) -> Select<E> {
        records.offset(window.offset()).limit(window.per_page)
    }
}
