//! # Request-to-query translation
//!
//! Each stage takes a Sea-ORM `Select` and returns a narrowed copy, so
//! intermediate stages can be counted on their own.
//!
//! - **[`conditions`]**: one column, one value → one case-insensitive,
//!   type-cast substring predicate
//! - **[`search`]**: free-text search (AND across words, OR across columns)
//!   and per-column search (AND across columns)
//! - **[`sort`]**: `order[i]` directives → multi-key ORDER BY
//! - **[`pagination`]**: `start`/`length` → page window → OFFSET/LIMIT
//!
//! The page fetch runs them in the order sort → filter → paginate.

pub mod conditions;
pub mod pagination;
pub mod search;
pub mod sort;

pub use conditions::search_condition;
pub use pagination::{OffsetPagination, PageStrategy, PageWindow};
pub use search::{column_filter_condition, composite_search, filter_records, free_text_condition, simple_search};
pub use sort::{apply_sort, sort_direction};
