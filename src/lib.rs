//! # gridcrate
//!
//! Server-side processing for data-grid widgets (the DataTables protocol) on
//! top of Sea-ORM. A grid request (`draw`, `start`, `length`, `order`,
//! `search`, `columns`) is translated into a filtered, sorted and paginated
//! `Select`, and answered with:
//!
//! ```json
//! {"draw": 1, "recordsTotal": 25, "recordsFiltered": 2, "data": [...]}
//! ```
//!
//! - **[`request`]**: parse the grid request from JSON or a query string
//! - **[`columns`]**: declare sortable/searchable columns, resolved up front
//! - **[`filtering`]**: search predicates, sorting, pagination
//! - **[`datatable`]**: the engine and the [`DatatableSource`] hook
//! - **[`extract`]**: axum extractor and response conversion
//! - **[`errors`]**: [`GridError`]

pub mod columns;
pub mod config;
pub mod datatable;
pub mod errors;
pub mod extract;
pub mod filtering;
pub mod request;

pub use columns::{ColumnRef, ColumnRegistry, ColumnSpec, JoinAlias, TableCatalog, join_alias};
pub use config::{Dialect, GridConfig};
pub use datatable::{Datatable, DatatableBuilder, DatatableSource, GridResponse};
pub use errors::GridError;
pub use extract::GridQuery;
pub use filtering::{OffsetPagination, PageStrategy, PageWindow, search_condition};
pub use request::{GridRequest, OrderDirective, PageLength, SearchTerm};
