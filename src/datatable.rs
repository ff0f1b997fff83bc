//! # Translation engine
//!
//! A [`Datatable`] ties together a record source, a pagination strategy, the
//! resolved columns of one grid and the dialect configuration. Everything is
//! fixed at construction; [`Datatable::translate`] only borrows it, so one
//! instance can serve concurrent requests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gridcrate::{Datatable, DatatableSource, GridConfig, GridRequest, OffsetPagination};
//!
//! struct UserTable;
//!
//! impl DatatableSource for UserTable {
//!     type Entity = user::Entity;
//!     type Row = serde_json::Value;
//!
//!     fn raw_records(&self) -> Select<user::Entity> {
//!         user::Entity::find()
//!     }
//!
//!     fn data(&self, records: Vec<user::Model>) -> Vec<Self::Row> {
//!         records.into_iter().map(|u| json!({"name": u.name, "email": u.email})).collect()
//!     }
//! }
//!
//! let table = Datatable::builder()
//!     .source(UserTable)
//!     .pagination(OffsetPagination)
//!     .config(GridConfig::for_backend(db.get_database_backend()))
//!     .sortable_columns(["name", "email"])
//!     .searchable_columns(["name", "email"])
//!     .build()?;
//!
//! let response = table.translate(&db, &GridRequest::from_query(raw_query)).await?;
//! ```

use sea_orm::{ConnectionTrait, EntityName, EntityTrait, PaginatorTrait, Select};
use serde::Serialize;

use crate::columns::{ColumnRegistry, ColumnSpec, TableCatalog};
use crate::config::GridConfig;
use crate::errors::GridError;
use crate::filtering::{PageStrategy, PageWindow, apply_sort, filter_records};
use crate::request::GridRequest;

/// The data a grid reads from. Both methods are required.
pub trait DatatableSource: Send + Sync {
    type Entity: EntityTrait;
    /// Serialized shape of one row in the response `data`
    type Row: Serialize + Send;

    /// Unfiltered records, including any joins that join-path columns rely on
    fn raw_records(&self) -> Select<Self::Entity>;

    /// Shape one fetched page into response rows
    fn data(&self, records: Vec<<Self::Entity as EntityTrait>::Model>) -> Vec<Self::Row>;
}

/// Response body for one grid request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridResponse<T> {
    pub draw: i64,
    pub records_total: u64,
    pub records_filtered: u64,
    pub data: Vec<T>,
}

pub struct Datatable<S, P> {
    source: S,
    paging: P,
    columns: ColumnRegistry,
    config: GridConfig,
}

impl<S, P> Datatable<S, P>
where
    S: DatatableSource,
    P: PageStrategy,
{
    /// Assemble from an already resolved registry.
    pub fn new(source: S, paging: P, columns: ColumnRegistry, config: GridConfig) -> Self {
        Self {
            source,
            paging,
            columns,
            config,
        }
    }

    #[must_use]
    pub fn builder() -> DatatableBuilder<S, P> {
        DatatableBuilder::default()
    }

    #[must_use]
    pub fn columns(&self) -> &ColumnRegistry {
        &self.columns
    }

    #[must_use]
    pub fn config(&self) -> GridConfig {
        self.config
    }

    /// Answer one grid request: total count, filtered count and the page.
    pub async fn translate<C>(
        &self,
        db: &C,
        request: &GridRequest,
    ) -> Result<GridResponse<S::Row>, GridError>
    where
        C: ConnectionTrait,
        <S::Entity as EntityTrait>::Model: Sync,
    {
        // build first so a bad sort column fails before any round-trip
        let records = self.fetch_records(request)?;

        let records_total = self.source.raw_records().count(db).await?;
        let records_filtered = self
            .filter_stage(self.source.raw_records(), request)
            .count(db)
            .await?;
        let rows = records.all(db).await?;

        tracing::debug!(
            draw = request.draw,
            records_total,
            records_filtered,
            returned = rows.len(),
            "Translated grid request"
        );

        Ok(GridResponse {
            draw: request.draw,
            records_total,
            records_filtered,
            data: self.source.data(rows),
        })
    }

    /// The page query: raw records, sorted, filtered and paginated.
    pub fn fetch_records(&self, request: &GridRequest) -> Result<Select<S::Entity>, GridError> {
        let mut records = self.source.raw_records();
        if !request.order.is_empty() {
            records = apply_sort(records, &self.columns, &request.order)?;
        }
        records = self.filter_stage(records, request);
        if let Some(window) = PageWindow::from_request(request.start, request.length) {
            tracing::trace!(page = window.page, per_page = window.per_page, "Paginating grid");
            records = self.paging.paginate(records, window);
        }
        Ok(records)
    }

    /// Filtering only applies when the request carries a `search` member.
    fn filter_stage(&self, records: Select<S::Entity>, request: &GridRequest) -> Select<S::Entity> {
        if request.search.is_some() {
            filter_records(
                records,
                request,
                self.columns.searchable_columns(),
                self.config.dialect,
            )
        } else {
            records
        }
    }
}

/// Collects the parts of a [`Datatable`]. Column declarations are resolved in
/// [`build`](DatatableBuilder::build).
pub struct DatatableBuilder<S, P> {
    source: Option<S>,
    paging: Option<P>,
    config: GridConfig,
    catalog: TableCatalog,
    sortable: Vec<Option<ColumnSpec>>,
    searchable: Vec<ColumnSpec>,
}

impl<S, P> Default for DatatableBuilder<S, P> {
    fn default() -> Self {
        Self {
            source: None,
            paging: None,
            config: GridConfig::default(),
            catalog: TableCatalog::default(),
            sortable: Vec::new(),
            searchable: Vec::new(),
        }
    }
}

impl<S, P> DatatableBuilder<S, P>
where
    S: DatatableSource,
    P: PageStrategy,
{
    #[must_use]
    pub fn source(mut self, source: S) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn pagination(mut self, paging: P) -> Self {
        self.paging = Some(paging);
        self
    }

    #[must_use]
    pub fn config(mut self, config: GridConfig) -> Self {
        self.config = config;
        self
    }

    /// Tables that columns may refer to besides the source's own entity,
    /// which is always registered.
    #[must_use]
    pub fn catalog(mut self, catalog: TableCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Next grid column is sortable by `column`
    #[must_use]
    pub fn sortable_column(mut self, column: impl Into<ColumnSpec>) -> Self {
        self.sortable.push(Some(column.into()));
        self
    }

    /// Next grid column cannot be sorted
    #[must_use]
    pub fn unsortable_column(mut self) -> Self {
        self.sortable.push(None);
        self
    }

    #[must_use]
    pub fn sortable_columns<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnSpec>,
    {
        self.sortable
            .extend(columns.into_iter().map(|column| Some(column.into())));
        self
    }

    #[must_use]
    pub fn searchable_column(mut self, column: impl Into<ColumnSpec>) -> Self {
        self.searchable.push(column.into());
        self
    }

    #[must_use]
    pub fn searchable_columns<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnSpec>,
    {
        self.searchable.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Resolve the columns and assemble the engine.
    ///
    /// Fails with [`GridError::NotImplemented`] when the source or the
    /// pagination strategy is missing, and with
    /// [`GridError::ColumnResolution`] for any column that does not resolve.
    pub fn build(self) -> Result<Datatable<S, P>, GridError> {
        let source = self
            .source
            .ok_or_else(|| GridError::not_implemented("raw_records"))?;
        let paging = self
            .paging
            .ok_or_else(|| GridError::not_implemented("paginate_records"))?;

        let primary_table = S::Entity::default().table_name().to_string();
        let catalog = if self.catalog.contains(&primary_table) {
            self.catalog
        } else {
            self.catalog.with_entity::<S::Entity>()
        };
        let columns =
            ColumnRegistry::resolve(&catalog, &primary_table, &self.sortable, &self.searchable)?;

        Ok(Datatable::new(source, paging, columns, self.config))
    }
}
