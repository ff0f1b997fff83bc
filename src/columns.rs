//! Column declarations and their resolution.
//!
//! Grid columns are declared as strings, the way they read in a grid
//! definition: `"users.name"`, a bare `"name"` for the source's own table, or
//! a join path such as `["department", "employee.name"]` when the column
//! lives on a joined table. Declarations are resolved once, when the
//! [`ColumnRegistry`] is built, against a [`TableCatalog`]; a reference that
//! names an unknown table or column fails right there instead of at query
//! time.
//!
//! ## Join aliases
//!
//! A join-path column is addressed through a synthetic alias made from every
//! table in the path: names sorted, lower-cased, pluralised and joined with
//! `_`. `["employee", "department.name"]` and `["department", "employee.name"]`
//! both produce `departments_employees`. Join the related table under that
//! alias in [`DatatableSource::raw_records`](crate::DatatableSource::raw_records):
//!
//! ```rust,ignore
//! employee::Entity::find().join_as(
//!     JoinType::InnerJoin,
//!     employee::Relation::Department.def(),
//!     Alias::new("departments_employees"),
//! )
//! ```

use sea_orm::{
    EntityTrait, IdenStatic, Iterable,
    sea_query::{Alias, Expr, SimpleExpr},
};
use serde::Deserialize;

use crate::errors::GridError;

/// A column as declared, before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ColumnSpec {
    /// `"table.column"`, or `"column"` on the source's own table
    Simple(String),
    /// Tables on the join path; exactly one element carries `.column`
    JoinPath(Vec<String>),
}

impl From<&str> for ColumnSpec {
    fn from(value: &str) -> Self {
        Self::Simple(value.to_string())
    }
}

impl From<String> for ColumnSpec {
    fn from(value: String) -> Self {
        Self::Simple(value)
    }
}

impl<const N: usize> From<[&str; N]> for ColumnSpec {
    fn from(path: [&str; N]) -> Self {
        Self::JoinPath(path.iter().map(ToString::to_string).collect())
    }
}

impl From<Vec<String>> for ColumnSpec {
    fn from(path: Vec<String>) -> Self {
        Self::JoinPath(path)
    }
}

impl std::fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simple(reference) => write!(f, "{reference}"),
            Self::JoinPath(path) => write!(f, "[{}]", path.join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TableDef {
    name: String,
    columns: Vec<String>,
}

/// Tables and columns that column declarations may refer to.
#[derive(Debug, Clone, Default)]
pub struct TableCatalog {
    tables: Vec<TableDef>,
}

impl TableCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a Sea-ORM entity with all of its columns
    #[must_use]
    pub fn with_entity<E: EntityTrait>(self) -> Self {
        let table = E::default().table_name().to_string();
        let columns: Vec<String> = E::Column::iter()
            .map(|column| column.as_str().to_string())
            .collect();
        self.with_table(&table, columns)
    }

    /// Register a table by name, e.g. a view with no entity
    #[must_use]
    pub fn with_table<I, S>(mut self, name: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = columns.into_iter().map(Into::into).collect();
        self.tables.retain(|table| table.name != name);
        self.tables.push(TableDef {
            name: name.to_string(),
            columns,
        });
        self
    }

    #[must_use]
    pub fn contains(&self, table: &str) -> bool {
        self.tables.iter().any(|def| def.name == table)
    }

    /// Find a table by model or table name: `user`, `User` and `users` all
    /// find the `users` table.
    fn lookup(&self, model: &str) -> Option<&TableDef> {
        let normalized = word_slug(&model.to_lowercase());
        let plural = pluralize(&normalized);
        self.tables.iter().find(|def| {
            let name = def.name.to_lowercase();
            name == normalized || name == plural
        })
    }
}

/// Alias declaration a join-path column depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinAlias {
    /// Synthetic alias the joined table must be declared under
    pub alias: String,
    /// First table of the canonically ordered join path
    pub primary_table: String,
}

/// A resolved column: which table (or alias) and which column to address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    qualifier: String,
    column: String,
    join: Option<JoinAlias>,
}

impl ColumnRef {
    /// Resolve a declaration against the catalog. Bare column names belong to
    /// `primary_table`.
    pub fn resolve(
        spec: &ColumnSpec,
        catalog: &TableCatalog,
        primary_table: &str,
    ) -> Result<Self, GridError> {
        match spec {
            ColumnSpec::Simple(reference) => Self::resolve_simple(reference, catalog, primary_table),
            ColumnSpec::JoinPath(path) => Self::resolve_join_path(spec, path, catalog),
        }
    }

    fn resolve_simple(
        reference: &str,
        catalog: &TableCatalog,
        primary_table: &str,
    ) -> Result<Self, GridError> {
        let (model, column) = reference
            .split_once('.')
            .unwrap_or((primary_table, reference));
        if column.is_empty() {
            return Err(GridError::column_resolution(reference, "empty column name"));
        }
        let table = catalog
            .lookup(model)
            .ok_or_else(|| GridError::column_resolution(reference, format!("unknown table '{model}'")))?;
        ensure_column(reference, table, column)?;
        Ok(Self {
            qualifier: table.name.clone(),
            column: column.to_string(),
            join: None,
        })
    }

    fn resolve_join_path(
        spec: &ColumnSpec,
        path: &[String],
        catalog: &TableCatalog,
    ) -> Result<Self, GridError> {
        let reference = spec.to_string();
        let mut dotted = path.iter().filter_map(|element| element.split_once('.'));
        let (owner, column) = match (dotted.next(), dotted.next()) {
            (Some(found), None) => found,
            (None, _) => {
                return Err(GridError::column_resolution(reference, "join path names no column"));
            }
            (Some(_), Some(_)) => {
                return Err(GridError::column_resolution(
                    reference,
                    "join path names more than one column",
                ));
            }
        };

        let mut models: Vec<&str> = path
            .iter()
            .map(|element| element.split_once('.').map_or(element.as_str(), |(model, _)| model))
            .collect();
        for model in &models {
            if catalog.lookup(model).is_none() {
                return Err(GridError::column_resolution(
                    reference,
                    format!("unknown table '{model}'"),
                ));
            }
        }
        let owner_table = catalog
            .lookup(owner)
            .ok_or_else(|| GridError::column_resolution(&reference, format!("unknown table '{owner}'")))?;
        ensure_column(&reference, owner_table, column)?;

        models.sort_unstable();
        let alias = join_alias(&models);
        let primary_table = catalog
            .lookup(models[0])
            .map(|def| def.name.clone())
            .unwrap_or_default();

        Ok(Self {
            qualifier: alias.clone(),
            column: column.to_string(),
            join: Some(JoinAlias {
                alias,
                primary_table,
            }),
        })
    }

    /// Table name or synthetic alias the column is addressed through
    #[must_use]
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    #[must_use]
    pub fn join_alias(&self) -> Option<&JoinAlias> {
        self.join.as_ref()
    }

    /// `"qualifier"."column"`
    pub(crate) fn expr(&self) -> SimpleExpr {
        Expr::col((Alias::new(&self.qualifier), Alias::new(&self.column))).into()
    }
}

fn ensure_column(reference: &str, table: &TableDef, column: &str) -> Result<(), GridError> {
    if table.columns.iter().any(|known| known == column) {
        Ok(())
    } else {
        Err(GridError::column_resolution(
            reference,
            format!("table '{}' has no column '{column}'", table.name),
        ))
    }
}

/// Synthetic alias for a set of tables: each name lower-cased and
/// pluralised, joined with `_` in the order given.
#[must_use]
pub fn join_alias(models: &[&str]) -> String {
    models
        .iter()
        .map(|model| word_slug(&pluralize(&model.to_lowercase())))
        .collect::<Vec<_>>()
        .join("_")
}

fn pluralize(word: &str) -> String {
    pluralizer::pluralize(word, 2, false)
}

/// Replace every run of non-word characters with a single `_`.
fn word_slug(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut in_run = false;
    for c in input.chars() {
        if c.is_alphanumeric() || c == '_' {
            slug.push(c);
            in_run = false;
        } else if !in_run {
            slug.push('_');
            in_run = true;
        }
    }
    slug
}

/// Sortable and searchable columns of one grid, resolved.
///
/// Sortable columns are positional: entry `i` answers `order[..][column]=i`,
/// and `None` marks a column that cannot be sorted. Both lists are empty by
/// default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRegistry {
    sortable: Vec<Option<ColumnRef>>,
    searchable: Vec<ColumnRef>,
}

impl ColumnRegistry {
    pub fn resolve(
        catalog: &TableCatalog,
        primary_table: &str,
        sortable: &[Option<ColumnSpec>],
        searchable: &[ColumnSpec],
    ) -> Result<Self, GridError> {
        let sortable = sortable
            .iter()
            .map(|spec| {
                spec.as_ref()
                    .map(|spec| ColumnRef::resolve(spec, catalog, primary_table))
                    .transpose()
            })
            .collect::<Result<_, _>>()?;
        let searchable = searchable
            .iter()
            .map(|spec| ColumnRef::resolve(spec, catalog, primary_table))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            sortable,
            searchable,
        })
    }

    #[must_use]
    pub fn sortable_columns(&self) -> &[Option<ColumnRef>] {
        &self.sortable
    }

    #[must_use]
    pub fn searchable_columns(&self) -> &[ColumnRef] {
        &self.searchable
    }

    /// Sortable column for a grid column index from the request
    pub fn sort_column(&self, index: i64) -> Result<&ColumnRef, GridError> {
        let reference = format!("sortable_columns[{index}]");
        let slot = usize::try_from(index)
            .ok()
            .and_then(|i| self.sortable.get(i))
            .ok_or_else(|| GridError::column_resolution(&reference, "index out of range"))?;
        slot.as_ref()
            .ok_or_else(|| GridError::column_resolution(reference, "column is not sortable"))
    }
}
