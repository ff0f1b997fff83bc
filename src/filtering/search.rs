use sea_orm::{Condition, EntityTrait, QueryFilter, Select};

use super::conditions::search_condition;
use crate::columns::ColumnRef;
use crate::config::Dialect;
use crate::request::GridRequest;

/// Free-text condition: every word must match, each word may match in any
/// searchable column.
///
/// `"ann jo"` over `[name, email]` becomes
/// `(name ~ ann OR email ~ ann) AND (name ~ jo OR email ~ jo)`.
/// Returns `None` when there is nothing to filter on.
#[must_use]
pub fn free_text_condition(query: &str, columns: &[ColumnRef], dialect: Dialect) -> Option<Condition> {
    if columns.is_empty() {
        return None;
    }
    let condition = query.split_whitespace().fold(Condition::all(), |all, word| {
        let any_column = columns
            .iter()
            .fold(Condition::any(), |any, column| {
                any.add(search_condition(column, word, dialect))
            });
        all.add(any_column)
    });
    (!condition.is_empty()).then_some(condition)
}

/// Per-column condition: searchable column `i` is matched against
/// `columns[i].search.value`, all present values must match.
#[must_use]
pub fn column_filter_condition(
    request: &GridRequest,
    columns: &[ColumnRef],
    dialect: Dialect,
) -> Option<Condition> {
    let condition = columns
        .iter()
        .enumerate()
        .filter_map(|(index, column)| {
            request
                .column_search(index)
                .map(|value| search_condition(column, value, dialect))
        })
        .fold(Condition::all(), Condition::add);
    (!condition.is_empty()).then_some(condition)
}

/// Narrow by the global search value, if one was sent.
pub fn simple_search<E: EntityTrait>(
    records: Select<E>,
    request: &GridRequest,
    columns: &[ColumnRef],
    dialect: Dialect,
) -> Select<E> {
    let condition = request
        .search
        .as_ref()
        .filter(|search| search.is_present())
        .and_then(|search| free_text_condition(&search.value, columns, dialect));
    match condition {
        Some(condition) => records.filter(condition),
        None => records,
    }
}

/// Narrow by per-column search values.
pub fn composite_search<E: EntityTrait>(
    records: Select<E>,
    request: &GridRequest,
    columns: &[ColumnRef],
    dialect: Dialect,
) -> Select<E> {
    match column_filter_condition(request, columns, dialect) {
        Some(condition) => records.filter(condition),
        None => records,
    }
}

/// Free-text search first, then per-column search. Both narrow with AND.
pub fn filter_records<E: EntityTrait>(
    records: Select<E>,
    request: &GridRequest,
    columns: &[ColumnRef],
    dialect: Dialect,
) -> Select<E> {
    let records = simple_search(records, request, columns, dialect);
    composite_search(records, request, columns, dialect)
}
