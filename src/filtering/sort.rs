use sea_orm::{EntityTrait, QueryOrder, Select, sea_query::Order};

use crate::columns::ColumnRegistry;
use crate::errors::GridError;
use crate::request::OrderDirective;

/// Direction for a raw `dir` value. Only the exact string `"desc"` sorts
/// descending; anything else, including `"DESC"` or nothing, is ascending.
#[must_use]
pub fn sort_direction(dir: Option<&str>) -> Order {
    match dir {
        Some("desc") => Order::Desc,
        _ => Order::Asc,
    }
}

/// Append one ORDER BY key per directive, in directive order.
///
/// Fails when a directive addresses a grid column with no sortable column
/// behind it.
pub fn apply_sort<E: EntityTrait>(
    records: Select<E>,
    registry: &ColumnRegistry,
    directives: &[OrderDirective],
) -> Result<Select<E>, GridError> {
    directives.iter().try_fold(records, |records, directive| {
        let column = registry.sort_column(directive.column).inspect_err(|_| {
            tracing::warn!(column = directive.column, "Sort requested on unsortable column");
        })?;
        Ok(records.order_by(column.expr(), sort_direction(directive.dir.as_deref())))
    })
}
