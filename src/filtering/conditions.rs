use sea_orm::sea_query::{Alias, BinOper, Expr, Func, SimpleExpr};

use crate::columns::ColumnRef;
use crate::config::Dialect;

/// Escape character for LIKE patterns, literal in every backend's strings
const LIKE_ESCAPE: char = '!';

/// Escape LIKE wildcards so the search value matches literally.
fn escape_like_wildcards(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Case-insensitive substring match of `value` against `column`, with the
/// column cast to the dialect's text type so non-text columns are searchable
/// too.
///
/// Renders as
/// `UPPER(CAST("qualifier"."column" AS <type>)) LIKE UPPER('%value%') ESCAPE '!'`.
/// Both sides are folded by the database's `UPPER`. The value is bound as a
/// parameter.
#[must_use]
pub fn search_condition(column: &ColumnRef, value: &str, dialect: Dialect) -> SimpleExpr {
    let casted = Func::cast_as(column.expr(), Alias::new(dialect.typecast()));
    let folded_column = SimpleExpr::FunctionCall(Func::upper(SimpleExpr::FunctionCall(casted)));

    let pattern = format!("%{}%", escape_like_wildcards(value));
    let folded_pattern = SimpleExpr::FunctionCall(Func::upper(Expr::val(pattern)));
    let escaped_pattern = SimpleExpr::Binary(
        Box::new(folded_pattern),
        BinOper::Escape,
        Box::new(SimpleExpr::Constant(LIKE_ESCAPE.into())),
    );

    SimpleExpr::Binary(
        Box::new(folded_column),
        BinOper::Like,
        Box::new(escaped_pattern),
    )
}
