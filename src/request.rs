//! # Grid Request
//!
//! The parameters a data-grid widget sends for one page of results. Two
//! inbound shapes are accepted:
//!
//! - JSON (`GridRequest` implements `Deserialize`):
//!   ```json
//!   {"draw": "1", "start": 0, "length": 10,
//!    "order": {"0": {"column": "0", "dir": "asc"}},
//!    "search": {"value": "ann jo"},
//!    "columns": {"1": {"search": {"value": "example"}}}}
//!   ```
//!   Lists may be arrays or objects keyed by stringified indices.
//! - The bracket-notation query string DataTables sends for GET requests,
//!   via [`GridRequest::from_query`]:
//!   `draw=1&start=0&length=10&order[0][column]=0&order[0][dir]=asc&search[value]=ann`
//!
//! Numbers are coerced permissively: a leading integer is taken from strings
//! (`"12abc"` reads as 12) and anything unparseable falls back to a default
//! instead of failing.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Page size used when `length` is absent, unparseable or not positive
pub const DEFAULT_PAGE_LENGTH: u64 = 10;

/// Requested page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLength {
    /// `length=-1`: return every row
    Unlimited,
    Rows(u64),
}

impl Default for PageLength {
    fn default() -> Self {
        Self::Rows(DEFAULT_PAGE_LENGTH)
    }
}

impl PageLength {
    fn from_value(value: Option<&Value>) -> Self {
        let Some(value) = value else {
            return Self::default();
        };
        let is_sentinel = match value {
            Value::String(s) => s.trim() == "-1",
            Value::Number(n) => n.as_i64() == Some(-1),
            _ => false,
        };
        if is_sentinel {
            return Self::Unlimited;
        }
        match coerce_int(value).and_then(|n| u64::try_from(n).ok()) {
            Some(rows) if rows > 0 => Self::Rows(rows),
            _ => Self::default(),
        }
    }
}

/// One `order[i]` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDirective {
    /// Grid column index into the sortable columns
    pub column: i64,
    /// Raw direction as sent; only the exact string `"desc"` sorts descending
    pub dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchTerm {
    pub value: String,
}

impl SearchTerm {
    /// `true` when the value holds something other than whitespace
    #[must_use]
    pub fn is_present(&self) -> bool {
        !self.value.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Value")]
pub struct GridRequest {
    /// Echo token, returned untouched in the response
    pub draw: i64,
    /// Row offset of the first requested row
    pub start: u64,
    pub length: PageLength,
    /// Sort directives, primary key first
    pub order: Vec<OrderDirective>,
    /// Global free-text search; `None` when the request carries no `search`
    pub search: Option<SearchTerm>,
    /// Per-column search terms keyed by column index
    pub columns: BTreeMap<usize, SearchTerm>,
}

impl GridRequest {
    /// Parse a URL query string using DataTables bracket notation.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut root = Map::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            insert_path(&mut root, &key_path(&key), value.into_owned());
        }
        Self::from(Value::Object(root))
    }

    /// Non-blank search value for grid column `index`, if any
    #[must_use]
    pub fn column_search(&self, index: usize) -> Option<&str> {
        self.columns
            .get(&index)
            .filter(|term| term.is_present())
            .map(|term| term.value.as_str())
    }
}

impl From<Value> for GridRequest {
    fn from(value: Value) -> Self {
        let order = indexed_entries(value.get("order"))
            .into_iter()
            .map(|(_, item)| OrderDirective {
                column: item.get("column").and_then(coerce_int).unwrap_or(0),
                dir: item.get("dir").and_then(value_as_string),
            })
            .collect();

        let search = value.get("search").and_then(search_term);

        let columns = indexed_entries(value.get("columns"))
            .into_iter()
            .filter_map(|(index, item)| Some((index?, search_term(item.get("search")?)?)))
            .collect();

        Self {
            draw: value.get("draw").and_then(coerce_int).unwrap_or(0),
            start: value
                .get("start")
                .and_then(coerce_int)
                .and_then(|n| u64::try_from(n).ok())
                .unwrap_or(0),
            length: PageLength::from_value(value.get("length")),
            order,
            search,
            columns,
        }
    }
}

fn search_term(value: &Value) -> Option<SearchTerm> {
    match value {
        Value::Object(map) => Some(SearchTerm {
            value: map.get("value").and_then(value_as_string).unwrap_or_default(),
        }),
        // `search=` with no sub-keys still counts as a search being sent
        Value::String(s) => Some(SearchTerm { value: s.clone() }),
        _ => None,
    }
}

/// Entries of an array (positional) or of an object keyed by stringified
/// indices, in arrival order. Object keys that are not indices yield `None`.
fn indexed_entries(value: Option<&Value>) -> Vec<(Option<usize>, &Value)> {
    match value {
        Some(Value::Array(items)) => items.iter().enumerate().map(|(i, v)| (Some(i), v)).collect(),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(key, v)| (key.trim().parse::<usize>().ok(), v))
            .collect(),
        _ => Vec::new(),
    }
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Integer coercion in the tolerant style of the inbound protocol.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => leading_integer(s),
        _ => None,
    }
}

fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Split `order[0][column]` into `["order", "0", "column"]`.
fn key_path(key: &str) -> Vec<String> {
    let Some(open) = key.find('[') else {
        return vec![key.to_string()];
    };
    let mut path = vec![key[..open].to_string()];
    let mut rest = &key[open..];
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            // unterminated bracket, keep the remainder verbatim
            path.push(inner.to_string());
            return path;
        };
        path.push(inner[..close].to_string());
        rest = &inner[close + 1..];
    }
    path
}

fn insert_path(root: &mut Map<String, Value>, path: &[String], value: String) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut node = root;
    for segment in parents {
        let entry = node
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(child) = entry else {
            return;
        };
        node = child;
    }
    node.insert(last.clone(), Value::String(value));
}
