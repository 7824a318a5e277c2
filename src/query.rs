//! QuerySpec - immutable description of a remote query.
//!
//! The same `QuerySpec` value is handed to both `count` and `fetch`, so the
//! predicate set used to compute `total` can never drift from the one used to
//! fetch rows.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::Document;

/// Error type for query construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Page size must be a positive integer.
    ZeroPageSize,
    /// Fetch limit must be a positive integer.
    ZeroLimit,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::ZeroPageSize => write!(f, "page size must be greater than zero"),
            QueryError::ZeroLimit => write!(f, "fetch limit must be greater than zero"),
        }
    }
}

impl std::error::Error for QueryError {}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

/// Ordering field plus direction. Document identity is always appended as a
/// tie-break in the same direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Desc,
        }
    }

    /// Compare two documents under this ordering, breaking ties on id.
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let primary = compare_values(&a.value_of(&self.field), &b.value_of(&self.field))
            .then_with(|| a.id.cmp(&b.id));
        match self.direction {
            Direction::Asc => primary,
            Direction::Desc => primary.reverse(),
        }
    }
}

/// Predicate operators the store understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl Operator {
    pub fn is_range(self) -> bool {
        !matches!(self, Operator::Eq)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Operator::Eq => "==",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
        };
        f.write_str(symbol)
    }
}

/// A single `field <op> value` predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub field: String,
    pub operator: Operator,
    pub value: Value,
}

impl Predicate {
    pub fn new(field: impl Into<String>, operator: Operator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    pub fn equals(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, Operator::Eq, value)
    }

    /// Evaluate the predicate against a document. Values of a different JSON
    /// kind than the operand never match.
    pub fn matches(&self, doc: &Document) -> bool {
        let actual = doc.value_of(&self.field);
        if kind_rank(&actual) != kind_rank(&self.value) {
            return false;
        }
        let ord = compare_values(&actual, &self.value);
        match self.operator {
            Operator::Eq => ord == Ordering::Equal,
            Operator::Lt => ord == Ordering::Less,
            Operator::Lte => ord != Ordering::Greater,
            Operator::Gt => ord == Ordering::Greater,
            Operator::Gte => ord != Ordering::Less,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.value)
    }
}

/// Immutable remote query: collection, ordering, predicates and page size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    collection: String,
    order_by: OrderBy,
    filters: Vec<Predicate>,
    page_size: usize,
}

impl QuerySpec {
    pub fn new(
        collection: impl Into<String>,
        order_by: OrderBy,
        page_size: usize,
    ) -> Result<Self, QueryError> {
        if page_size == 0 {
            return Err(QueryError::ZeroPageSize);
        }
        Ok(Self {
            collection: collection.into(),
            order_by,
            filters: Vec::new(),
            page_size,
        })
    }

    /// Return a new spec with an additional predicate.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filters.push(predicate);
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn order_by(&self) -> &OrderBy {
        &self.order_by
    }

    pub fn filters(&self) -> &[Predicate] {
        &self.filters
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// True if the document satisfies every predicate.
    pub fn matches(&self, doc: &Document) -> bool {
        self.filters.iter().all(|p| p.matches(doc))
    }
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) | Value::Object(_) => 4,
    }
}

/// Total order over JSON values: `null < bool < number < string < composite`.
/// Composite values compare by their serialized text.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => match kind_rank(a).cmp(&kind_rank(b)) {
            Ordering::Equal => a.to_string().cmp(&b.to_string()),
            other => other,
        },
    }
}
