//! Owned predicate tree produced by the filter translator.
//!
//! The tree is independent of any store: the database layer renders it to
//! SQL, and [`Predicate::evaluate`] runs it against anything implementing
//! [`FieldSource`].

use std::cmp::Ordering;

use chrono::NaiveDate;

/// A literal on the right-hand side of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i64),
    Date(NaiveDate),
    /// Membership set for [`Comparison::In`].
    TextSet(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

/// `path <comparison> value`, where `path` is a dotted field path.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub path: String,
    pub comparison: Comparison,
    pub value: Value,
}

impl Condition {
    pub fn new(path: impl Into<String>, comparison: Comparison, value: Value) -> Self {
        Self {
            path: path.into(),
            comparison,
            value,
        }
    }

    /// Relation-traversal form of the path (`point.city.name` becomes
    /// `point__city__name`).
    pub fn store_path(&self) -> String {
        relation_path(&self.path)
    }
}

/// Convert a dotted path to its relation-traversal form.
pub fn relation_path(path: &str) -> String {
    path.replace('.', "__")
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// No constraint.
    Always,
    Condition(Condition),
    /// Conjunction. Empty means no constraint.
    All(Vec<Predicate>),
    /// Disjunction. Empty matches nothing.
    Any(Vec<Predicate>),
}

/// A field value read from a record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Text(String),
    Int(i64),
    Date(NaiveDate),
}

impl FieldValue {
    fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Null => None,
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Int(i) => Some(i.to_string()),
            FieldValue::Date(d) => Some(d.to_string()),
        }
    }
}

/// Record access by dotted field path.
pub trait FieldSource {
    fn field(&self, path: &str) -> FieldValue;
}

impl Predicate {
    /// Evaluate against a record. Conditions over null fields are false.
    pub fn evaluate<R: FieldSource + ?Sized>(&self, record: &R) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::Condition(cond) => evaluate_condition(cond, record),
            Predicate::All(parts) => parts.iter().all(|p| p.evaluate(record)),
            Predicate::Any(parts) => parts.iter().any(|p| p.evaluate(record)),
        }
    }
}

fn evaluate_condition<R: FieldSource + ?Sized>(cond: &Condition, record: &R) -> bool {
    let actual = record.field(&cond.path);
    if actual == FieldValue::Null {
        return false;
    }

    if let Value::TextSet(set) = &cond.value {
        return cond.comparison == Comparison::In
            && actual.as_text().is_some_and(|text| set.contains(&text));
    }

    let ordering = match (&actual, &cond.value) {
        (FieldValue::Text(a), Value::Text(b)) => Some(a.as_str().cmp(b.as_str())),
        (FieldValue::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (FieldValue::Date(a), Value::Date(b)) => Some(a.cmp(b)),
        // Integer columns compared against text the way a text cast would.
        (FieldValue::Int(a), Value::Text(b)) => Some(a.to_string().as_str().cmp(b.as_str())),
        (FieldValue::Text(a), Value::Int(b)) => Some(a.as_str().cmp(b.to_string().as_str())),
        _ => None,
    };

    let Some(ordering) = ordering else {
        return false;
    };
    match cond.comparison {
        Comparison::Eq => ordering == Ordering::Equal,
        Comparison::Gt => ordering == Ordering::Greater,
        Comparison::Gte => ordering != Ordering::Less,
        Comparison::Lt => ordering == Ordering::Less,
        Comparison::Lte => ordering != Ordering::Greater,
        Comparison::In => false,
    }
}

/// Inclusion constraint plus independent exclusions.
///
/// A record matches when it satisfies `include` and none of `exclude`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterQuery {
    pub include: Predicate,
    pub exclude: Vec<Predicate>,
}

impl Default for FilterQuery {
    fn default() -> Self {
        Self::unfiltered()
    }
}

impl FilterQuery {
    /// A query that matches everything.
    pub fn unfiltered() -> Self {
        Self {
            include: Predicate::Always,
            exclude: Vec::new(),
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.include == Predicate::Always && self.exclude.is_empty()
    }

    pub fn matches<R: FieldSource + ?Sized>(&self, record: &R) -> bool {
        self.include.evaluate(record) && !self.exclude.iter().any(|p| p.evaluate(record))
    }

    /// Keep the records that match, preserving order.
    pub fn apply<'a, R: FieldSource>(&self, records: &'a [R]) -> Vec<&'a R> {
        records.iter().filter(|r| self.matches(*r)).collect()
    }
}
