//! Value classification and per-column type inference.
//!
//! Every field arrives as text. [`Classifier::classify`] tries typed parses in
//! a fixed order (number, boolean, time) and falls back to string.
//! [`infer_column_types`] runs the classifier down whole columns and widens a
//! column to [`InferredType::String`] as soon as two of its values disagree.

use std::{borrow::Cow, cmp::Ordering, fmt};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
    config::TimeLayouts,
    error::{Error, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InferredType {
    Number,
    Bool,
    Time,
    String,
}

impl InferredType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InferredType::Number => "Number",
            InferredType::Bool => "Bool",
            InferredType::Time => "Time",
            InferredType::String => "String",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            InferredType::Number => 0,
            InferredType::Bool => 1,
            InferredType::Time => 2,
            InferredType::String => 3,
        }
    }
}

impl fmt::Display for InferredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field after classification. Numbers may be infinite or NaN when spelled
/// out (`inf`, `-Infinity`, `NaN`); NaN orders below every other number.
#[derive(Debug, Clone)]
pub enum Value<'a> {
    Number(f64),
    Bool(bool),
    Time(NaiveDateTime),
    String(Cow<'a, str>),
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value<'_> {}

impl Value<'_> {
    pub fn inferred_type(&self) -> InferredType {
        match self {
            Value::Number(_) => InferredType::Number,
            Value::Bool(_) => InferredType::Bool,
            Value::Time(_) => InferredType::Time,
            Value::String(_) => InferredType::String,
        }
    }

    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Number(n) => Value::Number(n),
            Value::Bool(b) => Value::Bool(b),
            Value::Time(t) => Value::Time(t),
            Value::String(s) => Value::String(Cow::Owned(s.into_owned())),
        }
    }
}

impl Ord for Value<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => compare_numbers(*a, *b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Time(a), Value::Time(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.as_bytes().cmp(b.as_bytes()),
            (a, b) => a.inferred_type().rank().cmp(&b.inferred_type().rank()),
        }
    }
}

impl PartialOrd for Value<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Time(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S")),
            Value::String(s) => f.write_str(s),
        }
    }
}

/// Total order over floats: NaN equals NaN and sorts first; `-0` equals `0`.
pub fn compare_numbers(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Parses a base-10 float. Infinities and NaN count only when spelled out;
/// a literal that overflows to infinity, such as `1e999`, is not a number.
pub fn parse_number(text: &str) -> Option<f64> {
    let n = text.parse::<f64>().ok()?;
    if n.is_finite() || is_special_literal(text) {
        Some(n)
    } else {
        None
    }
}

fn is_special_literal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    if unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity") {
        return true;
    }
    // A sign on NaN is meaningless and is not accepted.
    text.eq_ignore_ascii_case("nan")
}

pub fn parse_bool(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "t" => Some(true),
        "false" | "f" => Some(false),
        _ => None,
    }
}

/// Classifies raw text against a fixed set of time layouts.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    layouts: TimeLayouts,
}

impl Classifier {
    pub fn new(layouts: TimeLayouts) -> Self {
        Self { layouts }
    }

    /// Returns the most specific value `text` parses as. Never fails.
    pub fn classify<'a>(&self, text: &'a str) -> Value<'a> {
        if let Some(n) = parse_number(text) {
            return Value::Number(n);
        }
        if let Some(b) = parse_bool(text) {
            return Value::Bool(b);
        }
        if let Some(t) = self.layouts.parse(text) {
            return Value::Time(t);
        }
        Value::String(Cow::Borrowed(text))
    }

    pub fn classify_type(&self, text: &str) -> InferredType {
        self.classify(text).inferred_type()
    }

    /// Parses `text` as `ty`, failing when it does not fit.
    pub fn parse_as<'a>(&self, text: &'a str, ty: InferredType) -> Result<Value<'a>> {
        let parsed = match ty {
            InferredType::Number => parse_number(text).map(Value::Number),
            InferredType::Bool => parse_bool(text).map(Value::Bool),
            InferredType::Time => self.layouts.parse(text).map(Value::Time),
            InferredType::String => Some(Value::String(Cow::Borrowed(text))),
        };
        parsed.ok_or_else(|| Error::Parse {
            value: text.to_string(),
            expected: ty,
        })
    }
}

/// Infers one type per 1-based column in `columns` across every row.
///
/// # Panics
///
/// Panics if `rows` or `columns` is empty.
pub fn infer_column_types<R>(
    classifier: &Classifier,
    rows: &[R],
    columns: &[usize],
) -> Vec<InferredType>
where
    R: AsRef<[String]>,
{
    assert!(!rows.is_empty(), "infer_column_types requires at least one row");
    assert!(
        !columns.is_empty(),
        "infer_column_types requires at least one column"
    );

    let mut types = columns
        .iter()
        .map(|&column| classifier.classify_type(cell(&rows[0], column)))
        .collect::<Vec<_>>();

    for row in &rows[1..] {
        if types.iter().all(|ty| *ty == InferredType::String) {
            break;
        }
        for (ty, &column) in types.iter_mut().zip(columns) {
            if *ty != InferredType::String && classifier.classify_type(cell(row, column)) != *ty {
                *ty = InferredType::String;
            }
        }
    }

    types
}

/// Like [`infer_column_types`], but without data rows or columns there is
/// nothing to learn from and every column reads as [`InferredType::String`].
pub fn infer_column_types_or_string<R>(
    classifier: &Classifier,
    rows: &[R],
    columns: &[usize],
) -> Vec<InferredType>
where
    R: AsRef<[String]>,
{
    if rows.is_empty() || columns.is_empty() {
        return vec![InferredType::String; columns.len()];
    }
    infer_column_types(classifier, rows, columns)
}

/// A missing cell reads as empty text.
fn cell<R: AsRef<[String]>>(row: &R, column: usize) -> &str {
    row.as_ref()
        .get(column - 1)
        .map(String::as_str)
        .unwrap_or("")
}
