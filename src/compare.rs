//! Typed ordering and match predicates over raw text fields.
//!
//! [`compare`] orders two fields under a known type and is what `sort` keys
//! reduce to. [`matches`] tests one field against a classified reference
//! value for `filter`. Regular-expression matching is type-agnostic and is
//! done by the caller with a compiled [`regex::Regex`], never here.

use std::{borrow::Cow, cmp::Ordering, fmt, str::FromStr};

use crate::{
    error::{Error, Result},
    inference::{Classifier, InferredType, Value},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Regex,
}

impl Operator {
    pub const TOKENS: &'static [&'static str] = &["eq", "ne", "gt", "gte", "lt", "lte", "re"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Regex => "re",
        }
    }

    /// True for the operators that need an ordering rather than equality.
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte
        )
    }

    fn holds(&self, ordering: Ordering) -> bool {
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Ne => ordering != Ordering::Equal,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Gte => ordering != Ordering::Less,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Lte => ordering != Ordering::Greater,
            Operator::Regex => false,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self> {
        match token {
            "eq" => Ok(Operator::Eq),
            "ne" => Ok(Operator::Ne),
            "gt" => Ok(Operator::Gt),
            "gte" => Ok(Operator::Gte),
            "lt" => Ok(Operator::Lt),
            "lte" => Ok(Operator::Lte),
            "re" => Ok(Operator::Regex),
            other => Err(Error::UnknownOperator(other.to_string())),
        }
    }
}

/// Orders two raw fields after parsing both as `ty`.
pub fn compare(classifier: &Classifier, a: &str, b: &str, ty: InferredType) -> Result<Ordering> {
    let left = classifier.parse_as(a, ty)?;
    let right = classifier.parse_as(b, ty)?;
    Ok(left.cmp(&right))
}

/// Tests `raw` against `reference` with `op`; the reference's variant decides
/// how `raw` is parsed.
///
/// With `case_insensitive`, a string `raw` is lower-cased before comparing; the
/// caller is expected to have lower-cased a string reference already.
/// `negate` inverts the outcome of a successful evaluation.
pub fn matches(
    classifier: &Classifier,
    raw: &str,
    op: Operator,
    reference: &Value<'_>,
    case_insensitive: bool,
    negate: bool,
) -> Result<bool> {
    let ty = reference.inferred_type();
    if op == Operator::Regex || (ty == InferredType::Bool && op.is_ordering()) {
        return Err(Error::IllegalOperator { op, ty });
    }

    let candidate = match ty {
        InferredType::String if case_insensitive => Value::String(Cow::Owned(raw.to_lowercase())),
        _ => classifier.parse_as(raw, ty)?,
    };
    let matched = op.holds(candidate.cmp(reference));
    Ok(matched != negate)
}
