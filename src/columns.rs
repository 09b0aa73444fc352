//! Column references and their resolution against a header.
//!
//! Users name columns with 1-based indexes and ranges: `3`, `1-4`, `9-7`
//! (descending), `-3` (start through 3), `4-` (4 through the end) and `-`
//! (every column). [`resolve`] expands a list of references into a flat list
//! of positions, keeping the order given and any repeats.

use std::{fmt, str::FromStr};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRef {
    Single(usize),
    /// `None` on either side is open: the first or the last column.
    Range {
        start: Option<usize>,
        end: Option<usize>,
    },
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Single(index) => write!(f, "{index}"),
            ColumnRef::Range { start, end } => {
                if let Some(start) = start {
                    write!(f, "{start}")?;
                }
                f.write_str("-")?;
                if let Some(end) = end {
                    write!(f, "{end}")?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for ColumnRef {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self> {
        let syntax = |reason: &str| Error::ColumnSyntax {
            token: token.to_string(),
            reason: reason.to_string(),
        };
        if token.is_empty() {
            return Err(syntax("empty reference"));
        }
        let bound = |text: &str| -> Result<Option<usize>> {
            if text.is_empty() {
                return Ok(None);
            }
            if !text.bytes().all(|b| b.is_ascii_digit()) {
                return Err(syntax("expected a column number"));
            }
            text.parse::<usize>()
                .map(Some)
                .map_err(|_| syntax("column number is too large"))
        };

        match token.split_once('-') {
            None => bound(token)?
                .map(ColumnRef::Single)
                .ok_or_else(|| syntax("empty reference")),
            Some((_, rest)) if rest.contains('-') => Err(syntax("too many dashes")),
            Some((start, end)) => Ok(ColumnRef::Range {
                start: bound(start)?,
                end: bound(end)?,
            }),
        }
    }
}

/// Parses a comma-separated list such as `1,3-5,2`. An empty string yields no
/// references, which [`resolve`] reads as every column.
pub fn parse_column_refs(expr: &str) -> Result<Vec<ColumnRef>> {
    if expr.is_empty() {
        return Ok(Vec::new());
    }
    expr.split(',').map(ColumnRef::from_str).collect()
}

/// Expands `refs` into 1-based column positions for a header of `len`
/// columns. No references means all columns in header order.
pub fn resolve(refs: &[ColumnRef], len: usize) -> Result<Vec<usize>> {
    if refs.is_empty() {
        return Ok((1..=len).collect());
    }

    let mut columns = Vec::new();
    for reference in refs {
        let check = |index: usize| -> Result<usize> {
            if index < 1 || index > len {
                return Err(Error::ColumnOutOfBounds {
                    token: reference.to_string(),
                    index,
                    len,
                });
            }
            Ok(index)
        };

        match *reference {
            ColumnRef::Single(index) => columns.push(check(index)?),
            ColumnRef::Range { start, end } => {
                let start = match start {
                    Some(index) => check(index)?,
                    None => 1,
                };
                let end = match end {
                    Some(index) => check(index)?,
                    // `-` against an empty header names nothing.
                    None if len == 0 => continue,
                    None => len,
                };
                if start <= end {
                    columns.extend(start..=end);
                } else {
                    columns.extend((end..=start).rev());
                }
            }
        }
    }
    Ok(columns)
}

/// Header positions (1-based) that do not appear in `columns`, in header order.
pub fn complement(columns: &[usize], len: usize) -> Vec<usize> {
    (1..=len).filter(|index| !columns.contains(index)).collect()
}
