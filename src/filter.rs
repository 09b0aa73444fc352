//! Streaming row filter: one column against one reference value.
//!
//! The reference value is classified once and decides how every field in the
//! column is parsed. A field that cannot be read as the reference's type stops
//! the run with the row and column named. `--re` is the exception: it matches
//! the raw text and never parses.

use std::{
    borrow::Cow,
    io::{Read, Write},
};

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use regex::Regex;

use crate::{
    cli::FilterArgs,
    columns::{ColumnRef, resolve},
    compare::{self, Operator},
    config::Config,
    error::Error,
    inference::{Classifier, InferredType, Value},
    io_utils::{RecordSource, open_csv_writer, open_source},
    transform::string_ops,
};

#[derive(Debug)]
enum Predicate {
    Compare {
        op: Operator,
        reference: Value<'static>,
    },
    Regex(Regex),
}

#[derive(Debug)]
pub struct RowFilter {
    column: usize,
    predicate: Predicate,
    ignore_case: bool,
    exclude: bool,
    classifier: Classifier,
}

impl RowFilter {
    /// Builds a filter on the 1-based `column`.
    ///
    /// Fails up front for an invalid pattern or an ordering operator on a
    /// boolean reference.
    pub fn new(
        classifier: Classifier,
        column: usize,
        op: Operator,
        value: &str,
        ignore_case: bool,
        exclude: bool,
        no_infer: bool,
    ) -> Result<Self, Error> {
        let predicate = if op == Operator::Regex {
            let pattern = if ignore_case {
                format!("(?i){value}")
            } else {
                value.to_string()
            };
            Predicate::Regex(Regex::new(&pattern)?)
        } else {
            let reference = match (no_infer, classifier.classify(value)) {
                (true, _) | (false, Value::String(_)) if ignore_case => {
                    Value::String(Cow::Owned(string_ops::lowercase(value).into_owned()))
                }
                (true, _) => Value::String(Cow::Owned(value.to_string())),
                (false, classified) => classified.into_owned(),
            };
            let ty = reference.inferred_type();
            if ty == InferredType::Bool && op.is_ordering() {
                return Err(Error::IllegalOperator { op, ty });
            }
            Predicate::Compare { op, reference }
        };

        Ok(Self {
            column,
            predicate,
            ignore_case,
            exclude,
            classifier,
        })
    }

    /// The type fields are compared as; regular expressions always see text.
    pub fn comparison_type(&self) -> InferredType {
        match &self.predicate {
            Predicate::Compare { reference, .. } => reference.inferred_type(),
            Predicate::Regex(_) => InferredType::String,
        }
    }

    /// Whether the 1-based data `row` should be written.
    pub fn keep(&self, row: usize, record: &[String]) -> Result<bool, Error> {
        let field = record
            .get(self.column - 1)
            .map(String::as_str)
            .unwrap_or("");
        match &self.predicate {
            Predicate::Regex(regex) => Ok(regex.is_match(field) != self.exclude),
            Predicate::Compare { op, reference } => compare::matches(
                &self.classifier,
                field,
                *op,
                reference,
                self.ignore_case,
                self.exclude,
            )
            .map_err(|err| match err {
                Error::Parse { value, expected } => Error::TypeMismatch {
                    row,
                    column: self.column,
                    found: self.classifier.classify_type(&value),
                    value,
                    expected,
                    reference: reference.to_string(),
                },
                other => other,
            }),
        }
    }
}

pub fn execute(args: &FilterArgs, config: &Config) -> Result<()> {
    let (op, value) = args
        .operator()
        .ok_or_else(|| anyhow!("One of --eq, --ne, --gt, --gte, --lt, --lte or --re is required"))?;

    let mut source = open_source(args.input.as_deref(), config, false)?;
    let column = resolve(&[ColumnRef::Single(args.column)], source.headers().len())
        .context("Resolving --col")?[0];
    let filter = RowFilter::new(
        Classifier::new(config.time_layouts.clone()),
        column,
        op,
        value,
        args.ignore_case,
        args.exclude,
        args.no_infer,
    )
    .with_context(|| format!("Building filter '{op} {value}'"))?;
    debug!(
        "Filtering column {column} with {op} as {}",
        filter.comparison_type()
    );

    let mut writer = open_csv_writer(config, &source)?;
    let written = filter_rows(&filter, &mut source, &mut writer)?;
    writer.flush()?;
    info!("Kept {written} of {} row(s)", source.rows_read());
    Ok(())
}

pub fn filter_rows<R: Read, W: Write>(
    filter: &RowFilter,
    source: &mut RecordSource<R>,
    writer: &mut csv::Writer<W>,
) -> Result<usize> {
    writer.write_record(source.headers())?;
    let mut written = 0;
    for (idx, record) in source.records().enumerate() {
        let record = record?;
        if filter.keep(idx + 1, &record)? {
            writer.write_record(&record)?;
            written += 1;
        }
    }
    Ok(written)
}
