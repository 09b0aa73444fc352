use std::io::{Read, Write};

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use regex::Regex;

use crate::{
    cli::{CaseStyle, RenameArgs},
    columns::resolve,
    config::Config,
    io_utils::{RecordSource, open_csv_writer, open_source},
    transform::string_ops,
};

/// How selected header names are rewritten.
#[derive(Debug)]
pub enum Renaming {
    /// One replacement per selected column, in selection order.
    Names(Vec<String>),
    Regex { regex: Regex, replacement: String },
    Case(CaseStyle),
}

impl Renaming {
    pub fn from_args(args: &RenameArgs) -> Result<Self> {
        if let Some(pattern) = &args.regex {
            let regex = Regex::new(pattern)
                .with_context(|| format!("Compiling --regex '{pattern}'"))?;
            return Ok(Renaming::Regex {
                regex,
                replacement: args.repl.clone().unwrap_or_default(),
            });
        }
        if let Some(style) = args.case {
            return Ok(Renaming::Case(style));
        }
        if args.names.is_empty() {
            return Err(anyhow!("One of --names, --regex or --case is required"));
        }
        Ok(Renaming::Names(args.names.clone()))
    }

    /// Rewrites `headers` at the 1-based `columns`. A column listed twice is
    /// rewritten twice.
    pub fn apply(&self, headers: &[String], columns: &[usize]) -> Result<Vec<String>> {
        let mut renamed = headers.to_vec();
        match self {
            Renaming::Names(names) => {
                if names.len() != columns.len() {
                    return Err(anyhow!(
                        "Got {} name(s) for {} column(s); counts must match",
                        names.len(),
                        columns.len()
                    ));
                }
                for (&column, name) in columns.iter().zip(names) {
                    renamed[column - 1] = name.clone();
                }
            }
            Renaming::Regex { regex, replacement } => {
                for &column in columns {
                    let updated =
                        string_ops::regex_replace(&renamed[column - 1], regex, replacement)
                            .into_owned();
                    renamed[column - 1] = updated;
                }
            }
            Renaming::Case(style) => {
                for &column in columns {
                    let updated = string_ops::to_case(&renamed[column - 1], *style).into_owned();
                    renamed[column - 1] = updated;
                }
            }
        }
        Ok(renamed)
    }
}

pub fn execute(args: &RenameArgs, config: &Config) -> Result<()> {
    let renaming = Renaming::from_args(args)?;
    let mut source = open_source(args.input.as_deref(), config, false)?;
    let columns = resolve(&args.columns, source.headers().len()).context("Resolving --cols")?;
    debug!("Renaming columns {columns:?} with {renaming:?}");

    let mut writer = open_csv_writer(config, &source)?;
    let written = rename(&renaming, &columns, &mut source, &mut writer)?;
    writer.flush()?;
    info!("Renamed {} column(s); copied {written} row(s)", columns.len());
    Ok(())
}

/// Writes the renamed header, then copies every row unchanged.
pub fn rename<R: Read, W: Write>(
    renaming: &Renaming,
    columns: &[usize],
    source: &mut RecordSource<R>,
    writer: &mut csv::Writer<W>,
) -> Result<usize> {
    writer.write_record(renaming.apply(source.headers(), columns)?)?;
    let mut written = 0;
    for record in source.records() {
        writer.write_record(&record?)?;
        written += 1;
    }
    Ok(written)
}
