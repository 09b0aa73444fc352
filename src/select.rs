use std::io::{Read, Write};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::{
    cli::SelectArgs,
    columns::{ColumnRef, complement, resolve},
    config::Config,
    io_utils::{RecordSource, open_csv_writer, open_source},
};

pub fn execute(args: &SelectArgs, config: &Config) -> Result<()> {
    let mut source = open_source(args.input.as_deref(), config, false)?;
    let columns = selected_columns(&args.columns, args.exclude, source.headers().len())
        .context("Resolving --cols")?;
    debug!("Selected columns: {columns:?}");

    let mut writer = open_csv_writer(config, &source)?;
    let written = select(&columns, &mut source, &mut writer)?;
    writer.flush()?;
    info!("Wrote {written} row(s) across {} column(s)", columns.len());
    Ok(())
}

/// Columns to emit, in output order. Excluding without any references keeps
/// every column.
pub fn selected_columns(refs: &[ColumnRef], exclude: bool, len: usize) -> Result<Vec<usize>> {
    if !exclude {
        return Ok(resolve(refs, len)?);
    }
    if refs.is_empty() {
        return Ok((1..=len).collect());
    }
    Ok(complement(&resolve(refs, len)?, len))
}

fn project<'r>(row: &'r [String], columns: &'r [usize]) -> impl Iterator<Item = &'r str> + 'r {
    columns
        .iter()
        .map(move |&column| row.get(column - 1).map(String::as_str).unwrap_or(""))
}

pub fn select<R: Read, W: Write>(
    columns: &[usize],
    source: &mut RecordSource<R>,
    writer: &mut csv::Writer<W>,
) -> Result<usize> {
    writer.write_record(project(source.headers(), columns))?;
    let mut written = 0;
    for record in source.records() {
        let record = record?;
        writer.write_record(project(&record, columns))?;
        written += 1;
    }
    Ok(written)
}
