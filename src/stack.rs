//! `stack`: concatenate inputs that share a header.
//!
//! Inputs are opened one at a time, so an input whose header differs from the
//! first stops the run after everything before it has been written.

use std::io::{Read, Write};

use anyhow::{Context, Result, anyhow};
use log::{debug, info};

use crate::{
    cli::StackArgs,
    config::Config,
    io_utils::{RecordSource, is_dash, open_csv_writer_with, open_source},
};

pub fn execute(args: &StackArgs, config: &Config) -> Result<()> {
    if args.inputs.iter().filter(|path| is_dash(path)).count() > 1 {
        return Err(anyhow!("stdin ('-') can only be stacked once"));
    }
    let first = args
        .inputs
        .first()
        .ok_or_else(|| anyhow!("At least two inputs are required"))?;
    debug!("Stacking {} input(s)", args.inputs.len());

    let mut writer = open_csv_writer_with(config, config.delimiter_for(Some(first.as_path()).filter(|p| !is_dash(p))))?;
    let sources = args
        .inputs
        .iter()
        .map(|path| open_source(Some(path.as_path()), config, false));
    let written = stack(sources, &mut writer)?;
    writer.flush()?;
    info!("Stacked {written} row(s) from {} input(s)", args.inputs.len());
    Ok(())
}

/// Writes the first source's header, then the rows of every source in turn.
/// Sources are 1-based in error messages.
pub fn stack<R, W, I>(sources: I, writer: &mut csv::Writer<W>) -> Result<usize>
where
    R: Read,
    W: Write,
    I: IntoIterator<Item = Result<RecordSource<R>>>,
{
    let mut first_header: Option<Vec<String>> = None;
    let mut written = 0;
    for (idx, source) in sources.into_iter().enumerate() {
        let label = idx + 1;
        let mut source = source.with_context(|| format!("Input #{label}"))?;
        match &first_header {
            None => {
                writer.write_record(source.headers())?;
                first_header = Some(source.headers().to_vec());
            }
            Some(header) if header.as_slice() != source.headers() => {
                return Err(anyhow!(
                    "Input #{label}: header [{}] doesn't match first header [{}]",
                    source.headers().join(","),
                    header.join(",")
                ));
            }
            Some(_) => {}
        }
        for record in source.records() {
            let record = record.with_context(|| format!("Input #{label}"))?;
            writer.write_record(&record)?;
            written += 1;
        }
    }
    Ok(written)
}
