use std::io::{Read, Write};

use anyhow::Result;

use crate::{
    cli::HeadersArgs,
    config::Config,
    io_utils::{RecordSource, open_csv_writer, open_source},
};

pub fn execute(args: &HeadersArgs, config: &Config) -> Result<()> {
    let mut source = open_source(args.input.as_deref(), config, false)?;
    let mut writer = open_csv_writer(config, &source)?;
    list_headers(args.zero_based, &mut source, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes an `Idx,Name` row per header column. Data rows are never read.
pub fn list_headers<R: Read, W: Write>(
    zero_based: bool,
    source: &mut RecordSource<R>,
    writer: &mut csv::Writer<W>,
) -> Result<()> {
    let first = usize::from(!zero_based);
    writer.write_record(["Idx", "Name"])?;
    for (idx, name) in source.headers().iter().enumerate() {
        writer.write_record([(idx + first).to_string().as_str(), name.as_str()])?;
    }
    Ok(())
}
