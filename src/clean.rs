use std::io::{Read, Write};

use anyhow::Result;
use log::info;

use crate::{
    cli::CleanArgs,
    config::Config,
    io_utils::{RecordSource, open_csv_writer, open_source},
    transform::string_ops,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct CleanOptions {
    /// Drop leading whitespace from every field, header included.
    pub trim: bool,
    /// Extend rows shorter than the header with empty fields.
    pub pad: bool,
}

pub fn execute(args: &CleanArgs, config: &Config) -> Result<()> {
    let options = CleanOptions {
        trim: args.trim,
        pad: args.pad,
    };
    let mut source = open_source(args.input.as_deref(), config, true)?;
    let mut writer = open_csv_writer(config, &source)?;
    let padded = clean(options, &mut source, &mut writer)?;
    writer.flush()?;
    info!(
        "Cleaned {} row(s); padded {padded} short row(s)",
        source.rows_read()
    );
    Ok(())
}

/// Re-emits every row with minimal quoting. Returns how many rows were padded.
pub fn clean<R: Read, W: Write>(
    options: CleanOptions,
    source: &mut RecordSource<R>,
    writer: &mut csv::Writer<W>,
) -> Result<usize> {
    let width = source.headers().len();
    writer.write_record(tidy(options, source.headers().to_vec(), width))?;

    let mut padded = 0;
    for record in source.records() {
        let record = record?;
        if options.pad && record.len() < width {
            padded += 1;
        }
        writer.write_record(tidy(options, record, width))?;
    }
    Ok(padded)
}

fn tidy(options: CleanOptions, mut record: Vec<String>, width: usize) -> Vec<String> {
    if options.trim {
        for field in &mut record {
            let leading = field.len() - string_ops::trim_leading(field).len();
            if leading > 0 {
                field.replace_range(..leading, "");
            }
        }
    }
    if options.pad && record.len() < width {
        record.resize(width, String::new());
    }
    record
}
