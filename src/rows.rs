//! `head` and `tail`: leading or trailing rows, with the header always kept.

use std::{collections::VecDeque, io::Read, io::Write};

use anyhow::Result;
use log::info;

use crate::{
    cli::{HeadArgs, TailArgs},
    config::Config,
    io_utils::{RecordSource, open_csv_writer, open_source},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadCount {
    First(usize),
    /// Everything except the trailing `n` rows.
    AllButLast(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailCount {
    Last(usize),
    /// Everything from the `n`th data row (1-based) on.
    From(usize),
}

pub fn execute_head(args: &HeadArgs, config: &Config) -> Result<()> {
    let mut source = open_source(args.input.as_deref(), config, false)?;
    let mut writer = open_csv_writer(config, &source)?;
    let written = head(args.count, &mut source, &mut writer)?;
    writer.flush()?;
    info!("Wrote {written} of {} row(s)", source.rows_read());
    Ok(())
}

pub fn execute_tail(args: &TailArgs, config: &Config) -> Result<()> {
    let mut source = open_source(args.input.as_deref(), config, false)?;
    let mut writer = open_csv_writer(config, &source)?;
    let written = tail(args.count, &mut source, &mut writer)?;
    writer.flush()?;
    info!("Wrote {written} of {} row(s)", source.rows_read());
    Ok(())
}

pub fn head<R: Read, W: Write>(
    count: HeadCount,
    source: &mut RecordSource<R>,
    writer: &mut csv::Writer<W>,
) -> Result<usize> {
    writer.write_record(source.headers())?;
    let mut written = 0;
    match count {
        HeadCount::First(n) => {
            while written < n {
                let Some(record) = source.next_record()? else {
                    break;
                };
                writer.write_record(&record)?;
                written += 1;
            }
        }
        HeadCount::AllButLast(n) => {
            // Hold back `n` rows; whatever falls out the front is safe to write.
            let mut held = VecDeque::new();
            for record in source.records() {
                held.push_back(record?);
                if held.len() > n
                    && let Some(record) = held.pop_front()
                {
                    writer.write_record(&record)?;
                    written += 1;
                }
            }
        }
    }
    Ok(written)
}

pub fn tail<R: Read, W: Write>(
    count: TailCount,
    source: &mut RecordSource<R>,
    writer: &mut csv::Writer<W>,
) -> Result<usize> {
    writer.write_record(source.headers())?;
    let mut written = 0;
    match count {
        TailCount::Last(n) => {
            let mut kept = VecDeque::new();
            for record in source.records() {
                kept.push_back(record?);
                if kept.len() > n {
                    kept.pop_front();
                }
            }
            for record in &kept {
                writer.write_record(record)?;
                written += 1;
            }
        }
        TailCount::From(n) => {
            for record in source.records().skip(n.saturating_sub(1)) {
                writer.write_record(&record?)?;
                written += 1;
            }
        }
    }
    Ok(written)
}
