//! `convert`: turn whitespace-separated fields or a Markdown table into CSV.
//!
//! The Markdown reader understands the tables `view --md` writes: a header
//! row, a delimiter row of dashes with optional colons, then body rows until
//! the first line that is not a table row. `\|` is a literal pipe and `<br>`
//! a line break inside a cell.

use std::io::Write;

use anyhow::{Result, anyhow};
use log::info;

use crate::{
    cli::ConvertArgs,
    config::Config,
    io_utils::{DEFAULT_CSV_DELIMITER, open_csv_writer_with, read_text},
};

pub fn execute(args: &ConvertArgs, config: &Config) -> Result<()> {
    let text = read_text(args.input.as_deref(), config)?;
    let rows = if args.md {
        markdown_to_rows(&text)?
    } else {
        fields_to_rows(&text)
    };

    let mut writer = open_csv_writer_with(config, DEFAULT_CSV_DELIMITER)?;
    write_rows(&rows, &mut writer)?;
    writer.flush()?;
    info!("Converted {} line(s)", rows.len());
    Ok(())
}

pub fn write_rows<W: Write>(rows: &[Vec<String>], writer: &mut csv::Writer<W>) -> Result<()> {
    for row in rows {
        writer.write_record(row)?;
    }
    Ok(())
}

/// One row per non-blank line, split on runs of whitespace.
pub fn fields_to_rows(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .map(|line| line.split_whitespace().map(str::to_string).collect::<Vec<_>>())
        .filter(|row| !row.is_empty())
        .collect()
}

/// Rows of the first Markdown table in `text`, header first. Body rows are
/// cut or padded to the header's width.
pub fn markdown_to_rows(text: &str) -> Result<Vec<Vec<String>>> {
    let lines = text.lines().collect::<Vec<_>>();
    let start = lines
        .windows(2)
        .position(|pair| is_table_start(pair[0], pair[1]))
        .ok_or_else(|| anyhow!("Could not find a Markdown table"))?;

    let header = split_row(lines[start]);
    let width = header.len();
    let mut rows = vec![header];
    for line in &lines[start + 2..] {
        if !line.contains('|') {
            break;
        }
        let mut row = split_row(line);
        row.resize(width, String::new());
        rows.push(row);
    }
    Ok(rows)
}

fn is_table_start(header: &str, delimiter: &str) -> bool {
    if !header.contains('|') || !delimiter.contains(['|', '-']) {
        return false;
    }
    let cells = split_row(delimiter);
    cells.len() == split_row(header).len() && cells.iter().all(|cell| is_delimiter_cell(cell))
}

fn is_delimiter_cell(cell: &str) -> bool {
    let dashes = cell.strip_prefix(':').unwrap_or(cell);
    let dashes = dashes.strip_suffix(':').unwrap_or(dashes);
    !dashes.is_empty() && dashes.bytes().all(|b| b == b'-')
}

/// Splits on unescaped pipes, dropping the optional outer pipes.
fn split_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let trimmed = match trimmed.strip_suffix('|') {
        Some(rest) if !rest.ends_with('\\') => rest,
        _ => trimmed,
    };

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = trimmed.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'|') => {
                cell.push('|');
                chars.next();
            }
            '|' => cells.push(finish_cell(&mut cell)),
            other => cell.push(other),
        }
    }
    cells.push(finish_cell(&mut cell));
    cells
}

fn finish_cell(cell: &mut String) -> String {
    let text = cell.trim().replace("<br>", "\n");
    cell.clear();
    text
}
