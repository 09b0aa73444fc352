//! I/O utilities for CSV reading, writing, encoding, and delimiter resolution.
//!
//! Every command reads through a [`RecordSource`] and writes through
//! [`open_csv_writer`] or [`open_output`]:
//!
//! - **Delimiter resolution**: extension-based detection (`.tsv` → tab) unless
//!   a delimiter was given on the command line or in the environment.
//! - **Encoding**: input is decoded with `encoding_rs`, defaulting to UTF-8.
//!   Output is always UTF-8.
//! - **stdin/stdout**: a missing path or `-` routes through standard streams.
//! - **Quoting**: CSV output quotes only fields that need it.

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};

use crate::config::Config;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn resolve_output_delimiter(path: Option<&Path>, provided: Option<u8>, fallback: u8) -> u8 {
    if let Some(delim) = provided {
        return delim;
    }
    if let Some(path) = path {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => return DEFAULT_TSV_DELIMITER,
            Some(ext) if ext.eq_ignore_ascii_case("csv") => return DEFAULT_CSV_DELIMITER,
            _ => {}
        }
    }
    fallback
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

/// A header row plus a stream of decoded data rows.
pub struct RecordSource<R: Read> {
    reader: csv::Reader<R>,
    encoding: &'static Encoding,
    delimiter: u8,
    headers: Vec<String>,
    row: usize,
}

impl<R: Read> RecordSource<R> {
    /// Reads the header row up front. An input with no header is an error.
    ///
    /// A `flexible` source accepts rows whose length differs from the header.
    pub fn new(
        reader: R,
        delimiter: u8,
        encoding: &'static Encoding,
        flexible: bool,
    ) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .delimiter(delimiter)
            .double_quote(true)
            .flexible(flexible)
            .from_reader(reader);

        let mut record = csv::ByteRecord::new();
        if !reader.read_byte_record(&mut record).context("Reading header row")? {
            return Err(anyhow!("No data: input has no header row"));
        }
        let headers = decode_record(&record, encoding).context("Decoding header row")?;

        Ok(Self {
            reader,
            encoding,
            delimiter,
            headers,
            row: 0,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Reads the next data row, or `None` at end of input.
    pub fn next_record(&mut self) -> Result<Option<Vec<String>>> {
        let mut record = csv::ByteRecord::new();
        let line = self.row + 2;
        if !self
            .reader
            .read_byte_record(&mut record)
            .with_context(|| format!("Reading row {}", self.row + 1))?
        {
            return Ok(None);
        }
        self.row += 1;
        let fields = decode_record(&record, self.encoding)
            .with_context(|| format!("Decoding row {} (line {line})", self.row))?;
        Ok(Some(fields))
    }

    /// Data rows read so far.
    pub fn rows_read(&self) -> usize {
        self.row
    }

    pub fn records(&mut self) -> Records<'_, R> {
        Records { source: self }
    }

    /// Buffers every remaining data row.
    pub fn read_all(&mut self) -> Result<Vec<Vec<String>>> {
        self.records().collect()
    }
}

pub struct Records<'s, R: Read> {
    source: &'s mut RecordSource<R>,
}

impl<R: Read> Iterator for Records<'_, R> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.source.next_record().transpose()
    }
}

/// Opens `path` (or stdin) with the configured delimiter and encoding.
pub fn open_source(
    path: Option<&Path>,
    config: &Config,
    flexible: bool,
) -> Result<RecordSource<Box<dyn Read>>> {
    let reader = open_reader(path)?;
    let delimiter = config.delimiter_for(path.filter(|p| !is_dash(p)));
    RecordSource::new(reader, delimiter, config.input_encoding, flexible)
}

/// Opens `path` for reading, or stdin when `path` is absent or `-`.
pub fn open_reader(path: Option<&Path>) -> Result<Box<dyn Read>> {
    Ok(match path {
        Some(p) if !is_dash(p) => Box::new(BufReader::new(
            File::open(p).with_context(|| format!("Opening input file {p:?}"))?,
        )),
        _ => Box::new(io::stdin().lock()),
    })
}

/// Reads all of `path` (or stdin) as text in the configured input encoding.
pub fn read_text(path: Option<&Path>, config: &Config) -> Result<String> {
    let mut bytes = Vec::new();
    open_reader(path)?
        .read_to_end(&mut bytes)
        .context("Reading input")?;
    decode_bytes(&bytes, config.input_encoding)
}

/// Opens `path` for writing, or stdout when `path` is absent or `-`.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(io::stdout().lock()),
    })
}

pub fn csv_writer<W: Write>(writer: W, delimiter: u8) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true)
        .flexible(true)
        .from_writer(writer)
}

/// Opens a CSV writer for the configured output. Without an explicit
/// delimiter, the output file's extension decides, else the input's delimiter
/// is reused.
pub fn open_csv_writer<R: Read>(
    config: &Config,
    source: &RecordSource<R>,
) -> Result<csv::Writer<Box<dyn Write>>> {
    open_csv_writer_with(config, source.delimiter())
}

/// Like [`open_csv_writer`], with `fallback` standing in for the input's
/// delimiter.
pub fn open_csv_writer_with(config: &Config, fallback: u8) -> Result<csv::Writer<Box<dyn Write>>> {
    let path = config.output.as_deref();
    let target = path.filter(|p| !is_dash(p));
    let delimiter = resolve_output_delimiter(target, config.delimiter, fallback);
    Ok(csv_writer(open_output(path)?, delimiter))
}
