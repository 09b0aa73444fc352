use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand, ValueEnum, builder::RangedU64ValueParser};

use crate::{
    columns::ColumnRef,
    compare::Operator,
    rows::{HeadCount, TailCount},
};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Select, filter, sort, and inspect CSV files with inferred column types",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, global = true, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding", global = true)]
    pub input_encoding: Option<String>,
    /// Additional strftime layout used to recognise dates and times (repeatable)
    #[arg(long = "time-layout", global = true, action = ArgAction::Append)]
    pub time_layouts: Vec<String>,
    /// Output file (stdout if omitted or '-')
    #[arg(short = 'o', long = "output", global = true)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Project, reorder, duplicate, or exclude columns
    Select(SelectArgs),
    /// Keep rows whose column matches a typed comparison
    Filter(FilterArgs),
    /// Sort rows by one or more columns using inferred types
    Sort(SortArgs),
    /// Rename header columns
    Rename(RenameArgs),
    /// Render rows as an aligned text or Markdown table
    View(ViewArgs),
    /// Report the inferred type of every column
    Describe(DescribeArgs),
    /// Print the first rows
    Head(HeadArgs),
    /// Print the last rows
    Tail(TailArgs),
    /// List header names with their column numbers
    Headers(HeadersArgs),
    /// Re-emit CSV, optionally trimming fields and padding short rows
    Clean(CleanArgs),
    /// Concatenate inputs that share the same header
    Stack(StackArgs),
    /// Convert whitespace-separated fields or a Markdown table to CSV
    Convert(ConvertArgs),
}

#[derive(Debug, Args)]
pub struct SelectArgs {
    /// Input CSV file (stdin if omitted or '-')
    pub input: Option<PathBuf>,
    /// Columns such as `1,3-5,7-` (all columns if omitted)
    #[arg(short = 'c', long = "cols", value_delimiter = ',', allow_hyphen_values = true)]
    pub columns: Vec<ColumnRef>,
    /// Write the columns not referenced instead
    #[arg(long)]
    pub exclude: bool,
}

#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("operator")
        .required(true)
        .args(["eq", "ne", "gt", "gte", "lt", "lte", "re"])
))]
pub struct FilterArgs {
    /// Input CSV file (stdin if omitted or '-')
    pub input: Option<PathBuf>,
    /// Column to compare (1-based)
    #[arg(long = "col", default_value_t = 1)]
    pub column: usize,
    /// Keep rows equal to the value
    #[arg(long, allow_hyphen_values = true)]
    pub eq: Option<String>,
    /// Keep rows not equal to the value
    #[arg(long, allow_hyphen_values = true)]
    pub ne: Option<String>,
    /// Keep rows greater than the value
    #[arg(long, allow_hyphen_values = true)]
    pub gt: Option<String>,
    /// Keep rows greater than or equal to the value
    #[arg(long, allow_hyphen_values = true)]
    pub gte: Option<String>,
    /// Keep rows less than the value
    #[arg(long, allow_hyphen_values = true)]
    pub lt: Option<String>,
    /// Keep rows less than or equal to the value
    #[arg(long, allow_hyphen_values = true)]
    pub lte: Option<String>,
    /// Keep rows matching the regular expression
    #[arg(long, allow_hyphen_values = true)]
    pub re: Option<String>,
    /// Compare strings and regular expressions case-insensitively
    #[arg(short = 'i', long = "ignore-case")]
    pub ignore_case: bool,
    /// Drop matching rows instead of keeping them
    #[arg(long)]
    pub exclude: bool,
    /// Compare the value as a string instead of inferring its type
    #[arg(long = "no-infer")]
    pub no_infer: bool,
}

impl FilterArgs {
    /// The operator flag that was set, with its value.
    pub fn operator(&self) -> Option<(Operator, &str)> {
        [
            (Operator::Eq, &self.eq),
            (Operator::Ne, &self.ne),
            (Operator::Gt, &self.gt),
            (Operator::Gte, &self.gte),
            (Operator::Lt, &self.lt),
            (Operator::Lte, &self.lte),
            (Operator::Regex, &self.re),
        ]
        .into_iter()
        .find_map(|(op, value)| value.as_deref().map(|v| (op, v)))
    }
}

#[derive(Debug, Args)]
pub struct SortArgs {
    /// Input CSV file (stdin if omitted or '-')
    pub input: Option<PathBuf>,
    /// Sort keys in priority order (all columns if omitted)
    #[arg(short = 'c', long = "cols", value_delimiter = ',', allow_hyphen_values = true)]
    pub columns: Vec<ColumnRef>,
    /// Sort in descending order
    #[arg(short = 'r', long = "reversed")]
    pub reversed: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum CaseStyle {
    Snake,
    Camel,
    Pascal,
}

#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["names", "regex", "case"])
))]
pub struct RenameArgs {
    /// Input CSV file (stdin if omitted or '-')
    pub input: Option<PathBuf>,
    /// Columns to rename (all columns if omitted)
    #[arg(short = 'c', long = "cols", value_delimiter = ',', allow_hyphen_values = true)]
    pub columns: Vec<ColumnRef>,
    /// New names, one per resolved column
    #[arg(long, value_delimiter = ',')]
    pub names: Vec<String>,
    /// Regular expression applied to each selected name
    #[arg(long)]
    pub regex: Option<String>,
    /// Replacement for `--regex` matches (supports `$1` captures)
    #[arg(long, requires = "regex")]
    pub repl: Option<String>,
    /// Convert selected names to a case style
    #[arg(long, value_enum)]
    pub case: Option<CaseStyle>,
}

#[derive(Debug, Args)]
pub struct ViewArgs {
    /// Input CSV file (stdin if omitted or '-')
    pub input: Option<PathBuf>,
    /// Render a Markdown table
    #[arg(long)]
    pub md: bool,
    /// Truncate cells wider than this many characters
    #[arg(long = "maxw", value_parser = RangedU64ValueParser::<usize>::new().range(3..))]
    pub max_width: Option<usize>,
    /// Cut multi-line cells to this many lines
    #[arg(long = "maxh", value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub max_height: Option<usize>,
}

#[derive(Debug, Args)]
pub struct DescribeArgs {
    /// Input CSV file (stdin if omitted or '-')
    pub input: Option<PathBuf>,
    /// Emit JSON instead of CSV
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct HeadArgs {
    /// Input CSV file (stdin if omitted or '-')
    pub input: Option<PathBuf>,
    /// Number of rows; `-N` prints all but the last N
    #[arg(
        short = 'n',
        default_value = "10",
        allow_hyphen_values = true,
        value_parser = parse_head_count
    )]
    pub count: HeadCount,
}

#[derive(Debug, Args)]
pub struct TailArgs {
    /// Input CSV file (stdin if omitted or '-')
    pub input: Option<PathBuf>,
    /// Number of rows; `+N` prints from row N onwards
    #[arg(short = 'n', default_value = "10", value_parser = parse_tail_count)]
    pub count: TailCount,
}

#[derive(Debug, Args)]
pub struct HeadersArgs {
    /// Input CSV file (stdin if omitted or '-')
    pub input: Option<PathBuf>,
    /// Number columns from 0 instead of 1
    #[arg(long = "zero-based")]
    pub zero_based: bool,
}

#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Input CSV file (stdin if omitted or '-')
    pub input: Option<PathBuf>,
    /// Remove leading whitespace from every field
    #[arg(long)]
    pub trim: bool,
    /// Pad short rows with empty fields to the header's width
    #[arg(long)]
    pub pad: bool,
}

#[derive(Debug, Args)]
pub struct StackArgs {
    /// Input CSV files, in output order ('-' reads stdin, at most once)
    #[arg(required = true, num_args = 2..)]
    pub inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("format")
        .required(true)
        .args(["fields", "md"])
))]
pub struct ConvertArgs {
    /// Input text file (stdin if omitted or '-')
    pub input: Option<PathBuf>,
    /// Read whitespace-separated fields, one row per line
    #[arg(long)]
    pub fields: bool,
    /// Read the first Markdown table
    #[arg(long)]
    pub md: bool,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

fn parse_count(value: &str) -> Result<usize, String> {
    let count = value
        .parse::<usize>()
        .map_err(|_| format!("'{value}' is not a row count"))?;
    if count == 0 {
        return Err("Row count must be at least 1".to_string());
    }
    Ok(count)
}

pub fn parse_head_count(value: &str) -> Result<HeadCount, String> {
    match value.strip_prefix('-') {
        Some(rest) => parse_count(rest).map(HeadCount::AllButLast),
        None => parse_count(value).map(HeadCount::First),
    }
}

pub fn parse_tail_count(value: &str) -> Result<TailCount, String> {
    match value.strip_prefix('+') {
        Some(rest) => parse_count(rest).map(TailCount::From),
        None => parse_count(value).map(TailCount::Last),
    }
}
