pub mod clean;
pub mod cli;
pub mod columns;
pub mod compare;
pub mod config;
pub mod convert;
pub mod describe;
pub mod error;
pub mod filter;
pub mod headers;
pub mod inference;
pub mod io_utils;
pub mod rename;
pub mod rows;
pub mod select;
pub mod sort;
pub mod stack;
pub mod table;
pub mod transform;
pub mod view;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, debug};

use crate::{
    cli::{Cli, Commands},
    config::Config,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_typed", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = Config::from_args(&cli.global)?;
    debug!(
        "Delimiter {}, input encoding {}, time layouts {:?}",
        config
            .delimiter
            .map(printable_delimiter)
            .unwrap_or_else(|| "auto".to_string()),
        config.input_encoding.name(),
        config.time_layouts.iter().collect::<Vec<_>>()
    );

    match &cli.command {
        Commands::Select(args) => select::execute(args, &config),
        Commands::Filter(args) => filter::execute(args, &config),
        Commands::Sort(args) => sort::execute(args, &config),
        Commands::Rename(args) => rename::execute(args, &config),
        Commands::View(args) => view::execute(args, &config),
        Commands::Describe(args) => describe::execute(args, &config),
        Commands::Head(args) => rows::execute_head(args, &config),
        Commands::Tail(args) => rows::execute_tail(args, &config),
        Commands::Headers(args) => headers::execute(args, &config),
        Commands::Clean(args) => clean::execute(args, &config),
        Commands::Stack(args) => stack::execute(args, &config),
        Commands::Convert(args) => convert::execute(args, &config),
    }
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
