use std::io::{Read, Write};

use anyhow::Result;
use log::debug;

use crate::{
    cli::ViewArgs,
    config::Config,
    inference::{Classifier, InferredType, infer_column_types_or_string},
    io_utils::{RecordSource, open_output, open_source},
    table::{self, Align},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct ViewOptions {
    pub markdown: bool,
    pub max_width: Option<usize>,
    pub max_height: Option<usize>,
}

pub fn execute(args: &ViewArgs, config: &Config) -> Result<()> {
    let options = ViewOptions {
        markdown: args.md,
        max_width: args.max_width,
        max_height: args.max_height,
    };
    let mut source = open_source(args.input.as_deref(), config, false)?;
    let classifier = Classifier::new(config.time_layouts.clone());
    let rendered = render(&classifier, options, &mut source)?;

    let mut output = open_output(config.output.as_deref())?;
    output.write_all(rendered.as_bytes())?;
    output.flush()?;
    Ok(())
}

/// Buffers the input and lays it out as a table. Columns whose inferred type
/// is not [`InferredType::String`] are right-aligned; types are inferred from
/// the full cell text, before any truncation.
pub fn render<R: Read>(
    classifier: &Classifier,
    options: ViewOptions,
    source: &mut RecordSource<R>,
) -> Result<String> {
    let rows = source.read_all()?;
    let columns = (1..=source.headers().len()).collect::<Vec<_>>();
    let types = infer_column_types_or_string(classifier, &rows, &columns);
    debug!("View column types: {types:?}");
    let aligns = types
        .iter()
        .map(|ty| match ty {
            InferredType::String => Align::Left,
            _ => Align::Right,
        })
        .collect::<Vec<_>>();

    let shorten = |row: &[String]| {
        row.iter()
            .map(|cell| table::truncate_cell(cell, options.max_width, options.max_height))
            .collect::<Vec<_>>()
    };
    let headers = shorten(source.headers());
    let rows = rows.iter().map(|row| shorten(row.as_slice())).collect::<Vec<_>>();

    Ok(if options.markdown {
        table::render_markdown(&headers, &rows, &aligns)
    } else {
        table::render_plain(&headers, &rows, &aligns)
    })
}
