use std::io::{Read, Write};

use anyhow::Result;
use serde::Serialize;

use crate::{
    cli::DescribeArgs,
    config::Config,
    inference::{Classifier, InferredType, infer_column_types_or_string},
    io_utils::{RecordSource, open_csv_writer, open_output, open_source},
};

/// One header column and the type inferred for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescription {
    pub column: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub datatype: InferredType,
}

pub fn execute(args: &DescribeArgs, config: &Config) -> Result<()> {
    let mut source = open_source(args.input.as_deref(), config, false)?;
    let classifier = Classifier::new(config.time_layouts.clone());
    let descriptions = describe(&classifier, &mut source)?;

    if args.json {
        let mut output = open_output(config.output.as_deref())?;
        serde_json::to_writer_pretty(&mut output, &descriptions)?;
        writeln!(output)?;
        output.flush()?;
    } else {
        let mut writer = open_csv_writer(config, &source)?;
        write_csv(&descriptions, &mut writer)?;
        writer.flush()?;
    }
    Ok(())
}

/// Infers every column over all rows. Without data rows every column is a
/// [`InferredType::String`].
pub fn describe<R: Read>(
    classifier: &Classifier,
    source: &mut RecordSource<R>,
) -> Result<Vec<ColumnDescription>> {
    let rows = source.read_all()?;
    let columns = (1..=source.headers().len()).collect::<Vec<_>>();
    let types = infer_column_types_or_string(classifier, &rows, &columns);
    Ok(source
        .headers()
        .iter()
        .zip(types)
        .enumerate()
        .map(|(idx, (name, datatype))| ColumnDescription {
            column: idx + 1,
            name: name.clone(),
            datatype,
        })
        .collect())
}

pub fn write_csv<W: Write>(
    descriptions: &[ColumnDescription],
    writer: &mut csv::Writer<W>,
) -> Result<()> {
    writer.write_record(["Column", "Name", "Type"])?;
    for description in descriptions {
        writer.write_record([
            description.column.to_string().as_str(),
            description.name.as_str(),
            description.datatype.as_str(),
        ])?;
    }
    Ok(())
}
