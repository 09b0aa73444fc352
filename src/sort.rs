//! Multi-key typed sort. Key types are inferred over the whole input, so every
//! row is buffered before anything is written.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::{
    cli::SortArgs,
    columns::resolve,
    config::Config,
    error::Error,
    inference::{Classifier, InferredType, Value, infer_column_types_or_string},
    io_utils::{RecordSource, open_csv_writer, open_source},
};

/// Row positions of `rows` in sorted order.
///
/// Keys are compared in the order of `columns`, each under its type inferred
/// across all of `rows`. Ties keep their input order, in both directions.
pub fn sorted_order(
    classifier: &Classifier,
    rows: &[Vec<String>],
    columns: &[usize],
    reversed: bool,
) -> Result<Vec<usize>, Error> {
    let types = infer_column_types_or_string(classifier, rows, columns);
    sorted_order_by(classifier, rows, columns, &types, reversed)
}

/// [`sorted_order`] with key types already known, one per column.
pub fn sorted_order_by(
    classifier: &Classifier,
    rows: &[Vec<String>],
    columns: &[usize],
    types: &[InferredType],
    reversed: bool,
) -> Result<Vec<usize>, Error> {
    let keys = rows
        .iter()
        .map(|row| sort_key(classifier, row, columns, types))
        .collect::<Result<Vec<_>, _>>()?;

    let mut order = (0..rows.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| {
        let ordering = keys[a].cmp(&keys[b]);
        if reversed {
            ordering.reverse()
        } else {
            ordering
        }
    });
    Ok(order)
}

fn sort_key<'r>(
    classifier: &Classifier,
    row: &'r [String],
    columns: &[usize],
    types: &[InferredType],
) -> Result<Vec<Value<'r>>, Error> {
    columns
        .iter()
        .zip(types)
        .map(|(&column, &ty)| {
            let field = row.get(column - 1).map(String::as_str).unwrap_or("");
            classifier.parse_as(field, ty)
        })
        .collect()
}

pub fn execute(args: &SortArgs, config: &Config) -> Result<()> {
    let mut source = open_source(args.input.as_deref(), config, false)?;
    let columns = resolve(&args.columns, source.headers().len()).context("Resolving --cols")?;
    let classifier = Classifier::new(config.time_layouts.clone());

    let mut writer = open_csv_writer(config, &source)?;
    let written = sort(&classifier, &columns, args.reversed, &mut source, &mut writer)?;
    writer.flush()?;
    info!("Sorted {written} row(s) on {} key(s)", columns.len());
    Ok(())
}

pub fn sort<R: Read, W: Write>(
    classifier: &Classifier,
    columns: &[usize],
    reversed: bool,
    source: &mut RecordSource<R>,
    writer: &mut csv::Writer<W>,
) -> Result<usize> {
    let rows = source.read_all()?;
    let types = infer_column_types_or_string(classifier, &rows, columns);
    debug!("Sort keys {columns:?} typed as {types:?}");
    let order = sorted_order_by(classifier, &rows, columns, &types, reversed)?;

    writer.write_record(source.headers())?;
    for &idx in &order {
        writer.write_record(&rows[idx])?;
    }
    Ok(order.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::run_csv;

    const NUMBERS: &str = "Number,String\n1,One\n2,Two\n-1,Minus One\n2,Another Two\n";

    fn run(input: &str, columns: &[usize], reversed: bool) -> String {
        let classifier = Classifier::default();
        run_csv(input, |src, w| {
            sort(&classifier, columns, reversed, src, w).map(|_| ())
        })
        .unwrap()
    }

    #[test]
    fn numbers_sort_numerically_and_stably() {
        assert_eq!(
            run(NUMBERS, &[1], false),
            "Number,String\n-1,Minus One\n1,One\n2,Two\n2,Another Two\n"
        );
    }

    #[test]
    fn reversed_ties_keep_input_order() {
        assert_eq!(
            run(NUMBERS, &[1], true),
            "Number,String\n2,Two\n2,Another Two\n1,One\n-1,Minus One\n"
        );
    }

    #[test]
    fn mixed_columns_sort_as_text() {
        let input = "v\n10\n9\nx\n";
        assert_eq!(run(input, &[1], false), "v\n10\n9\nx\n");
    }

    #[test]
    fn spelled_out_infinity_sorts_numerically() {
        assert_eq!(run("v\n10\n9\ninf\n", &[1], false), "v\n9\n10\ninf\n");
        assert_eq!(
            run("v\n1\nNaN\n-inf\n", &[1], false),
            "v\nNaN\n-inf\n1\n"
        );
    }

    #[test]
    fn later_keys_break_ties() {
        let input = "k,v\nb,2\na,3\nb,1\n";
        assert_eq!(run(input, &[1, 2], false), "k,v\na,3\nb,1\nb,2\n");
        assert_eq!(run(input, &[2, 1], false), "k,v\nb,1\nb,2\na,3\n");
    }

    #[test]
    fn times_and_bools_sort_by_value() {
        let input = "when,flag\n2000-01-03,true\n1/1/2000,false\n2000-01-02,true\n";
        assert_eq!(
            run(input, &[1], false),
            "when,flag\n1/1/2000,false\n2000-01-02,true\n2000-01-03,true\n"
        );
        assert_eq!(
            run(input, &[2], false),
            "when,flag\n1/1/2000,false\n2000-01-03,true\n2000-01-02,true\n"
        );
    }

    #[test]
    fn sorted_order_is_a_permutation() {
        let rows = vec![
            vec!["b".to_string()],
            vec!["a".to_string()],
            vec!["c".to_string()],
        ];
        let order = sorted_order(&Classifier::default(), &rows, &[1], false).unwrap();
        assert_eq!(order, vec![1, 0, 2]);
        assert_eq!(
            sorted_order(&Classifier::default(), &[], &[1], true).unwrap(),
            Vec::<usize>::new()
        );
    }

    #[test]
    fn header_only_input_is_left_alone() {
        assert_eq!(run("a,b\n", &[1], false), "a,b\n");
    }
}
