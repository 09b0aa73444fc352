//! Chains commands through stdin the way a shell pipeline would, feeding each
//! command's stdout to the next one.

mod common;

use common::{fixture, run_stdout};

#[test]
fn filter_then_sort_then_select() -> anyhow::Result<()> {
    let shipped = run_stdout(
        &["filter", "--eq", "true", "--col", "3", "-"],
        &fixture("orders.csv"),
    );
    let sorted = run_stdout(&["sort", "-c", "4", "-r", "-"], &shipped);
    let projected = run_stdout(&["select", "-c", "5,4"], &sorted);

    assert_eq!(
        projected,
        "customer,amount\nAlan Turing,120.5\nBarbara Liskov,42\nAda Lovelace,19.99\n"
    );
    Ok(())
}

#[test]
fn rename_output_feeds_describe() -> anyhow::Result<()> {
    let renamed = run_stdout(&["rename", "--case", "pascal"], &fixture("orders.csv"));
    let described = run_stdout(&["describe", "--json"], &renamed);

    let parsed: serde_json::Value = serde_json::from_str(&described)?;
    let names = parsed
        .as_array()
        .expect("array of columns")
        .iter()
        .map(|column| column["name"].as_str().unwrap_or_default().to_string())
        .collect::<Vec<_>>();
    assert_eq!(names, ["Id", "OrderedAt", "Shipped", "Amount", "Customer"]);
    assert_eq!(parsed[1]["type"], "Time");
    Ok(())
}

#[test]
fn head_of_a_sorted_stream() {
    let sorted = run_stdout(&["sort", "-c", "1"], &fixture("numbers.csv"));
    let top = run_stdout(&["head", "-n", "2"], &sorted);
    assert_eq!(top, "Number,String\n-1,Minus One\n1,One\n");

    let view = run_stdout(&["view"], &top);
    assert_eq!(view, "Number, String\n    -1, Minus One\n     1, One\n");
}
