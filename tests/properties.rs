//! End-to-end properties of the CSV core: load → filter / split → concat.

use std::num::NonZeroUsize;

use csv_workbench::data::{
    concat, filter, load, split, to_csv_bytes, ConcatError, FilterError, FilterOp, Table,
};

fn sample(rows: usize) -> Table {
    let mut text = String::from("id,city,score,note\n");
    for i in 0..rows {
        let note = if i % 4 == 0 { String::new() } else { format!("\"n, {i}\"") };
        text.push_str(&format!("{i},city{},{}.5,{note}\n", i % 3, i % 10));
    }
    load(text.as_bytes()).expect("sample should load")
}

fn size(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

#[test]
fn split_then_concat_restores_the_table() {
    let table = sample(23);
    for n in [1, 2, 5, 7, 22, 23, 24, 100] {
        let chunks = split(&table, size(n));
        assert_eq!(chunks.len(), 23usize.div_ceil(n), "chunk count for n={n}");
        assert!(chunks.iter().all(|c| !c.is_empty() && c.num_rows() <= n));
        assert_eq!(concat(&chunks).unwrap(), table, "round trip for n={n}");
    }
}

#[test]
fn split_round_trip_survives_serialization() {
    let table = sample(10);
    let chunks = split(&table, size(3));
    let reloaded: Vec<Table> = chunks
        .iter()
        .map(|c| load(&to_csv_bytes(c).unwrap()).unwrap())
        .collect();
    assert_eq!(
        to_csv_bytes(&concat(&reloaded).unwrap()).unwrap(),
        to_csv_bytes(&table).unwrap()
    );
}

#[test]
fn split_boundaries() {
    let table = sample(4);
    assert_eq!(split(&table, size(4)), vec![table.clone()]);
    assert_eq!(split(&table, size(50)), vec![table]);

    let empty = sample(0);
    assert!(split(&empty, size(3)).is_empty());
    assert!(matches!(concat(&split(&empty, size(3))), Err(ConcatError::Empty)));
}

#[test]
fn filtering_is_idempotent() {
    let table = sample(40);
    let cases = [
        ("score", FilterOp::Gt, "4"),
        ("score", FilterOp::Le, "2.5"),
        ("city", FilterOp::Eq, "city1"),
        ("city", FilterOp::Ne, "city1"),
        ("note", FilterOp::Contains, "1"),
        ("note", FilterOp::StartsWith, "n, 3"),
        ("note", FilterOp::EndsWith, "5"),
        ("id", FilterOp::In, "1, 2,30"),
    ];
    for (column, op, operand) in cases {
        let once = filter(&table, column, op, operand).unwrap();
        let twice = filter(&once, column, op, operand).unwrap();
        assert_eq!(once, twice, "{column} {op} {operand}");
        assert_eq!(once.column_names(), table.column_names());
    }
}

#[test]
fn age_scenario() {
    let table = load(b"age\n10\n25\nbad\n40\n").unwrap();
    let out = filter(&table, "age", FilterOp::Gt, "20").unwrap();
    let ages: Vec<_> = (0..out.num_rows()).map(|r| out.cell_text(0, r)).collect();
    assert_eq!(ages, vec![Some("25".to_string()), Some("40".to_string())]);
}

#[test]
fn name_scenario() {
    let table = load(b"name\nAnna\nanna\nBob\n").unwrap();
    let out = filter(&table, "name", FilterOp::Eq, "anna").unwrap();
    assert_eq!(out.num_rows(), 1);
    assert_eq!(out.cell_text(0, 0).as_deref(), Some("anna"));
}

#[test]
fn missing_column_scenario() {
    let table = sample(3);
    let err = filter(&table, "nonexistent_col", FilterOp::Gt, "5").unwrap_err();
    assert!(matches!(err, FilterError::ColumnNotFound(_)));
    assert!(err.to_string().starts_with("column not found"));

    let err = filter(&table, "score", FilterOp::Gt, "x").unwrap_err();
    assert!(matches!(err, FilterError::InvalidOperand(_)));
}

#[test]
fn concat_union_scenario() {
    let t1 = load(b"A,B\n1,2\n").unwrap();
    let t2 = load(b"B,C\n3,4\n").unwrap();
    let out = concat(&[t1, t2]).unwrap();

    assert_eq!(out.column_names(), vec!["A", "B", "C"]);
    assert_eq!(out.cell_text(2, 0), None);
    assert_eq!(out.cell_text(0, 1), None);
    assert_eq!(
        String::from_utf8(to_csv_bytes(&out).unwrap()).unwrap(),
        "A,B,C\n1,2,\n,3,4\n"
    );
}
