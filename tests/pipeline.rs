use std::collections::BTreeMap;

use adjustment_tools::ToolError;
use adjustment_tools::config::{
    AMOUNT_FORMAT, ColumnRef, DATE_FORMAT, HighlightRules, NumberFormatRule, PurgeConfig,
    ToolConfig,
};
use adjustment_tools::highlight::classify;
use adjustment_tools::model::{CellValue, Fill, Sheet};
use adjustment_tools::pipeline::{self, ResolvedColumns};
use adjustment_tools::purge::purge_rows;

const HEADERS: [&str; 14] = [
    "Date",
    "Code (Sell Branch)",
    "Code (Adjustment Type)",
    "Code (Reason)",
    "Item",
    "Description",
    "Qty",
    "UOM",
    "Code (Written By)",
    "Division (Product)",
    "Cost",
    "ABS Cost",
    "Note",
    "Price",
];

const BRANCH: usize = 1;
const ADJ_TYPE: usize = 2;
const ITEM: usize = 4;
const ABS_COST: usize = 11;

fn header() -> Vec<CellValue> {
    HEADERS.iter().map(|name| CellValue::from(*name)).collect()
}

fn row(branch: CellValue, adj_type: &str, cost: CellValue, item: &str) -> Vec<CellValue> {
    let mut cells = vec![CellValue::Empty; HEADERS.len()];
    cells[0] = CellValue::DateTime(45_200.0);
    cells[BRANCH] = branch;
    cells[ADJ_TYPE] = CellValue::from(adj_type);
    cells[ITEM] = CellValue::from(item);
    cells[10] = cost.clone();
    cells[ABS_COST] = cost;
    cells[13] = CellValue::Number(12.5);
    cells
}

fn num(value: f64) -> CellValue {
    CellValue::Number(value)
}

fn report(rows: Vec<Vec<CellValue>>) -> Sheet {
    Sheet::new("Adjustments", header(), rows)
}

fn items(sheet: &Sheet) -> Vec<String> {
    sheet.rows.iter().map(|row| row[ITEM].to_string()).collect()
}

fn sample() -> Sheet {
    report(vec![
        row(num(3.0), "B", num(150.0), "a"),
        row(num(1.0), "DC", num(1500.0), "b"),
        row(num(2.0), "PI", num(20.0), "c"),
        row(num(1.0), "ZZ", num(2500.0), "d"),
        row(num(3.0), "WO", num(900.0), "e"),
        row(num(1.0), "HJ", num(75.5), "f"),
    ])
}

#[test]
fn rows_sort_by_branch_then_cost_descending() {
    let processed = pipeline::process(&sample(), &ToolConfig::default()).expect("processed");

    assert_eq!(items(&processed), vec!["d", "b", "f", "c", "e", "a"]);

    for pair in processed.rows.windows(2) {
        let (lhs, rhs) = (&pair[0], &pair[1]);
        let lhs_branch = lhs[BRANCH].as_number().unwrap();
        let rhs_branch = rhs[BRANCH].as_number().unwrap();
        assert!(lhs_branch <= rhs_branch);
        if lhs_branch == rhs_branch {
            assert!(lhs[ABS_COST].as_number().unwrap() >= rhs[ABS_COST].as_number().unwrap());
        }
    }
}

#[test]
fn equal_keys_keep_input_order() {
    let sheet = report(vec![
        row(num(7.0), "B", num(400.0), "first"),
        row(num(2.0), "B", num(10.0), "other"),
        row(num(7.0), "CC", num(400.0), "second"),
        row(num(7.0), "PO", num(400.0), "third"),
    ]);

    let processed = pipeline::process(&sheet, &ToolConfig::default()).expect("processed");

    assert_eq!(items(&processed), vec!["other", "first", "second", "third"]);
}

#[test]
fn header_and_row_count_are_preserved() {
    let sheet = sample();
    let processed = pipeline::process(&sheet, &ToolConfig::default()).expect("processed");

    assert_eq!(processed.header, sheet.header);
    assert_eq!(processed.rows.len(), sheet.rows.len());
    assert_eq!(processed.name, sheet.name);
}

#[test]
fn reprocessing_is_idempotent() {
    let config = ToolConfig::default();
    let once = pipeline::process(&sample(), &config).expect("first pass");
    let twice = pipeline::process(&once, &config).expect("second pass");

    assert_eq!(once.rows, twice.rows);
    assert_eq!(once.style, twice.style);
}

#[test]
fn empty_and_text_keys_sort_after_numbers() {
    let sheet = report(vec![
        row(CellValue::Empty, "B", num(1.0), "no-branch"),
        row(CellValue::from("A12"), "B", num(1.0), "text-branch"),
        row(num(4.0), "B", CellValue::Empty, "no-cost"),
        row(num(4.0), "B", CellValue::from("n/a"), "text-cost"),
        row(num(4.0), "B", num(5.0), "cost"),
    ]);

    let processed = pipeline::process(&sheet, &ToolConfig::default()).expect("processed");

    assert_eq!(
        items(&processed),
        vec!["cost", "text-cost", "no-cost", "text-branch", "no-branch"]
    );
}

#[test]
fn every_row_gets_one_fill_on_the_cost_cell() {
    let processed = pipeline::process(&sample(), &ToolConfig::default()).expect("processed");

    assert_eq!(processed.style.fills.len(), processed.rows.len());
    for (row_idx, row) in processed.rows.iter().enumerate() {
        let fill = processed.style.fill(row_idx, ABS_COST).expect("cost cell filled");
        let expected = classify(&HighlightRules::default(), &row[ADJ_TYPE], &row[ABS_COST]);
        assert_eq!(fill, expected);
    }

    let by_item: BTreeMap<String, Fill> = processed
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| (row[ITEM].to_string(), processed.style.fill(idx, ABS_COST).unwrap()))
        .collect();
    assert_eq!(by_item["a"], Fill::Yellow);
    assert_eq!(by_item["b"], Fill::Red);
    assert_eq!(by_item["c"], Fill::Green);
    assert_eq!(by_item["d"], Fill::Yellow);
    assert_eq!(by_item["e"], Fill::Green);
    assert_eq!(by_item["f"], Fill::Green);
}

#[test]
fn highlight_boundaries() {
    let rules = HighlightRules::default();
    let fill = |code: &str, cost: CellValue| classify(&rules, &CellValue::from(code), &cost);

    assert_eq!(fill("DC", num(1000.0)), Fill::Green);
    assert_eq!(fill("DC", num(1000.01)), Fill::Red);
    assert_eq!(fill("DC", num(300.01)), Fill::Green);
    assert_eq!(fill("DC", num(300.0)), Fill::Yellow);
    assert_eq!(fill("DC", num(12.0)), Fill::Yellow);
    assert_eq!(fill("B", num(300.0)), Fill::Yellow);
    assert_eq!(fill("B", num(300.01)), Fill::Green);
    assert_eq!(fill("WO", num(5000.0)), Fill::Green);
    assert_eq!(fill("ZZ", num(500.0)), Fill::Yellow);
    assert_eq!(fill("PI", num(0.0)), Fill::Green);
    assert_eq!(fill("PI", CellValue::from("n/a")), Fill::Yellow);
    assert_eq!(fill("PI", CellValue::Empty), Fill::Yellow);
    assert_eq!(fill("HJ", CellValue::DateTime(400.0)), Fill::Yellow);
}

#[test]
fn adjustment_codes_match_exactly() {
    let rules = HighlightRules::default();

    assert_eq!(classify(&rules, &CellValue::from("pi"), &num(10.0)), Fill::Yellow);
    assert_eq!(classify(&rules, &CellValue::from(" PI"), &num(10.0)), Fill::Yellow);
}

#[test]
fn stock_number_formats_are_positional() {
    let processed = pipeline::process(&sample(), &ToolConfig::default()).expect("processed");

    let expected: BTreeMap<usize, String> = [
        (0, DATE_FORMAT),
        (10, AMOUNT_FORMAT),
        (11, AMOUNT_FORMAT),
        (13, AMOUNT_FORMAT),
    ]
    .into_iter()
    .map(|(column, format)| (column, format.to_string()))
    .collect();
    assert_eq!(processed.style.column_formats, expected);
}

#[test]
fn positional_formats_past_the_last_column_are_skipped() {
    let sheet = Sheet::new(
        "Narrow",
        vec![
            CellValue::from("Code (Sell Branch)"),
            CellValue::from("ABS Cost"),
            CellValue::from("Code (Adjustment Type)"),
        ],
        vec![vec![num(1.0), num(10.0), CellValue::from("PI")]],
    );

    let processed = pipeline::process(&sheet, &ToolConfig::default()).expect("processed");

    assert_eq!(processed.style.number_format(0), Some(DATE_FORMAT));
    assert_eq!(processed.style.column_formats.len(), 1);
    assert_eq!(processed.style.fill(0, 1), Some(Fill::Green));
}

#[test]
fn named_format_targets_follow_the_header() {
    let config = ToolConfig {
        number_formats: vec![
            NumberFormatRule::new(ColumnRef::Name("Price".into()), AMOUNT_FORMAT),
            NumberFormatRule::new(ColumnRef::Name("Date".into()), DATE_FORMAT),
        ],
        ..ToolConfig::default()
    };

    let processed = pipeline::process(&sample(), &config).expect("processed");

    assert_eq!(processed.style.number_format(13), Some(AMOUNT_FORMAT));
    assert_eq!(processed.style.number_format(0), Some(DATE_FORMAT));
    assert_eq!(processed.style.column_formats.len(), 2);
}

#[test]
fn unknown_named_format_target_is_a_schema_error() {
    let config = ToolConfig {
        number_formats: vec![NumberFormatRule::new(
            ColumnRef::Name("Posted".into()),
            DATE_FORMAT,
        )],
        ..ToolConfig::default()
    };

    let error = pipeline::process(&sample(), &config).expect_err("missing column");
    assert!(matches!(error, ToolError::MissingColumn(name) if name == "Posted"));
}

#[test]
fn missing_required_column_is_rejected() {
    let mut sheet = sample();
    sheet.header[ABS_COST] = CellValue::from("Cost (Abs)");

    let error = pipeline::process(&sheet, &ToolConfig::default()).expect_err("schema error");
    assert!(matches!(error, ToolError::MissingColumn(name) if name == "ABS Cost"));
}

#[test]
fn key_columns_resolve_by_name() {
    let columns = ResolvedColumns::resolve(&sample(), &ToolConfig::default()).expect("resolved");

    assert_eq!(columns.sell_branch, BRANCH);
    assert_eq!(columns.abs_cost, ABS_COST);
    assert_eq!(columns.adjustment_type, ADJ_TYPE);
}

#[test]
fn purge_matches_codes_regardless_of_case() {
    let config = PurgeConfig {
        column: ColumnRef::Name("Code (Adjustment Type)".into()),
        codes: vec!["dc".into(), "PI".into()],
        ..PurgeConfig::default()
    };

    let outcome = purge_rows(&sample(), &config).expect("purged");

    assert_eq!(outcome.removed_rows, vec![1, 2]);
    assert_eq!(outcome.removed(), 2);
    assert_eq!(items(&outcome.sheet), vec!["a", "d", "e", "f"]);
    assert_eq!(outcome.sheet.header, header());
}

#[test]
fn purge_column_past_the_sheet_is_rejected() {
    let config = PurgeConfig {
        column: ColumnRef::Index(40),
        ..PurgeConfig::default()
    };
    let error = purge_rows(&sample(), &config).expect_err("column out of range");
    assert!(matches!(error, ToolError::InvalidWorkbook(_)));
}
