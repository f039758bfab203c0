use adjustment_tools::ToolError;
use adjustment_tools::config::ToolConfig;
use adjustment_tools::model::{CellValue, Sheet};
use adjustment_tools::summary::{BLANK_LABEL, GRAND_TOTAL, NULL_DISPLAY, build_summary};

fn text(value: &str) -> CellValue {
    CellValue::from(value)
}

fn num(value: f64) -> CellValue {
    CellValue::Number(value)
}

fn data_sheet() -> Sheet {
    let header = [
        "Code (Sell Branch)",
        "Code (Adjustment Type)",
        "Division (Product)",
        "Code (Written By)",
        "Cost",
    ]
    .into_iter()
    .map(text)
    .collect();

    let row = |branch: f64, adj: &str, division: &str, writer: CellValue, cost: CellValue| {
        vec![num(branch), text(adj), text(division), writer, cost]
    };

    Sheet::new(
        "Data",
        header,
        vec![
            row(2.0, "B", "PLB", text("JS"), num(100.0)),
            row(1.0, "DC", "ELE", text("AM"), num(50.0)),
            row(1.0, "DC", "PLB", text("JS"), num(25.0)),
            row(2.0, "DC", "PLB", CellValue::Empty, num(10.0)),
            row(1.0, "B", "ELE", text("AM"), CellValue::Empty),
        ],
    )
}

#[test]
fn three_tables_are_stacked_with_a_blank_row_between() {
    let grid = build_summary(&data_sheet(), &ToolConfig::default()).expect("summary built");

    let expected: Vec<Vec<CellValue>> = vec![
        vec![text("ADJ$"), text("ADJ Code")],
        vec![text("BR#"), text("B"), text("DC"), text(GRAND_TOTAL)],
        vec![num(1.0), num(0.0), num(75.0), num(75.0)],
        vec![num(2.0), num(100.0), num(10.0), num(110.0)],
        vec![text(GRAND_TOTAL), num(100.0), num(85.0), num(185.0)],
        vec![],
        vec![text("ADJ$"), text("Division")],
        vec![text("BR#"), text("ELE"), text("PLB"), text(GRAND_TOTAL)],
        vec![num(1.0), num(50.0), num(25.0), num(75.0)],
        vec![num(2.0), text(NULL_DISPLAY), num(110.0), num(110.0)],
        vec![text(GRAND_TOTAL), num(50.0), num(135.0), num(185.0)],
        vec![],
        vec![CellValue::Empty, text("Values")],
        vec![text("ADJ By"), text("ADJ $"), text("# of ADJ")],
        vec![num(1.0), num(75.0), num(2.0)],
        vec![text("AM"), num(50.0), num(1.0)],
        vec![text("JS"), num(25.0), num(1.0)],
        vec![num(2.0), num(110.0), num(2.0)],
        vec![text("JS"), num(100.0), num(1.0)],
        vec![text(BLANK_LABEL), num(10.0), num(1.0)],
        vec![text(GRAND_TOTAL), num(185.0), num(4.0)],
    ];
    assert_eq!(grid.rows, expected);
}

#[test]
fn only_cost_sums_are_currency_formatted() {
    let grid = build_summary(&data_sheet(), &ToolConfig::default()).expect("summary built");

    assert!(grid.is_currency(2, 1));
    assert!(grid.is_currency(4, 3));
    assert!(grid.is_currency(9, 2));
    assert!(grid.is_currency(14, 1));

    // Labels, "$0.00" placeholders and adjustment counts keep the default format.
    assert!(!grid.is_currency(2, 0));
    assert!(!grid.is_currency(1, 1));
    assert!(!grid.is_currency(9, 1));
    assert!(!grid.is_currency(14, 2));
}

#[test]
fn blank_items_are_listed_last() {
    let mut sheet = data_sheet();
    sheet.rows[0][1] = CellValue::Empty;
    sheet.rows[1][1] = text("AA");

    let grid = build_summary(&sheet, &ToolConfig::default()).expect("summary built");

    assert_eq!(
        grid.rows[1],
        vec![text("BR#"), text("AA"), text("B"), text("DC"), text(BLANK_LABEL), text(GRAND_TOTAL)]
    );
    assert_eq!(grid.rows[3][4], num(100.0));
    assert_eq!(grid.rows[3][1], text(NULL_DISPLAY));
}

#[test]
fn summary_columns_are_required() {
    let mut sheet = data_sheet();
    sheet.header[4] = text("Amount");

    let error = build_summary(&sheet, &ToolConfig::default()).expect_err("missing cost column");
    assert!(matches!(error, ToolError::MissingColumn(name) if name == "Cost"));

    let mut config = ToolConfig::default();
    config.summary.cost = "Amount".into();
    assert!(build_summary(&sheet, &config).is_ok());
}
