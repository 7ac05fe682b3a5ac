use std::fs;
use std::path::PathBuf;

use rust_xlsxwriter::Workbook;

use crate::errors::ParserError;
use crate::formats::classify_sales_header;
use crate::model::{SalesColumn, TextEncoding};
use crate::{decode_text, parse_accounting_csv, parse_budget_workbook, parse_sales_csv};

fn fixture(path: &str) -> Vec<u8> {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let full_path = base.join("tests/data").join(path);
    fs::read(&full_path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {}", full_path.display(), err))
}

fn text_values(df: &polars::prelude::DataFrame, column: &str) -> Vec<String> {
    df.column(column)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|value| value.unwrap_or_default().to_string())
        .collect()
}

#[test]
fn sales_headers_are_canonicalized() {
    let raw = parse_sales_csv(&fixture("ventas_2022_2023.csv")).expect("sales parse failed");

    assert_eq!(raw.encoding, TextEncoding::Utf8);
    assert_eq!(raw.height(), 5);
    assert_eq!(
        raw.df.get_column_names(),
        [
            "client",
            "year",
            "month",
            "sku",
            "product",
            "quantity",
            "unit_price",
            "amount"
        ]
    );
    for column in SalesColumn::ALL {
        assert!(raw.has_column(column), "missing {column}");
    }
}

#[test]
fn sales_cells_are_left_raw_for_the_normalizer() {
    let raw = parse_sales_csv(&fixture("ventas_2022_2023.csv")).unwrap();

    let clients = text_values(&raw.df, "client");
    assert_eq!(clients[0], "interceramic ");
    assert_eq!(clients[2], "HOME DEPOT");

    let skus = text_values(&raw.df, "sku");
    assert_eq!(skus[2], " xyz-9 ");
}

#[test]
fn missing_sales_cells_are_zero_filled() {
    let raw = parse_sales_csv(&fixture("ventas_2022_2023.csv")).unwrap();

    let quantities = text_values(&raw.df, "quantity");
    assert_eq!(quantities[3], "0");
    assert_eq!(quantities[4], "0");

    let amounts = text_values(&raw.df, "amount");
    assert_eq!(amounts[3], "0");
    // Unparseable but present: the normalizer decides what it is worth.
    assert_eq!(amounts[4], "abc");
}

#[test]
fn short_rows_are_zero_filled() {
    let content = b"Cliete,A\xc3\xb1o,Mes,Importe\nLamosa,2023\n";
    let raw = parse_sales_csv(content).unwrap();

    assert_eq!(text_values(&raw.df, "month"), vec!["0"]);
    assert_eq!(text_values(&raw.df, "amount"), vec!["0"]);
}

#[test]
fn latin1_upload_falls_back() {
    let raw = parse_sales_csv(&fixture("ventas_latin1.csv")).expect("latin-1 parse failed");

    assert_eq!(raw.encoding, TextEncoding::Latin1);
    assert!(raw.has_column(SalesColumn::Year));
    assert_eq!(text_values(&raw.df, "product"), vec!["Diseño Caña"]);
    assert_eq!(text_values(&raw.df, "year"), vec!["2023"]);
}

#[test]
fn decode_records_failed_attempts() {
    let decoded = decode_text(b"A\xf1o");
    assert_eq!(decoded.encoding, TextEncoding::Latin1);
    assert_eq!(decoded.text, "Año");
    assert_eq!(decoded.attempts.len(), 1);
    assert_eq!(decoded.attempts[0].encoding, TextEncoding::Utf8);

    let decoded = decode_text(b"\xEF\xBB\xBFCliete");
    assert_eq!(decoded.encoding, TextEncoding::Utf8);
    assert_eq!(decoded.text, "Cliete");
    assert!(decoded.attempts.is_empty());
}

#[test]
fn latin1_fallback_drops_the_bom() {
    let decoded = decode_text(b"\xEF\xBB\xBFCliente,A\xf1o\nLamosa,2023\n");
    assert_eq!(decoded.encoding, TextEncoding::Latin1);
    assert_eq!(decoded.text, "Cliente,Año\nLamosa,2023\n");

    let raw = parse_sales_csv(b"\xEF\xBB\xBFCliente,A\xf1o,Mes,Importe\nLamosa,2023,1,10\n")
        .expect("bom-prefixed latin-1 parse failed");
    assert_eq!(raw.encoding, TextEncoding::Latin1);
    assert!(raw.has_column(SalesColumn::Client));
    assert_eq!(text_values(&raw.df, "client"), vec!["Lamosa"]);
}

#[test]
fn header_only_upload_is_empty() {
    let err = parse_sales_csv(&fixture("header_only.csv")).unwrap_err();
    assert!(matches!(err, ParserError::EmptyData { .. }));
    assert!(err.to_string().contains("file is empty"));

    let err = parse_sales_csv(b"").unwrap_err();
    assert!(matches!(err, ParserError::EmptyData { .. }));
}

#[test]
fn unknown_and_duplicate_headers_are_kept() {
    let content = b"Cliente,Region,Region,,Importe\nVarios,Norte,Sur,x,10\n";
    let raw = parse_sales_csv(content).unwrap();

    assert_eq!(
        raw.df.get_column_names(),
        ["client", "Region", "Region.1", "unnamed_3", "amount"]
    );
}

#[test]
fn header_aliases_ignore_case_and_accents() {
    assert_eq!(classify_sales_header(" AÑO "), Some(SalesColumn::Year));
    assert_eq!(classify_sales_header("Precio Unitario"), Some(SalesColumn::UnitPrice));
    assert_eq!(classify_sales_header("unit_price"), Some(SalesColumn::UnitPrice));
    assert_eq!(classify_sales_header("Cliete"), Some(SalesColumn::Client));
    assert_eq!(classify_sales_header("Region"), None);
}

#[test]
fn accounting_rows_with_missing_fields_are_dropped() {
    let entries = parse_accounting_csv(&fixture("odoo_actual.csv")).expect("accounting parse");

    assert_eq!(entries.df.get_column_names(), ["account", "concept", "amount"]);
    assert_eq!(entries.df.height(), 2);
    assert_eq!(entries.dropped_rows, 2);

    assert_eq!(text_values(&entries.df, "account"), vec!["4000", "6000"]);
    let amounts = entries.df.column("amount").unwrap().f64().unwrap();
    assert_eq!(amounts.get(0), Some(125000.50));
    assert_eq!(amounts.get(1), Some(-45000.0));
}

#[test]
fn accounting_requires_three_columns() {
    let err = parse_accounting_csv(b"Cuenta,Importe\n4000,10\n").unwrap_err();
    match err {
        ParserError::ColumnCount {
            expected, found, ..
        } => {
            assert_eq!(expected, 3);
            assert_eq!(found, 2);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

fn budget_workbook(extra_columns: u16) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.write_string(0, 0, "Cuenta").unwrap();
    worksheet.write_string(0, 1, "Concepto").unwrap();
    worksheet.write_string(0, 2, "Notas").unwrap();
    worksheet.write_string(0, 3, "Ene").unwrap();
    worksheet.write_string(0, 4, "Feb").unwrap();

    // Column 2 carries a header but no data and must disappear.
    worksheet.write_number(1, 0, 4000.0).unwrap();
    worksheet.write_string(1, 1, "Ventas").unwrap();
    worksheet.write_number(1, 3, 1500.0).unwrap();
    worksheet.write_number(1, 4, 1750.5).unwrap();

    // Row 2 is left blank.
    worksheet.write_number(3, 0, 6000.0).unwrap();
    worksheet.write_string(3, 1, "Sueldos").unwrap();
    worksheet.write_number(3, 3, 900.0).unwrap();

    for offset in 0..extra_columns {
        worksheet.write_number(1, 5 + offset, 1.0).unwrap();
    }

    workbook.save_to_buffer().unwrap()
}

#[test]
fn budget_drops_empty_rows_and_columns() {
    let budget = parse_budget_workbook(&budget_workbook(0)).expect("budget parse failed");

    assert_eq!(
        budget.df.get_column_names(),
        ["account", "concept", "january", "february"]
    );
    assert_eq!(budget.df.height(), 2);
    assert_eq!(text_values(&budget.df, "account"), vec!["4000", "6000"]);
    assert_eq!(text_values(&budget.df, "concept"), vec!["Ventas", "Sueldos"]);

    let february = budget.df.column("february").unwrap().f64().unwrap();
    assert_eq!(february.get(0), Some(1750.5));
    assert_eq!(february.get(1), None);
}

#[test]
fn budget_rejects_more_columns_than_the_template() {
    let err = parse_budget_workbook(&budget_workbook(12)).unwrap_err();
    assert!(matches!(
        err,
        ParserError::ColumnCount {
            expected: 14,
            found: 16,
            ..
        }
    ));
}

#[test]
fn budget_rejects_non_workbook_bytes() {
    let err = parse_budget_workbook(b"Cuenta,Concepto\n").unwrap_err();
    assert!(matches!(err, ParserError::Workbook { .. }));
}
