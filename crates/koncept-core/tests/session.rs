use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use polars::prelude::*;

use koncept_core::dashboard::{sales_analysis, sku_analysis, ViewSelection};
use koncept_core::export::{export_file_name, workbook_bytes};
use koncept_core::investor::accounting_table;
use koncept_core::present::{to_json, ReportTable};
use koncept_core::reports::ClientFilter;
use koncept_core::{ClientMap, KonceptError, Session};
use koncept_parser::{ParserError, TextEncoding};

fn fixture(name: &str) -> Vec<u8> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../koncept-parser/tests/data")
        .join(name);
    fs::read(&path).unwrap_or_else(|err| panic!("failed to read {}: {}", path.display(), err))
}

fn loaded_session() -> Session {
    let mut session = Session::new(ClientMap::builtin());
    session
        .upload("ventas_2022_2023.csv", &fixture("ventas_2022_2023.csv"))
        .expect("upload");
    session
}

#[test]
fn nothing_to_report_before_an_upload() {
    let session = Session::new(ClientMap::builtin());
    assert!(matches!(session.sales(), Err(KonceptError::NoData)));
    assert!(session.revision().is_none());
}

#[test]
fn upload_parses_and_normalizes() -> anyhow::Result<()> {
    let session = loaded_session();
    let loaded = session.loaded().expect("loaded");

    assert_eq!(loaded.source, "ventas_2022_2023.csv");
    assert_eq!(loaded.encoding, TextEncoding::Utf8);
    assert_eq!(loaded.revision.len(), 64);

    let frame = session.sales()?;
    assert_eq!(frame.height(), 5);
    assert_eq!(
        frame.clients()?,
        ["Interceramic", "Home Depot", "Daltile", "Lamosa"]
    );
    assert_eq!(frame.skus()?, ["ABC-1", "LMS-4", "XYZ-9"]);

    // The sales file keeps rows with a missing amount and counts them as 0.
    let amounts: Vec<Option<f64>> = frame.df().column("amount")?.f64()?.into_iter().collect();
    assert_eq!(
        amounts,
        [Some(1000.0), Some(500.0), Some(310.0), Some(0.0), Some(0.0)]
    );
    Ok(())
}

#[test]
fn incomplete_accounting_rows_are_dropped_instead() -> anyhow::Result<()> {
    let table = accounting_table("Actuals", &fixture("odoo_actual.csv"))?;

    assert_eq!(table.frame.height(), 2);
    assert_eq!(table.caption.as_deref(), Some("2 incomplete rows dropped"));
    let formatted: Vec<&str> = table
        .frame
        .column("amount_formatted")?
        .str()?
        .into_iter()
        .flatten()
        .collect();
    assert_eq!(formatted, ["125,000.50", "-45,000.00"]);
    Ok(())
}

#[test]
fn failed_upload_keeps_the_previous_table() {
    let mut session = loaded_session();
    let revision = session.revision().map(str::to_string);

    let err = session
        .upload("vacio.csv", &fixture("header_only.csv"))
        .unwrap_err();
    assert!(matches!(
        err,
        KonceptError::Parser(ParserError::EmptyData { .. })
    ));
    assert!(err.to_string().contains("file is empty"));

    assert_eq!(session.revision().map(str::to_string), revision);
    assert_eq!(session.sales().map(|frame| frame.height()).ok(), Some(5));
}

#[test]
fn new_upload_replaces_the_table() -> anyhow::Result<()> {
    let mut session = loaded_session();
    let first = session.revision().map(str::to_string);

    let loaded = session.upload("latin1.csv", &fixture("ventas_latin1.csv"))?;
    assert_eq!(loaded.encoding, TextEncoding::Latin1);
    assert_ne!(Some(loaded.revision.clone()), first);
    assert_eq!(session.sales()?.height(), 1);

    session.clear();
    assert!(matches!(session.sales(), Err(KonceptError::NoData)));
    Ok(())
}

#[test]
fn defaults_follow_the_loaded_file() -> anyhow::Result<()> {
    let session = loaded_session();
    let selection = ViewSelection::defaults_for(session.sales()?, 20);

    assert_eq!(selection.client.as_deref(), Some("Interceramic"));
    assert_eq!(selection.comparison_years, Some((2022, 2023)));
    assert_eq!(selection.monthly_years, [2023]);
    assert_eq!(selection.top_year, Some(2023));
    assert_eq!(selection.top_limit, 20);
    assert_eq!(selection.pivot_years, [2022, 2023]);
    assert_eq!(selection.top_client, ClientFilter::All);
    Ok(())
}

#[test]
fn dashboard_sections_render_with_captions() -> anyhow::Result<()> {
    let session = loaded_session();
    let frame = session.sales()?;
    let selection = ViewSelection::defaults_for(frame, 20);

    let sections = sales_analysis(frame, &selection);
    assert_eq!(sections.len(), 6);
    assert!(sections.iter().all(|section| section.outcome.is_ok()));

    let yearly = sections[0].outcome.as_ref().expect("yearly");
    assert_eq!(yearly.caption.as_deref(), Some("Data through 2/2023"));

    let monthly = sections[3].outcome.as_ref().expect("monthly");
    assert_eq!(monthly.frame.height(), 12);
    assert_eq!(monthly.caption.as_deref(), Some("2023 total: 0"));

    let sku_sections = sku_analysis(frame, &selection);
    assert_eq!(sku_sections.len(), 3);
    assert!(sku_sections.iter().all(|section| section.outcome.is_ok()));
    Ok(())
}

#[test]
fn one_failing_section_does_not_block_the_rest() -> anyhow::Result<()> {
    let raw = df!(
        "year" => ["2022", "2023"],
        "month" => ["1", "2"],
        "amount" => ["100", "200"],
    )?;
    let frame = koncept_core::normalize_sales(&raw, &ClientMap::builtin())?;
    let selection = ViewSelection {
        client: Some("Lamosa".to_string()),
        comparison_years: Some((2022, 2023)),
        monthly_years: vec![2022, 2023],
        share_years: vec![2022, 2023],
        ..ViewSelection::default()
    };

    let sections = sales_analysis(&frame, &selection);
    let failed: Vec<&str> = sections
        .iter()
        .filter(|section| section.outcome.is_err())
        .map(|section| section.title.as_str())
        .collect();
    assert_eq!(
        failed,
        ["Sales by client", "Year comparison", "Average monthly sales", "Client share"]
    );

    assert!(sections[0].outcome.is_ok());
    let monthly = sections[3].outcome.as_ref().expect("monthly");
    assert_eq!(monthly.frame.height(), 24);
    match &sections[1].outcome {
        Err(KonceptError::MissingColumn { column }) => assert_eq!(column, "client"),
        other => panic!("unexpected outcome {other:?}"),
    }
    Ok(())
}

#[test]
fn defaults_survive_a_file_without_skus() -> anyhow::Result<()> {
    let mut session = Session::new(ClientMap::builtin());
    session.upload(
        "sin_sku.csv",
        b"Cliente,Year,Mes,Importe\nLamosa,2022,1,100\nLamosa,2023,2,250\n",
    )?;
    let frame = session.sales()?;

    let selection = ViewSelection::defaults_for(frame, 20);
    assert_eq!(selection.client.as_deref(), Some("Lamosa"));
    assert_eq!(selection.comparison_years, Some((2022, 2023)));
    assert!(selection.pivot_skus.is_empty());

    let sales = sales_analysis(frame, &selection);
    assert!(sales.iter().all(|section| section.outcome.is_ok()));
    let yearly = sales[0].outcome.as_ref().expect("yearly");
    assert_eq!(yearly.frame.height(), 2);

    let sku_sections = sku_analysis(frame, &selection);
    assert_eq!(sku_sections.len(), 3);
    for section in &sku_sections {
        match &section.outcome {
            Err(KonceptError::MissingColumn { column }) => assert_eq!(column, "sku"),
            other => panic!("{}: unexpected outcome {other:?}", section.title),
        }
    }
    Ok(())
}

#[test]
fn export_writes_a_readable_workbook() -> anyhow::Result<()> {
    let frame = df!(
        "year" => [2022i32, 2023],
        "amount" => [1500.0, 250.5],
        "amount_formatted" => ["1,500", "250"],
    )?;
    let table = ReportTable::new("Sales: Home Depot", frame);

    let bytes = workbook_bytes(&table)?;
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let sheet = workbook.sheet_names()[0].clone();
    assert_eq!(sheet, "Sales Home Depot");

    let range = workbook.worksheet_range(&sheet)?;
    let rows: Vec<Vec<Data>> = range.rows().map(|row| row.to_vec()).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0][0], Data::String("year".to_string()));
    assert_eq!(rows[1][0], Data::Float(2022.0));
    assert_eq!(rows[2][1], Data::Float(250.5));
    assert_eq!(rows[2][2], Data::String("250".to_string()));

    assert_eq!(
        export_file_name("ventas_anuales", Some("Home Depot")),
        "ventas_anuales_home_depot.xlsx"
    );
    Ok(())
}

#[test]
fn tables_serialize_to_row_json() -> anyhow::Result<()> {
    let frame = df!(
        "client" => ["Lamosa"],
        "amount" => [500.0],
    )?;
    let table = ReportTable::new("Client share", frame).with_caption("2023");

    let json: serde_json::Value = serde_json::from_str(&to_json(&table)?)?;
    assert_eq!(json["title"], "Client share");
    assert_eq!(json["caption"], "2023");
    assert_eq!(json["rows"][0]["client"], "Lamosa");
    assert_eq!(json["rows"][0]["amount"], 500.0);
    Ok(())
}
