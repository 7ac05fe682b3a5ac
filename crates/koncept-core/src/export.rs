use std::path::{Path, PathBuf};

use polars::prelude::*;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::error::Result;
use crate::present::ReportTable;

const SHEET_NAME_LIMIT: usize = 31;

/// `stem_<client>.xlsx` with the client lower-cased and spaces turned into underscores.
pub fn export_file_name(stem: &str, client: Option<&str>) -> String {
    match client.map(str::trim).filter(|client| !client.is_empty()) {
        Some(client) => format!("{stem}_{}.xlsx", client.to_lowercase().replace(' ', "_")),
        None => format!("{stem}.xlsx"),
    }
}

fn sheet_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|ch| !matches!(ch, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(SHEET_NAME_LIMIT)
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'').to_string();
    if cleaned.is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned
    }
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, value: AnyValue<'_>) -> Result<()> {
    match value {
        AnyValue::Null => {}
        AnyValue::String(text) => {
            worksheet.write_string(row, col, text)?;
        }
        AnyValue::StringOwned(text) => {
            worksheet.write_string(row, col, text.as_str())?;
        }
        AnyValue::Boolean(flag) => {
            worksheet.write_boolean(row, col, flag)?;
        }
        other => match other.extract::<f64>() {
            Some(number) if number.is_finite() => {
                worksheet.write_number(row, col, number)?;
            }
            _ => {
                worksheet.write_string(row, col, other.to_string())?;
            }
        },
    }
    Ok(())
}

/// The table as a single-sheet xlsx workbook: a bold header row, then one row per record.
pub fn workbook_bytes(table: &ReportTable) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(&table.title))?;
    let header = Format::new().set_bold();

    for (col_idx, column) in table.frame.get_columns().iter().enumerate() {
        let col = u16::try_from(col_idx).unwrap_or(u16::MAX);
        worksheet.write_string_with_format(0, col, column.name().as_str(), &header)?;

        let series = column.as_materialized_series();
        for row_idx in 0..series.len() {
            let row = u32::try_from(row_idx + 1).unwrap_or(u32::MAX);
            write_cell(worksheet, row, col, series.get(row_idx)?)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Saves the workbook into `dir` under [`export_file_name`] and returns its path.
pub fn write_workbook(
    table: &ReportTable,
    dir: &Path,
    stem: &str,
    client: Option<&str>,
) -> Result<PathBuf> {
    let path = dir.join(export_file_name(stem, client));
    std::fs::write(&path, workbook_bytes(table)?)?;
    Ok(path)
}
