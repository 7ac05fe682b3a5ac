//! Terminal, JSON and workbook rendering of report tables.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, CellAlignment, ContentArrangement, Table};
use koncept_core::dashboard::Section;
use koncept_core::export::write_workbook;
use koncept_core::present::{to_json, to_json_value};
use koncept_core::ReportTable;
use polars::prelude::{AnyValue, DataType};
use serde_json::json;
use tracing::info;

const FORMATTED_SUFFIX: &str = "_formatted";

pub struct Output {
    json: bool,
    export_dir: Option<PathBuf>,
}

impl Output {
    pub fn new(json: bool, export_dir: Option<PathBuf>) -> Self {
        Self { json, export_dir }
    }

    /// Prints one table and saves it when an export directory was given.
    pub fn table(&self, table: &ReportTable, stem: &str, client: Option<&str>) -> Result<()> {
        if self.json {
            println!("{}", to_json(table)?);
        } else {
            print_table(table)?;
        }
        self.export(table, stem, client)
    }

    /// Prints every section, reporting failed ones by their error message.
    pub fn sections(&self, sections: &[Section], client: Option<&str>) -> Result<()> {
        if self.json {
            let mut rendered = Vec::with_capacity(sections.len());
            for section in sections {
                rendered.push(match &section.outcome {
                    Ok(table) => json!({
                        "section": section.title,
                        "table": to_json_value(table)?,
                    }),
                    Err(err) => json!({
                        "section": section.title,
                        "error": err.to_string(),
                    }),
                });
            }
            println!("{}", serde_json::to_string_pretty(&rendered)?);
        } else {
            for section in sections {
                match &section.outcome {
                    Ok(table) => print_table(table)?,
                    Err(err) => eprintln!("{}: {}\n", section.title, err),
                }
            }
        }

        for section in sections {
            if let Ok(table) = &section.outcome {
                self.export(table, &file_stem(&section.title), client)?;
            }
        }
        Ok(())
    }

    fn export(&self, table: &ReportTable, stem: &str, client: Option<&str>) -> Result<()> {
        let Some(dir) = &self.export_dir else {
            return Ok(());
        };
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        let path = write_workbook(table, dir, stem, client)
            .with_context(|| format!("failed to export '{}'", table.title))?;
        info!(path = %path.display(), "workbook written");
        Ok(())
    }
}

fn file_stem(title: &str) -> String {
    title
        .to_lowercase()
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

fn cell_text(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(text) => text.to_string(),
        AnyValue::StringOwned(text) => text.to_string(),
        other => other.to_string(),
    }
}

fn is_number(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::UInt64
            | DataType::UInt32
    )
}

/// Numeric columns that have a formatted twin are shown through the twin only.
fn print_table(report: &ReportTable) -> Result<()> {
    let frame = &report.frame;
    let names: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let visible: Vec<usize> = names
        .iter()
        .enumerate()
        .filter(|(_, name)| !names.contains(&format!("{name}{FORMATTED_SUFFIX}")))
        .map(|(idx, _)| idx)
        .collect();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(visible.iter().map(|idx| {
        let name = &names[*idx];
        Cell::new(name.strip_suffix(FORMATTED_SUFFIX).unwrap_or(name))
    }));

    let columns = frame.get_columns();
    for row in 0..frame.height() {
        let mut cells = Vec::with_capacity(visible.len());
        for idx in &visible {
            let column = &columns[*idx];
            let cell = Cell::new(cell_text(column.get(row)?));
            let numeric = names[*idx].ends_with(FORMATTED_SUFFIX) || is_number(column.dtype());
            cells.push(if numeric {
                cell.set_alignment(CellAlignment::Right)
            } else {
                cell
            });
        }
        table.add_row(cells);
    }

    println!("{}", report.title);
    println!("{table}");
    if let Some(caption) = &report.caption {
        println!("{caption}");
    }
    if frame.height() == 0 {
        println!("(no data for this selection)");
    }
    println!();
    Ok(())
}
