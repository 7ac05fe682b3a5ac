use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use polars::prelude::*;

use crate::errors::ParserError;
use crate::model::BudgetTable;

use super::build_frame;
use super::schema::BUDGET_COLUMN_TEMPLATE;

/// Leading template columns kept as text; the rest hold monthly amounts.
const TEXT_COLUMNS: usize = 2;

pub struct BudgetWorkbookParser;

impl BudgetWorkbookParser {
    const NAME: &'static str = "BUDGET_WORKBOOK";

    fn workbook_error(err: impl std::fmt::Display) -> ParserError {
        ParserError::Workbook {
            format: Self::NAME,
            message: err.to_string(),
        }
    }

    fn is_blank(cell: &Data) -> bool {
        match cell {
            Data::Empty => true,
            Data::String(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    fn cell_text(cell: &Data) -> Option<String> {
        if Self::is_blank(cell) {
            return None;
        }
        let text = match cell {
            Data::String(text) => text.clone(),
            Data::Float(value) if value.fract() == 0.0 => format!("{value:.0}"),
            Data::Int(value) => value.to_string(),
            other => other.to_string(),
        };
        Some(text)
    }

    fn cell_number(cell: &Data) -> Option<f64> {
        match cell {
            Data::Float(value) => Some(*value),
            Data::Int(value) => Some(*value as f64),
            Data::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn parse(&self, bytes: &[u8]) -> Result<BudgetTable, ParserError> {
        let mut workbook =
            open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).map_err(Self::workbook_error)?;

        let first_sheet = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(ParserError::EmptyData { format: Self::NAME })?;
        let range = workbook
            .worksheet_range(&first_sheet)
            .map_err(Self::workbook_error)?;

        // The first row is the sheet's own header; its labels are replaced below.
        let data_rows: Vec<&[Data]> = range.rows().skip(1).collect();
        let width = range.width();

        let kept_columns: Vec<usize> = (0..width)
            .filter(|&col| {
                data_rows
                    .iter()
                    .any(|row| row.get(col).is_some_and(|cell| !Self::is_blank(cell)))
            })
            .collect();
        let kept_rows: Vec<&[Data]> = data_rows
            .into_iter()
            .filter(|row| {
                kept_columns
                    .iter()
                    .any(|&col| row.get(col).is_some_and(|cell| !Self::is_blank(cell)))
            })
            .collect();

        if kept_rows.is_empty() || kept_columns.is_empty() {
            return Err(ParserError::EmptyData { format: Self::NAME });
        }
        if kept_columns.len() > BUDGET_COLUMN_TEMPLATE.len() {
            return Err(ParserError::ColumnCount {
                format: Self::NAME,
                expected: BUDGET_COLUMN_TEMPLATE.len(),
                found: kept_columns.len(),
            });
        }

        let mut columns: Vec<Column> = Vec::with_capacity(kept_columns.len());
        for (position, &col) in kept_columns.iter().enumerate() {
            let name = BUDGET_COLUMN_TEMPLATE[position];
            let cells = kept_rows.iter().map(|row| row.get(col).unwrap_or(&Data::Empty));
            let column = if position < TEXT_COLUMNS {
                let values: Vec<Option<String>> = cells.map(Self::cell_text).collect();
                Series::new(name.into(), values)
            } else {
                let values: Vec<Option<f64>> = cells.map(Self::cell_number).collect();
                Series::new(name.into(), values)
            };
            columns.push(column.into());
        }

        let df = build_frame(Self::NAME, columns)?;
        Ok(BudgetTable { df })
    }
}

pub fn parse_budget_workbook(bytes: &[u8]) -> Result<BudgetTable, ParserError> {
    BudgetWorkbookParser.parse(bytes)
}
