use std::collections::{BTreeSet, HashSet};
use std::fmt;

use polars::prelude::*;
use tracing::debug;

use crate::clients::ClientMap;
use crate::error::{KonceptError, Result};
use crate::format::thousands;

pub const AMOUNT_FORMATTED: &str = "amount_formatted";

/// `trim -> uppercase`.
pub fn normalize_sku(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Integer text, or a float truncated toward zero (`"2022.0"` is 2022). Anything else is 0.
pub fn coerce_int(raw: &str) -> i32 {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i32>() {
        return value;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= i32::MIN as f64 && value <= i32::MAX as f64 => {
            value.trunc() as i32
        }
        _ => 0,
    }
}

pub fn coerce_amount(raw: &str) -> f64 {
    coerce_optional(raw).unwrap_or(0.0)
}

/// Finite float or `None`.
pub fn coerce_optional(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// A calendar month within the loaded data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period {
    pub year: i32,
    pub month: i32,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month, self.year)
    }
}

/// The normalized sales table every report reads from.
#[derive(Debug, Clone)]
pub struct SalesFrame {
    df: DataFrame,
}

impl SalesFrame {
    pub fn df(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_inner(self) -> DataFrame {
        self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df.column(name).is_ok()
    }

    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.df
            .column(name)
            .map_err(|_| KonceptError::MissingColumn {
                column: name.to_string(),
            })
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> Result<Vec<i32>> {
        let years = self.require_column("year")?.i32()?;
        let distinct: BTreeSet<i32> = years.into_iter().flatten().collect();
        Ok(distinct.into_iter().collect())
    }

    /// Distinct clients in order of first appearance.
    pub fn clients(&self) -> Result<Vec<String>> {
        distinct_in_order(self.require_column("client")?)
    }

    /// Distinct SKUs, sorted.
    pub fn skus(&self) -> Result<Vec<String>> {
        let skus = self.require_column("sku")?.str()?;
        let distinct: BTreeSet<&str> = skus.into_iter().flatten().collect();
        Ok(distinct.into_iter().map(str::to_string).collect())
    }

    /// Latest year in the data and the latest month recorded within it.
    pub fn latest_period(&self) -> Result<Option<Period>> {
        let years = self.require_column("year")?.i32()?;
        let months = self.require_column("month")?.i32()?;

        let latest = years
            .into_iter()
            .zip(months)
            .filter_map(|(year, month)| Some(Period {
                year: year?,
                month: month?,
            }))
            .max();
        Ok(latest)
    }
}

fn distinct_in_order(column: &Column) -> Result<Vec<String>> {
    let values = column.str()?;
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for value in values.into_iter().flatten() {
        if seen.insert(value) {
            ordered.push(value.to_string());
        }
    }
    Ok(ordered)
}

fn nullable_text_cells(column: &Column) -> Result<Vec<Option<String>>> {
    let as_text = column.cast(&DataType::String)?;
    let values = as_text.str()?;
    Ok(values
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

/// Cell text for coercion. Nulls are read as the `"0"` the parser zero-fills with.
fn text_cells(column: &Column) -> Result<Vec<String>> {
    Ok(nullable_text_cells(column)?
        .into_iter()
        .map(|value| value.unwrap_or_else(|| "0".to_string()))
        .collect())
}

/// Cleans the canonical sales columns that are present and appends `amount_formatted`.
/// Columns with other names pass through untouched.
pub fn normalize_sales(df: &DataFrame, clients: &ClientMap) -> Result<SalesFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(df.width() + 1);
    let mut formatted_amounts = None;

    for column in df.get_columns() {
        let name = column.name().clone();
        let normalized: Column = match name.as_str() {
            "client" => {
                let values: Vec<String> = text_cells(column)?
                    .iter()
                    .map(|raw| clients.normalize(raw))
                    .collect();
                Series::new(name, values).into()
            }
            "sku" => {
                let values: Vec<String> = text_cells(column)?
                    .iter()
                    .map(|raw| normalize_sku(raw))
                    .collect();
                Series::new(name, values).into()
            }
            "product" => Series::new(name, text_cells(column)?).into(),
            "year" | "month" => {
                let values: Vec<i32> = text_cells(column)?
                    .iter()
                    .map(|raw| coerce_int(raw))
                    .collect();
                Series::new(name, values).into()
            }
            "quantity" | "unit_price" => {
                let values: Vec<f64> = text_cells(column)?
                    .iter()
                    .map(|raw| coerce_amount(raw))
                    .collect();
                Series::new(name, values).into()
            }
            "amount" => {
                let values: Vec<f64> = text_cells(column)?
                    .iter()
                    .map(|raw| coerce_amount(raw))
                    .collect();
                formatted_amounts = Some(
                    values
                        .iter()
                        .map(|value| thousands(*value))
                        .collect::<Vec<String>>(),
                );
                Series::new(name, values).into()
            }
            AMOUNT_FORMATTED => continue,
            _ => column.clone(),
        };
        columns.push(normalized);
    }

    if let Some(formatted) = formatted_amounts {
        columns.push(Series::new(AMOUNT_FORMATTED.into(), formatted).into());
    }

    let df = DataFrame::new(columns)?;
    debug!(rows = df.height(), columns = df.width(), "normalized sales table");
    Ok(SalesFrame { df })
}
