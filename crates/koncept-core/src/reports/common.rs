use polars::prelude::*;

use crate::error::Result;
use crate::normalize::SalesFrame;

pub const ALL_CLIENTS_LABEL: &str = "All clients";

/// Which clients a report covers. `All` stands in for the "all clients" entry of a client picker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ClientFilter {
    #[default]
    All,
    Only(String),
}

impl ClientFilter {
    pub fn only(client: impl Into<String>) -> Self {
        ClientFilter::Only(client.into())
    }

    pub fn label(&self) -> &str {
        match self {
            ClientFilter::All => ALL_CLIENTS_LABEL,
            ClientFilter::Only(client) => client,
        }
    }

    pub fn client(&self) -> Option<&str> {
        match self {
            ClientFilter::All => None,
            ClientFilter::Only(client) => Some(client),
        }
    }

    pub(crate) fn predicate(&self) -> Option<Expr> {
        self.client().map(|client| col("client").eq(lit(client)))
    }
}

impl From<Option<String>> for ClientFilter {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(client) => ClientFilter::Only(client),
            None => ClientFilter::All,
        }
    }
}

/// Percentage change from `previous` to `current`, 0 when there is nothing to compare against.
pub fn safe_pct_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 || !previous.is_finite() || !current.is_finite() {
        0.0
    } else {
        (current - previous) * 100.0 / previous
    }
}

/// `part` as a percentage of `total`, 0 when the total is 0.
pub fn safe_share(part: f64, total: f64) -> f64 {
    if total == 0.0 || !total.is_finite() || !part.is_finite() {
        0.0
    } else {
        part * 100.0 / total
    }
}

pub(crate) fn require_columns(frame: &SalesFrame, columns: &[&str]) -> Result<()> {
    for column in columns {
        frame.require_column(column)?;
    }
    Ok(())
}

/// `column == v1 OR column == v2 ...`; an empty value list matches nothing.
pub(crate) fn any_of_i32(column: &str, values: &[i32]) -> Expr {
    values
        .iter()
        .map(|value| col(column).eq(lit(*value)))
        .reduce(|acc, expr| acc.or(expr))
        .unwrap_or_else(|| lit(false))
}

pub(crate) fn any_of_str(column: &str, values: &[String]) -> Expr {
    values
        .iter()
        .map(|value| col(column).eq(lit(value.as_str())))
        .reduce(|acc, expr| acc.or(expr))
        .unwrap_or_else(|| lit(false))
}

/// The sales table lazily filtered by every predicate given.
pub(crate) fn filtered(frame: &SalesFrame, predicates: impl IntoIterator<Item = Expr>) -> LazyFrame {
    let lf = frame.df().clone().lazy();
    match predicates.into_iter().reduce(|acc, expr| acc.and(expr)) {
        Some(predicate) => lf.filter(predicate),
        None => lf,
    }
}

pub(crate) fn f64_values(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
    let values = df.column(column)?.cast(&DataType::Float64)?;
    Ok(values
        .f64()?
        .into_iter()
        .map(|value| value.unwrap_or(0.0))
        .collect())
}

pub(crate) fn column_sum(df: &DataFrame, column: &str) -> Result<f64> {
    Ok(f64_values(df, column)?.iter().sum())
}

/// Appends `target` holding `formatter` applied to every value of the numeric `source` column.
pub(crate) fn with_formatted(
    mut df: DataFrame,
    source: &str,
    target: &str,
    formatter: fn(f64) -> String,
) -> Result<DataFrame> {
    let formatted: Vec<String> = f64_values(&df, source)?
        .into_iter()
        .map(formatter)
        .collect();
    df.with_column(Series::new(target.into(), formatted))?;
    Ok(df)
}
