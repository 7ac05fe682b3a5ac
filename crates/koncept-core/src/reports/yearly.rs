use polars::prelude::*;

use super::common::{filtered, require_columns, with_formatted};
use crate::error::Result;
use crate::format::thousands;
use crate::normalize::{SalesFrame, AMOUNT_FORMATTED};

fn totals_by_year(lf: LazyFrame) -> Result<DataFrame> {
    let df = lf
        .group_by([col("year")])
        .agg([col("amount").sum().alias("amount")])
        .sort(["year"], SortMultipleOptions::default())
        .collect()?;
    with_formatted(df, "amount", AMOUNT_FORMATTED, thousands)
}

/// `year, amount, amount_formatted` across every client.
pub fn yearly_totals(frame: &SalesFrame) -> Result<DataFrame> {
    require_columns(frame, &["year", "amount"])?;
    totals_by_year(filtered(frame, None::<Expr>))
}

/// `year, amount, amount_formatted` for one client. An unknown client yields no rows.
pub fn client_yearly_totals(frame: &SalesFrame, client: &str) -> Result<DataFrame> {
    require_columns(frame, &["client", "year", "amount"])?;
    totals_by_year(filtered(frame, [col("client").eq(lit(client))]))
}

/// Total sales of one client in two years, one row per year in the order asked for.
/// A year without sales reports 0.
pub fn compare_periods(frame: &SalesFrame, client: &str, first: i32, second: i32) -> Result<DataFrame> {
    require_columns(frame, &["client", "year", "amount"])?;

    let mut amounts = Vec::with_capacity(2);
    for year in [first, second] {
        let total = filtered(
            frame,
            [col("client").eq(lit(client)), col("year").eq(lit(year))],
        )
        .select([col("amount").sum().alias("amount")])
        .collect()?;
        let amount = total.column("amount")?.f64()?.get(0).unwrap_or(0.0);
        amounts.push(amount);
    }

    let df = DataFrame::new(vec![
        Series::new("client".into(), vec![client.to_string(), client.to_string()]).into(),
        Series::new("year".into(), vec![first, second]).into(),
        Series::new("amount".into(), amounts).into(),
    ])?;
    with_formatted(df, "amount", AMOUNT_FORMATTED, thousands)
}
