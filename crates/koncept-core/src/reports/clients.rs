use polars::prelude::*;

use super::common::{
    any_of_i32, any_of_str, column_sum, f64_values, filtered, require_columns, safe_share,
    with_formatted, ClientFilter,
};
use crate::error::Result;
use crate::format::{percent, thousands, thousands_2dp};
use crate::normalize::{SalesFrame, AMOUNT_FORMATTED};

/// Average sales per month with sales, by client and year. Monthly totals are summed
/// first so several invoices in one month count as one month.
pub fn average_monthly_sales(frame: &SalesFrame, client: &ClientFilter) -> Result<DataFrame> {
    require_columns(frame, &["client", "year", "month", "amount"])?;

    let df = filtered(frame, client.predicate())
        .group_by([col("client"), col("year"), col("month")])
        .agg([col("amount").sum().alias("amount")])
        .group_by([col("client"), col("year")])
        .agg([
            len().alias("months"),
            col("amount").mean().alias("average_amount"),
        ])
        .sort(["client", "year"], SortMultipleOptions::default())
        .collect()?;

    with_formatted(df, "average_amount", "average_amount_formatted", thousands_2dp)
}

/// Each client's share of sales over the selected years. An empty client list means
/// every client.
pub fn client_share(frame: &SalesFrame, years: &[i32], clients: &[String]) -> Result<DataFrame> {
    require_columns(frame, &["client", "year", "amount"])?;

    let mut predicates = vec![any_of_i32("year", years)];
    if !clients.is_empty() {
        predicates.push(any_of_str("client", clients));
    }

    let df = filtered(frame, predicates)
        .group_by([col("client")])
        .agg([col("amount").sum().alias("amount")])
        .sort(
            ["amount", "client"],
            SortMultipleOptions::default().with_order_descending_multi([true, false]),
        )
        .collect()?;

    let total = column_sum(&df, "amount")?;
    let shares: Vec<f64> = f64_values(&df, "amount")?
        .into_iter()
        .map(|amount| safe_share(amount, total))
        .collect();

    let mut df = with_formatted(df, "amount", AMOUNT_FORMATTED, thousands)?;
    df.with_column(Series::new("share_pct".into(), shares))?;
    with_formatted(df, "share_pct", "share_pct_formatted", percent)
}
