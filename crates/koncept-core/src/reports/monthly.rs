use std::collections::BTreeSet;

use polars::prelude::*;

use super::common::{
    any_of_i32, column_sum, filtered, require_columns, safe_pct_change, with_formatted,
    ClientFilter,
};
use crate::error::Result;
use crate::format::{percent, thousands};
use crate::normalize::{SalesFrame, AMOUNT_FORMATTED};

#[derive(Debug, Clone, Default)]
pub struct MonthlyRequest {
    pub years: Vec<i32>,
    pub client: ClientFilter,
}

/// Month-by-month totals with every calendar month present.
#[derive(Debug, Clone)]
pub struct MonthlySeries {
    /// `year, month, amount, amount_formatted, change_pct, change_pct_formatted`.
    pub frame: DataFrame,
}

impl MonthlySeries {
    pub fn years(&self) -> Result<Vec<i32>> {
        let years = self.frame.column("year")?.i32()?;
        let distinct: BTreeSet<i32> = years.into_iter().flatten().collect();
        Ok(distinct.into_iter().collect())
    }

    pub fn total_for(&self, year: i32) -> Result<f64> {
        let rows = self
            .frame
            .clone()
            .lazy()
            .filter(col("year").eq(lit(year)))
            .collect()?;
        column_sum(&rows, "amount")
    }
}

/// Sums sales per (year, month) for the requested years and client, then fills every
/// missing month of a year with data with 0 so each year spans all twelve months.
/// `change_pct` compares each month with the one before it in the same year.
pub fn monthly_totals(frame: &SalesFrame, request: &MonthlyRequest) -> Result<MonthlySeries> {
    require_columns(frame, &["year", "month", "amount"])?;
    if request.client.client().is_some() {
        require_columns(frame, &["client"])?;
    }

    let mut predicates = vec![any_of_i32("year", &request.years)];
    predicates.extend(request.client.predicate());

    let sums = filtered(frame, predicates)
        .group_by([col("year"), col("month")])
        .agg([col("amount").sum().alias("amount")])
        .collect()?;

    let present: BTreeSet<i32> = sums.column("year")?.i32()?.into_iter().flatten().collect();
    let mut calendar_years = Vec::with_capacity(present.len() * 12);
    let mut calendar_months = Vec::with_capacity(present.len() * 12);
    for year in &present {
        for month in 1..=12 {
            calendar_years.push(*year);
            calendar_months.push(month);
        }
    }
    let calendar = DataFrame::new(vec![
        Series::new("year".into(), calendar_years).into(),
        Series::new("month".into(), calendar_months).into(),
    ])?;

    let dense = calendar
        .lazy()
        .join(
            sums.lazy(),
            [col("year"), col("month")],
            [col("year"), col("month")],
            JoinArgs::new(JoinType::Left),
        )
        .with_column(col("amount").fill_null(lit(0.0)))
        .sort(["year", "month"], SortMultipleOptions::default())
        .collect()?;

    let years = dense.column("year")?.i32()?;
    let amounts = dense.column("amount")?.f64()?;
    let mut changes = Vec::with_capacity(dense.height());
    let mut previous: Option<(i32, f64)> = None;
    for (year, amount) in years.into_iter().zip(amounts) {
        let (year, amount) = (year.unwrap_or_default(), amount.unwrap_or(0.0));
        let change = match previous {
            Some((previous_year, previous_amount)) if previous_year == year => {
                safe_pct_change(previous_amount, amount)
            }
            _ => 0.0,
        };
        changes.push(change);
        previous = Some((year, amount));
    }

    let mut df = with_formatted(dense, "amount", AMOUNT_FORMATTED, thousands)?;
    df.with_column(Series::new("change_pct".into(), changes))?;
    let df = with_formatted(df, "change_pct", "change_pct_formatted", percent)?;

    Ok(MonthlySeries { frame: df })
}
