use std::fmt;

use polars::prelude::*;

use super::common::{column_sum, f64_values, filtered, require_columns, safe_share, with_formatted, ClientFilter};
use crate::error::Result;
use crate::format::{currency, percent, thousands};
use crate::normalize::{SalesFrame, AMOUNT_FORMATTED};

#[derive(Debug, Clone)]
pub struct TopProductsRequest {
    pub client: ClientFilter,
    pub year: Option<i32>,
    /// `0` lists every product.
    pub limit: usize,
}

#[derive(Debug, Clone)]
pub struct TopProducts {
    /// `sku, product, quantity, amount, amount_formatted, share_pct, share_pct_formatted`.
    pub frame: DataFrame,
    /// Sales of every product in scope, shown or not.
    pub total_amount: f64,
    pub shown_amount: f64,
    pub shown_share_pct: f64,
}

/// Best-selling products by amount within the client/year scope. Ties are listed by
/// SKU and then product name.
pub fn top_products(frame: &SalesFrame, request: &TopProductsRequest) -> Result<TopProducts> {
    require_columns(frame, &["sku", "product", "quantity", "amount"])?;
    if request.client.client().is_some() {
        require_columns(frame, &["client"])?;
    }
    if request.year.is_some() {
        require_columns(frame, &["year"])?;
    }

    let mut predicates: Vec<Expr> = request.client.predicate().into_iter().collect();
    predicates.extend(request.year.map(|year| col("year").eq(lit(year))));
    let scoped = filtered(frame, predicates).collect()?;
    let total_amount = column_sum(&scoped, "amount")?;

    let mut ranked = scoped
        .lazy()
        .group_by([col("sku"), col("product")])
        .agg([
            col("quantity").sum().alias("quantity"),
            col("amount").sum().alias("amount"),
        ])
        .sort(
            ["amount", "sku", "product"],
            SortMultipleOptions::default().with_order_descending_multi([true, false, false]),
        );
    if request.limit > 0 {
        ranked = ranked.limit(IdxSize::try_from(request.limit).unwrap_or(IdxSize::MAX));
    }
    let ranked = ranked.collect()?;

    let shares: Vec<f64> = f64_values(&ranked, "amount")?
        .into_iter()
        .map(|amount| safe_share(amount, total_amount))
        .collect();
    let shown_amount = column_sum(&ranked, "amount")?;

    let mut df = with_formatted(ranked, "amount", AMOUNT_FORMATTED, thousands)?;
    df.with_column(Series::new("share_pct".into(), shares))?;
    let df = with_formatted(df, "share_pct", "share_pct_formatted", percent)?;

    Ok(TopProducts {
        frame: df,
        total_amount,
        shown_amount,
        shown_share_pct: safe_share(shown_amount, total_amount),
    })
}

/// Second grouping key of the unit price report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnitPriceGrouping {
    #[default]
    Product,
    Year,
}

impl UnitPriceGrouping {
    pub fn column(&self) -> &'static str {
        match self {
            UnitPriceGrouping::Product => "product",
            UnitPriceGrouping::Year => "year",
        }
    }
}

impl fmt::Display for UnitPriceGrouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Mean unit price and total quantity per SKU and product (or year). Unreadable prices
/// arrive here as 0 and count toward the mean.
pub fn unit_prices(frame: &SalesFrame, client: &ClientFilter, grouping: UnitPriceGrouping) -> Result<DataFrame> {
    let key = grouping.column();
    require_columns(frame, &["sku", key, "unit_price", "quantity"])?;
    if client.client().is_some() {
        require_columns(frame, &["client"])?;
    }

    let df = filtered(frame, client.predicate())
        .group_by([col("sku"), col(key)])
        .agg([
            col("unit_price").mean().fill_null(lit(0.0)).alias("unit_price"),
            col("quantity").sum().alias("quantity"),
        ])
        .sort(["sku", key], SortMultipleOptions::default())
        .select([col("sku"), col(key), col("unit_price"), col("quantity")])
        .collect()?;

    let df = with_formatted(df, "unit_price", "unit_price_formatted", currency)?;
    Ok(df.select(["sku", key, "unit_price", "unit_price_formatted", "quantity"])?)
}
